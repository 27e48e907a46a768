//! Front-matter scaffold for new posts

/// Placeholder title used on the admin page
pub const PLACEHOLDER_TITLE: &str = "🚀 Your Awesome Blog Post Title";

/// A complete starter post with every supported front-matter key
pub fn post_scaffold(title: &str, date: &str, author: &str) -> String {
    format!(
        r#"---
title: {title}
date: {date}
author: {author}
readTime: "5 min"
tags: ["tag1", "tag2", "tag3"]
difficulty: "Beginner"
series: "Optional Series Name"
excerpt: "A compelling excerpt that makes people want to read more..."
---

# {heading}

Write your amazing content here using Markdown!

## Section 1

Your content...

## Section 2

More awesome content...

```python
# Code examples work great!
def hello_world():
    print("Hello from TapsTechie!")
```

## Conclusion

Wrap up your post nicely!
"#,
        title = yaml_quote(title),
        date = yaml_quote(date),
        author = yaml_quote(author),
        heading = title,
    )
}

fn yaml_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
