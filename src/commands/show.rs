//! Print a single post

use anyhow::Result;

use crate::content::MarkdownRenderer;
use crate::Blog;

/// Print a post's metadata followed by its markdown body, or the rendered HTML
pub async fn run(blog: &Blog, slug: &str, html: bool) -> Result<()> {
    let loader = blog.loader()?;
    let Some(post) = loader.get_post_by_slug(slug).await else {
        anyhow::bail!("Post not found: {}", slug);
    };

    let meta = &post.metadata;
    println!("Title:      {}", meta.title);
    println!("Date:       {}", meta.date);
    println!("Author:     {}", meta.author);
    println!("Read time:  {}", meta.read_time);
    println!("Difficulty: {}", meta.difficulty);
    if !meta.tags.is_empty() {
        println!("Tags:       {}", meta.tags.join(", "));
    }
    if let Some(series) = &meta.series {
        println!("Series:     {}", series);
    }
    println!();

    if html {
        let renderer = MarkdownRenderer::with_theme(&blog.config.highlight_theme);
        println!("{}", renderer.render(&post.content));
    } else {
        println!("{}", post.content);
    }

    Ok(())
}
