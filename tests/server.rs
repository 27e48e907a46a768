//! HTTP surface tests: pages, JSON API and sitemap

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

use techblog::cache::{ManualClock, SharedClock};
use techblog::config::SiteConfig;
use techblog::server::{router, ServerState};
use techblog::Blog;

const HELLO: &str = "---
title: \"🚀 Hello Rust\"
date: 2024-04-01
tags: [rust, intro]
difficulty: Beginner
---
# Hello

```rust
fn main() {}
```
";

const OLDER: &str = "---
title: Older Post
datePublished: 2023-01-15
tags: python
---
Some older words.
";

struct TestServer {
    base: String,
    _dir: TempDir,
}

async fn spawn_server() -> TestServer {
    let dir = TempDir::new().unwrap();
    let posts = dir.path().join("content/posts");
    std::fs::create_dir_all(&posts).unwrap();
    std::fs::write(posts.join("hello.md"), HELLO).unwrap();
    std::fs::write(posts.join("older.md"), OLDER).unwrap();

    let mut config = SiteConfig {
        url: "https://blog.example.com".to_string(),
        fallback_slugs: Vec::new(),
        ..Default::default()
    };
    config.github.enabled = false;

    let clock: SharedClock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let blog = Blog::with_config(dir.path(), config.clone());
    let loader = blog.loader_with_clock(clock.clone()).unwrap();
    let state = Arc::new(ServerState::new(config, loader, clock).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { base, _dir: dir }
}

async fn get(server: &TestServer, path: &str) -> reqwest::Response {
    reqwest::get(format!("{}{}", server.base, path)).await.unwrap()
}

#[tokio::test]
async fn test_api_list() {
    let server = spawn_server().await;
    let response = get(&server, "/api/content?list=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let posts: serde_json::Value = response.json().await.unwrap();
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["slug"], "hello");
    assert_eq!(posts[0]["readTime"], "1 min read");
    assert_eq!(posts[0]["difficulty"], "Beginner");
    assert_eq!(posts[1]["slug"], "older");
    assert_eq!(posts[1]["date"], "2023-01-15");
    assert_eq!(posts[1]["tags"], serde_json::json!(["python"]));
}

#[tokio::test]
async fn test_api_single_post() {
    let server = spawn_server().await;
    let response = get(&server, "/api/content?slug=hello").await;
    assert_eq!(response.status(), StatusCode::OK);

    let post: serde_json::Value = response.json().await.unwrap();
    assert_eq!(post["metadata"]["title"], "🚀 Hello Rust");
    assert!(post["content"].as_str().unwrap().starts_with("# Hello"));
}

#[tokio::test]
async fn test_api_errors() {
    let server = spawn_server().await;

    let response = get(&server, "/api/content?slug=nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));

    let response = get(&server, "/api/content").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Bad request" }));
}

#[tokio::test]
async fn test_post_page() {
    let server = spawn_server().await;

    let response = get(&server, "/blog/hello").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Hello Rust"));
    assert!(html.contains("language-rust"));
    assert!(html.contains("og:type\" content=\"article\""));
    assert!(html.contains("https://blog.example.com/blog/hello"));

    let response = get(&server, "/blog/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("Post not found"));
}

#[tokio::test]
async fn test_home_tag_filter() {
    let server = spawn_server().await;

    let html = get(&server, "/").await.text().await.unwrap();
    assert!(html.contains("/blog/hello"));
    assert!(html.contains("/blog/older"));

    let html = get(&server, "/?tag=python").await.text().await.unwrap();
    assert!(!html.contains("href=\"/blog/hello\""));
    assert!(html.contains("href=\"/blog/older\""));
}

#[tokio::test]
async fn test_other_pages() {
    let server = spawn_server().await;

    let xml = get(&server, "/sitemap.xml").await.text().await.unwrap();
    assert!(xml.contains("<loc>https://blog.example.com/blog/older</loc>"));

    let admin = get(&server, "/admin").await.text().await.unwrap();
    assert!(admin.contains("Blog Admin Dashboard"));
    assert!(admin.contains("/edit/main/public/content/posts/hello.md"));

    assert_eq!(get(&server, "/about").await.status(), StatusCode::OK);
    assert_eq!(
        get(&server, "/assets/highlight.css").await.status(),
        StatusCode::OK
    );
}
