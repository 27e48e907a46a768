//! Remote source tests against a fake contents API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

use techblog::cache::{ManualClock, SharedClock};
use techblog::config::{CacheConfig, GitHubConfig};
use techblog::content::{ContentLoader, Difficulty};
use techblog::source::{ContentSource, GitHubClient, LocalSource};

const FIRST: &str = "---
title: \"First Post\"
date: \"2024-01-10\"
tags: \"rust, async\"
difficulty: intermediate
---
# First

Hello from the first post.
";

const SECOND: &str = "---
title: Second Post
date: 2024-03-05
tags: [web]
---
Body of the second post.
";

#[derive(Clone)]
struct FakeGitHub {
    base: String,
    listing_hits: Arc<AtomicUsize>,
}

async fn listing(State(fake): State<FakeGitHub>) -> Json<serde_json::Value> {
    fake.listing_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        { "name": "first.md", "path": "posts/first.md", "type": "file" },
        { "name": "README.txt", "path": "posts/README.txt", "type": "file" },
        { "name": "drafts.md", "path": "posts/drafts.md", "type": "dir" },
        { "name": "second.md", "path": "posts/second.md", "type": "file" }
    ]))
}

async fn file(State(fake): State<FakeGitHub>, Path(name): Path<String>) -> Response {
    match name.as_str() {
        "first.md" => {
            // The API wraps base64 payloads across lines
            let encoded = STANDARD.encode(FIRST);
            let wrapped: Vec<String> = encoded
                .as_bytes()
                .chunks(60)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect();
            Json(json!({
                "name": "first.md",
                "path": "posts/first.md",
                "type": "file",
                "content": wrapped.join("\n"),
                "encoding": "base64"
            }))
            .into_response()
        }
        "second.md" => Json(json!({
            "name": "second.md",
            "path": "posts/second.md",
            "type": "file",
            "content": "",
            "encoding": "none",
            "download_url": format!("{}/raw/second.md", fake.base)
        }))
        .into_response(),
        "plain.md" => Json(json!({
            "name": "plain.md",
            "path": "posts/plain.md",
            "type": "file",
            "content": "not base64 at all",
            "encoding": "utf-8",
            "download_url": format!("{}/raw/second.md", fake.base)
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn raw_second() -> &'static str {
    SECOND
}

/// Serve the fake API on an ephemeral port
async fn spawn_fake_github() -> FakeGitHub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let fake = FakeGitHub {
        base: format!("http://{}", listener.local_addr().unwrap()),
        listing_hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route("/repos/o/r/contents/posts", get(listing))
        .route("/repos/o/r/contents/posts/:name", get(file))
        .route("/raw/second.md", get(raw_second))
        .with_state(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    fake
}

/// Serve an API that fails every request
async fn spawn_broken_github() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

fn github_config(api_base: &str) -> GitHubConfig {
    GitHubConfig {
        api_base: api_base.to_string(),
        owner: "o".to_string(),
        repo: "r".to_string(),
        posts_path: "posts".to_string(),
        token: None,
        ..Default::default()
    }
}

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ))
}

#[tokio::test]
async fn test_all_posts_from_github() {
    let fake = spawn_fake_github().await;
    let clock: SharedClock = manual_clock();
    let client =
        GitHubClient::new(&github_config(&fake.base), &CacheConfig::default(), clock.clone())
            .unwrap();

    let loader = ContentLoader::new(vec![Box::new(client)]).with_clock(clock);
    let posts = loader.get_all_posts().await;

    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["second", "first"]);

    let first = &posts[1];
    assert_eq!(first.title, "First Post");
    assert_eq!(first.tags, vec!["rust", "async"]);
    assert_eq!(first.difficulty, Difficulty::Intermediate);
    assert_eq!(first.author, "Tarun");
    assert_eq!(first.read_time, "1 min read");
    assert_eq!(posts[0].date, "2024-03-05");
    assert_eq!(posts[0].tags, vec!["web"]);
}

#[tokio::test]
async fn test_inline_and_download_content() {
    let fake = spawn_fake_github().await;
    let client = GitHubClient::new(
        &github_config(&fake.base),
        &CacheConfig::default(),
        manual_clock(),
    )
    .unwrap();

    assert_eq!(client.get_post_by_slug("first").await.as_deref(), Some(FIRST));
    assert_eq!(
        client.get_post_by_slug("second").await.as_deref(),
        Some(SECOND)
    );
    assert_eq!(client.get_post_by_slug("missing").await, None);
}

#[tokio::test]
async fn test_unknown_inline_encoding_uses_download_url() {
    let fake = spawn_fake_github().await;
    let client = GitHubClient::new(
        &github_config(&fake.base),
        &CacheConfig::default(),
        manual_clock(),
    )
    .unwrap();

    assert_eq!(
        client.get_post_by_slug("plain").await.as_deref(),
        Some(SECOND)
    );
}

#[tokio::test]
async fn test_listing_is_filtered_and_cached() {
    let fake = spawn_fake_github().await;
    let clock = manual_clock();
    let client = GitHubClient::new(
        &github_config(&fake.base),
        &CacheConfig::default(),
        clock.clone(),
    )
    .unwrap();

    let names: Vec<_> = client
        .list_post_files()
        .await
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["first.md", "second.md"]);

    client.list_post_files().await;
    assert_eq!(fake.listing_hits.load(Ordering::SeqCst), 1);

    clock.advance(Duration::seconds(61));
    client.list_post_files().await;
    assert_eq!(fake.listing_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_falls_back_to_local_posts() {
    let base = spawn_broken_github().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("event-order.md"),
        "---\ntitle: Event Order\ndate: 2023-05-30\n---\nEvents arrive in order.\n",
    )
    .unwrap();

    let clock: SharedClock = manual_clock();
    let client =
        GitHubClient::new(&github_config(&base), &CacheConfig::default(), clock.clone()).unwrap();
    assert!(client.list_post_files().await.is_empty());

    let sources: Vec<Box<dyn ContentSource>> =
        vec![Box::new(client), Box::new(LocalSource::new(dir.path()))];
    let loader = ContentLoader::new(sources)
        .with_fallback_slugs(vec!["event-order".to_string(), "missing".to_string()])
        .with_clock(clock);

    let posts = loader.get_all_posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "event-order");
    assert_eq!(posts[0].date, "2023-05-30");

    let post = loader.get_post_by_slug("event-order").await.unwrap();
    assert_eq!(post.metadata.title, "Event Order");
    assert!(post.content.contains("Events arrive in order."));
    assert!(loader.get_post_by_slug("missing").await.is_none());
}
