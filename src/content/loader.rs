//! Content loader - turns raw documents from the configured sources into posts

use std::sync::Arc;

use super::normalize::{
    calculate_read_time, extract_excerpt, fix_mojibake, format_date, process_emojis,
};
use super::post::sort_by_effective_date;
use super::{Difficulty, FrontMatter, Post, PostMetadata};
use crate::cache::{SharedClock, SystemClock};
use crate::error::FrontMatterError;
use crate::source::ContentSource;

/// Loads posts from an ordered list of sources, first success wins
pub struct ContentLoader {
    sources: Vec<Box<dyn ContentSource>>,
    fallback_slugs: Vec<String>,
    default_author: String,
    clock: SharedClock,
}

impl ContentLoader {
    /// Create a loader over `sources`, tried in order
    pub fn new(sources: Vec<Box<dyn ContentSource>>) -> Self {
        Self {
            sources,
            fallback_slugs: Vec::new(),
            default_author: "Tarun".to_string(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Slugs loaded one by one when no source can enumerate its posts
    pub fn with_fallback_slugs(mut self, slugs: Vec<String>) -> Self {
        self.fallback_slugs = slugs;
        self
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    /// Clock used for "today" when a post has no usable date
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Raw text for a slug from the first source that has it
    async fn fetch_raw(&self, slug: &str) -> Option<String> {
        for source in &self.sources {
            if let Some(text) = source.fetch(slug).await {
                tracing::debug!("Loaded {} from {}", slug, source.name());
                return Some(text);
            }
        }
        None
    }

    /// Load a single post. Returns `None` when no source has it or it cannot
    /// be parsed.
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        let Some(raw) = self.fetch_raw(slug).await else {
            tracing::error!("Post not found: {}", slug);
            return None;
        };

        match self.build_post(slug, &raw) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::error!("Error loading post {}: {}", slug, e);
                None
            }
        }
    }

    /// Load metadata for every post, newest first
    pub async fn get_all_posts(&self) -> Vec<PostMetadata> {
        let mut posts = Vec::new();

        for source in &self.sources {
            let raw_posts = source.fetch_all().await;
            if raw_posts.is_empty() {
                continue;
            }

            tracing::debug!("{} posts listed by {}", raw_posts.len(), source.name());
            for raw in raw_posts {
                match self.build_metadata(&raw.slug, &raw.content) {
                    Ok((metadata, _)) => posts.push(metadata),
                    Err(e) => tracing::error!("Error parsing post {}: {}", raw.slug, e),
                }
            }
            if !posts.is_empty() {
                break;
            }
        }

        if posts.is_empty() {
            tracing::info!("No listed posts available, using fallback");
            for slug in self.fallback_slugs().await {
                if let Some(post) = self.get_post_by_slug(&slug).await {
                    posts.push(post.metadata);
                }
            }
        }

        sort_by_effective_date(&mut posts);
        posts
    }

    /// Configured fallback slugs, or whatever the sources can name
    async fn fallback_slugs(&self) -> Vec<String> {
        if !self.fallback_slugs.is_empty() {
            return self.fallback_slugs.clone();
        }

        let mut slugs = Vec::new();
        for source in &self.sources {
            for slug in source.list_slugs().await {
                if !slugs.contains(&slug) {
                    slugs.push(slug);
                }
            }
        }
        slugs
    }

    fn build_post(&self, slug: &str, raw: &str) -> Result<Post, FrontMatterError> {
        let (metadata, body) = self.build_metadata(slug, raw)?;
        Ok(Post {
            content: process_emojis(&body),
            metadata,
        })
    }

    /// Parse front-matter and normalize every field. Also returns the
    /// repaired body.
    fn build_metadata(
        &self,
        slug: &str,
        raw: &str,
    ) -> Result<(PostMetadata, String), FrontMatterError> {
        let (fm, body) = FrontMatter::parse(raw)?;
        let body = fix_mojibake(body);

        let title = fm
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(fix_mojibake)
            .unwrap_or_else(|| "Untitled".to_string());

        let date = format_date(
            non_empty(&fm.date).or(non_empty(&fm.date_published)),
            self.clock.now(),
        );

        let difficulty = match non_empty(&fm.difficulty) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{} in post {}, using Beginner", e, slug);
                Difficulty::default()
            }),
            None => Difficulty::default(),
        };

        let excerpt = non_empty(&fm.excerpt)
            .or(non_empty(&fm.seo_description))
            .map(str::to_string)
            .unwrap_or_else(|| extract_excerpt(&body));

        let metadata = PostMetadata {
            title,
            date,
            author: non_empty(&fm.author)
                .map(str::to_string)
                .unwrap_or_else(|| self.default_author.clone()),
            read_time: non_empty(&fm.read_time)
                .map(str::to_string)
                .unwrap_or_else(|| calculate_read_time(&body)),
            tags: fm.tags,
            difficulty,
            series: fm.series,
            excerpt,
            slug: slug.to_string(),
            seo_title: fm.seo_title,
            seo_description: fm.seo_description,
            date_published: fm.date_published,
            cuid: fm.cuid,
            cover: fm.cover,
        };

        Ok((metadata, body))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::source::RawPost;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    /// In-memory source
    #[derive(Default)]
    struct MemorySource {
        posts: HashMap<String, String>,
        listed: Vec<RawPost>,
    }

    impl MemorySource {
        fn with_post(mut self, slug: &str, content: &str) -> Self {
            self.posts.insert(slug.to_string(), content.to_string());
            self
        }

        fn listing(mut self, slug: &str, content: &str) -> Self {
            self.listed.push(RawPost {
                slug: slug.to_string(),
                content: content.to_string(),
            });
            self
        }
    }

    #[async_trait]
    impl ContentSource for MemorySource {
        fn name(&self) -> &str {
            "memory"
        }

        async fn fetch(&self, slug: &str) -> Option<String> {
            self.posts.get(slug).cloned()
        }

        async fn fetch_all(&self) -> Vec<RawPost> {
            self.listed.clone()
        }

        async fn list_slugs(&self) -> Vec<String> {
            let mut slugs: Vec<_> = self.posts.keys().cloned().collect();
            slugs.sort();
            slugs
        }
    }

    fn clock() -> SharedClock {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap(),
        ))
    }

    fn loader(sources: Vec<Box<dyn ContentSource>>) -> ContentLoader {
        ContentLoader::new(sources).with_clock(clock())
    }

    fn dated(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\nBody of {}.\n", title, date, title)
    }

    #[tokio::test]
    async fn test_defaults_applied() {
        let source = MemorySource::default().with_post("bare", "Just a body.\n");
        let loader = loader(vec![Box::new(source)]);

        let post = loader.get_post_by_slug("bare").await.unwrap();
        let meta = &post.metadata;
        assert_eq!(meta.title, "Untitled");
        assert_eq!(meta.author, "Tarun");
        assert_eq!(meta.difficulty, Difficulty::Beginner);
        assert!(meta.tags.is_empty());
        assert_eq!(meta.date, "2025-03-09");
        assert_eq!(meta.read_time, "1 min read");
        assert_eq!(meta.excerpt, "Just a body.");
        assert_eq!(meta.slug, "bare");
        assert_eq!(post.content, "Just a body.\n");
    }

    #[tokio::test]
    async fn test_full_frontmatter() {
        let doc = r#"---
title: "Python Magic Methods"
date: "2024-03-10"
author: Someone
readTime: "7 min"
tags: "python, dunder"
difficulty: Advanced
series: Python Deep Dives
seoDescription: All about dunders
datePublished: "2024-03-12T09:00:00.000Z"
cover: https://example.com/cover.png
---

# Intro
"#;
        let source = MemorySource::default().with_post("python-magic-methods", doc);
        let loader = loader(vec![Box::new(source)]);

        let meta = loader
            .get_post_by_slug("python-magic-methods")
            .await
            .unwrap()
            .metadata;
        assert_eq!(meta.title, "Python Magic Methods");
        assert_eq!(meta.date, "2024-03-10");
        assert_eq!(meta.author, "Someone");
        assert_eq!(meta.read_time, "7 min");
        assert_eq!(meta.tags, vec!["python", "dunder"]);
        assert_eq!(meta.difficulty, Difficulty::Advanced);
        assert_eq!(meta.series.as_deref(), Some("Python Deep Dives"));
        assert_eq!(meta.excerpt, "All about dunders");
        assert_eq!(meta.date_published.as_deref(), Some("2024-03-12T09:00:00.000Z"));
        assert_eq!(meta.cover.as_deref(), Some("https://example.com/cover.png"));
    }

    #[tokio::test]
    async fn test_date_falls_back_to_published() {
        let doc = "---\ntitle: T\ndatePublished: 2023-11-02T10:00:00Z\n---\nbody";
        let source = MemorySource::default().with_post("p", doc);
        let meta = loader(vec![Box::new(source)])
            .get_post_by_slug("p")
            .await
            .unwrap()
            .metadata;
        assert_eq!(meta.date, "2023-11-02");
    }

    #[tokio::test]
    async fn test_unknown_difficulty_defaults() {
        let doc = "---\ntitle: T\ndifficulty: Expert\n---\nbody";
        let source = MemorySource::default().with_post("p", doc);
        let meta = loader(vec![Box::new(source)])
            .get_post_by_slug("p")
            .await
            .unwrap()
            .metadata;
        assert_eq!(meta.difficulty, Difficulty::Beginner);
    }

    #[tokio::test]
    async fn test_read_time_computed_from_body() {
        let body = vec!["word"; 400].join(" ");
        let doc = format!("---\ntitle: Long\n---\n{}", body);
        let source = MemorySource::default().with_post("long", &doc);
        let meta = loader(vec![Box::new(source)])
            .get_post_by_slug("long")
            .await
            .unwrap()
            .metadata;
        assert_eq!(meta.read_time, "2 min read");
    }

    #[tokio::test]
    async fn test_mojibake_title_and_body_repaired() {
        let corrupt = |s: &str| -> String { s.bytes().map(char::from).collect() };
        let doc = format!(
            "---\ntitle: \"{}\"\n---\n{}",
            corrupt("Café déjà vu"),
            corrupt("Ready 🚀")
        );
        let source = MemorySource::default().with_post("launch", &doc);
        let post = loader(vec![Box::new(source)])
            .get_post_by_slug("launch")
            .await
            .unwrap();
        assert_eq!(post.metadata.title, "Café déjà vu");
        assert_eq!(post.content, "Ready 🚀");
    }

    #[tokio::test]
    async fn test_first_source_wins() {
        let remote = MemorySource::default().with_post("a", &dated("Remote", "2024-01-01"));
        let local = MemorySource::default()
            .with_post("a", &dated("Local", "2024-01-01"))
            .with_post("b", &dated("Only local", "2024-01-01"));
        let loader = loader(vec![Box::new(remote), Box::new(local)]);

        assert_eq!(loader.get_post_by_slug("a").await.unwrap().metadata.title, "Remote");
        assert_eq!(
            loader.get_post_by_slug("b").await.unwrap().metadata.title,
            "Only local"
        );
    }

    #[tokio::test]
    async fn test_missing_post_is_none() {
        let loader = loader(vec![Box::new(MemorySource::default())]);
        assert!(loader.get_post_by_slug("does-not-exist").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_post_is_none() {
        let source = MemorySource::default().with_post("bad", "---\ntitle: [oops\n---\nbody");
        let loader = loader(vec![Box::new(source)]);
        assert!(loader.get_post_by_slug("bad").await.is_none());
    }

    #[tokio::test]
    async fn test_all_posts_from_listing_sorted_and_skips_bad() {
        let remote = MemorySource::default()
            .listing("old", &dated("Old", "2022-05-01"))
            .listing("bad", "---\ntags: [unclosed\n---\n")
            .listing("new", &dated("New", "2024-05-01"))
            .listing("mid", &dated("Mid", "2023-05-01"));
        let loader = loader(vec![Box::new(remote)]).with_fallback_slugs(vec!["x".into()]);

        let posts = loader.get_all_posts().await;
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_all_posts_falls_back_to_slugs() {
        let remote = MemorySource::default();
        let local = MemorySource::default()
            .with_post("event-order", &dated("Event Order", "2024-02-01"))
            .with_post("Bulkhead-Pattern", &dated("Bulkhead", "2024-06-01"))
            .with_post("unlisted", &dated("Unlisted", "2025-01-01"));
        let loader = loader(vec![Box::new(remote), Box::new(local)]).with_fallback_slugs(vec![
            "event-order".into(),
            "Bulkhead-Pattern".into(),
            "python-magic-methods".into(),
        ]);

        let posts = loader.get_all_posts().await;
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["Bulkhead-Pattern", "event-order"]);
    }

    #[tokio::test]
    async fn test_all_posts_discovers_slugs_without_fallback_list() {
        let local = MemorySource::default()
            .with_post("a", &dated("A", "2024-02-01"))
            .with_post("b", &dated("B", "2024-06-01"));
        let loader = loader(vec![Box::new(local)]);

        let posts = loader.get_all_posts().await;
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_all_posts_empty_when_nothing_available() {
        let loader = loader(vec![Box::new(MemorySource::default())])
            .with_fallback_slugs(vec!["gone".into()]);
        assert!(loader.get_all_posts().await.is_empty());
    }
}
