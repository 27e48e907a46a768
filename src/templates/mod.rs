//! Built-in page templates using Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{SiteConfig, SocialLink};
use crate::content::{Difficulty, PostMetadata};
use crate::helpers::{edit_post_url, format_title, post_path};

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        // Post bodies are rendered HTML; free text is escaped in the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("index.html", include_str!("default/index.html")),
            ("post.html", include_str!("default/post.html")),
            ("about.html", include_str!("default/about.html")),
            ("admin.html", include_str!("default/admin.html")),
            ("not_found.html", include_str!("default/not_found.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("default/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("default/partials/header.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("default/partials/post_card.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format a `YYYY-MM-DD` date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "LL".to_string(),
    };

    // "LL" is the long form, like "May 30, 2023"
    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %-d, %Y").to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub repo_url: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            repo_url: config.github.repo_url(),
        }
    }
}

/// A post as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub slug: String,
    pub path: String,
    pub edit_url: String,
    pub title: String,
    pub clean_title: String,
    pub emoji: Option<String>,
    pub date: String,
    pub author: String,
    pub read_time: String,
    pub difficulty: Difficulty,
    pub difficulty_class: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub series: Option<String>,
    pub cover: Option<String>,
}

impl PostCard {
    pub fn new(meta: &PostMetadata, config: &SiteConfig) -> Self {
        let formatted = format_title(&meta.title);
        Self {
            slug: meta.slug.clone(),
            path: post_path(&meta.slug),
            edit_url: edit_post_url(&config.github, &meta.slug),
            title: meta.title.clone(),
            clean_title: formatted.clean_title,
            emoji: formatted.emoji,
            date: meta.date.clone(),
            author: meta.author.clone(),
            read_time: meta.read_time.clone(),
            difficulty: meta.difficulty,
            difficulty_class: meta.difficulty.as_str().to_lowercase(),
            excerpt: meta.excerpt.clone(),
            tags: meta.tags.clone(),
            series: meta.series.clone(),
            cover: meta.cover.clone(),
        }
    }
}

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Count tags across posts, most used first, ties alphabetical
pub fn tag_counts(posts: &[PostMetadata]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    tags
}

/// SEO fields for the document head
#[derive(Debug, Clone, Serialize)]
pub struct SeoData {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_type: String,
    pub image: Option<String>,
    pub published_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutData {
    pub body: String,
    pub social: Vec<SocialLink>,
}
