//! techblog: a personal tech blog served from markdown posts
//!
//! Posts are fetched from a GitHub content repository through the contents
//! API, with the bundled `content/posts` directory as a fallback, and are
//! rendered through Tera templates embedded in the binary.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod source;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cache::{SharedClock, SystemClock};
use content::ContentLoader;
use source::{ContentSource, GitHubClient, LocalSource};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory of bundled posts
    pub content_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Content sources in lookup order: GitHub when enabled, then local files
    pub fn sources(&self, clock: SharedClock) -> Result<Vec<Box<dyn ContentSource>>> {
        let mut sources: Vec<Box<dyn ContentSource>> = Vec::new();
        if self.config.github.enabled {
            sources.push(Box::new(GitHubClient::new(
                &self.config.github,
                &self.config.cache,
                clock,
            )?));
        }
        sources.push(Box::new(LocalSource::new(&self.content_dir)));
        Ok(sources)
    }

    /// Content loader running on the wall clock
    pub fn loader(&self) -> Result<ContentLoader> {
        self.loader_with_clock(Arc::new(SystemClock))
    }

    pub fn loader_with_clock(&self, clock: SharedClock) -> Result<ContentLoader> {
        Ok(ContentLoader::new(self.sources(clock.clone())?)
            .with_fallback_slugs(self.config.fallback_slugs.clone())
            .with_default_author(self.config.author.clone())
            .with_clock(clock))
    }

    /// Create a new post in the local content directory
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}
