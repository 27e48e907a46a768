//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable consulted when no token is configured
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // About page
    pub about: String,
    #[serde(default)]
    pub social: Vec<SocialLink>,

    // Content
    /// Directory with bundled posts, relative to the site root
    pub content_dir: String,
    /// Slugs loaded from the local directory when the remote source is empty.
    /// When empty, every markdown file in `content_dir` is used.
    #[serde(default)]
    pub fallback_slugs: Vec<String>,

    // Rendering
    pub highlight_theme: String,

    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "TapsTechie - Tech Blog".to_string(),
            description:
                "Senior Software Engineer sharing insights on Python, Java, and backend development"
                    .to_string(),
            author: "Tarun".to_string(),
            url: "https://taps-techie-blog.vercel.app".to_string(),

            about: String::new(),
            social: Vec::new(),

            content_dir: "content/posts".to_string(),
            fallback_slugs: vec![
                "event-order".to_string(),
                "Bulkhead-Pattern".to_string(),
                "python-magic-methods".to_string(),
            ],

            highlight_theme: "base16-ocean.dark".to_string(),

            github: GitHubConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        config.github.apply_env();
        Ok(config)
    }
}

/// A link shown on the about page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// GitHub content repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Disable to serve only the bundled posts
    pub enabled: bool,
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path of the posts directory inside the repository
    pub posts_path: String,
    /// Optional token; public repositories work without one
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        let mut config = Self {
            enabled: true,
            api_base: "https://api.github.com".to_string(),
            owner: "tarunsha009".to_string(),
            repo: "taps-techie-blog".to_string(),
            branch: "main".to_string(),
            posts_path: "public/content/posts".to_string(),
            token: None,
            timeout: 10,
        };
        config.apply_env();
        config
    }
}

impl GitHubConfig {
    /// Fill an empty token from the environment
    fn apply_env(&mut self) {
        if self.token.as_deref().map_or(true, str::is_empty) {
            self.token = std::env::var(GITHUB_TOKEN_ENV)
                .ok()
                .filter(|t| !t.is_empty());
        }
    }

    /// Web URL of the repository
    pub fn repo_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

/// Cache windows, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory listings from the remote source
    pub listing_ttl: i64,
    /// Individual file contents from the remote source
    pub content_ttl: i64,
    /// The loaded posts collection held by the server
    pub posts_ttl: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            listing_ttl: 60,
            content_ttl: 300,
            posts_ttl: 300,
        }
    }
}
