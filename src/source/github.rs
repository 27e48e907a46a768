//! GitHub contents API as a post source

use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Duration;
use futures::future::join_all;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use super::{slug_from_filename, ContentSource, RawPost};
use crate::cache::{SharedClock, TtlCache, TtlMap};
use crate::config::{CacheConfig, GitHubConfig};
use crate::error::SourceError;

/// Characters escaped when a slug is placed in a URL path
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An entry returned by the contents endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubFile {
    pub name: String,
    pub path: String,
    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Client for the posts directory of one repository
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    posts_path: String,
    token: Option<String>,
    listing_cache: TtlCache<Vec<GitHubFile>>,
    content_cache: TtlMap<String, String>,
}

impl GitHubClient {
    /// Create a client from configuration
    pub fn new(config: &GitHubConfig, cache: &CacheConfig, clock: SharedClock) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(concat!("techblog/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            posts_path: config.posts_path.trim_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            listing_cache: TtlCache::new(Duration::seconds(cache.listing_ttl), clock.clone()),
            content_cache: TtlMap::new(Duration::seconds(cache.content_ttl), clock),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    async fn request_listing(&self) -> Result<Vec<GitHubFile>, SourceError> {
        let response = self.get(&self.contents_url(&self.posts_path)).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }

    async fn request_file(&self, path: &str) -> Result<Option<String>, SourceError> {
        let response = self.get(&self.contents_url(path)).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status(),
            });
        }
        let file: GitHubFile = response.json().await?;

        if let Some(text) = decode_inline_content(&file)? {
            return Ok(Some(text));
        }

        // Large files come without inline content
        match &file.download_url {
            Some(url) => {
                let response = self.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(SourceError::Status {
                        status: response.status(),
                    });
                }
                Ok(Some(response.text().await?))
            }
            None => Ok(None),
        }
    }

    /// List the markdown files in the posts directory.
    /// Failures are logged and yield an empty list.
    pub async fn list_post_files(&self) -> Vec<GitHubFile> {
        if let Some(files) = self.listing_cache.get() {
            return files;
        }

        match self.request_listing().await {
            Ok(files) => {
                let files: Vec<GitHubFile> = files
                    .into_iter()
                    .filter(|f| f.kind == "file" && f.name.ends_with(".md"))
                    .collect();
                tracing::debug!("Listed {} post files on GitHub", files.len());
                self.listing_cache.set(files.clone());
                files
            }
            Err(e) => {
                tracing::error!("Error fetching post files: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch the text of one file. Failures are logged and yield `None`.
    pub async fn get_file_content(&self, path: &str) -> Option<String> {
        let key = path.to_string();
        if let Some(content) = self.content_cache.get(&key) {
            return Some(content);
        }

        match self.request_file(path).await {
            Ok(Some(content)) => {
                self.content_cache.insert(key, content.clone());
                Some(content)
            }
            Ok(None) => {
                tracing::debug!("GitHub returned no content for {}", path);
                None
            }
            Err(e) => {
                tracing::error!("Error fetching file content for {}: {}", path, e);
                None
            }
        }
    }

    /// Fetch every post concurrently. Files whose content cannot be fetched
    /// are dropped; the rest keep the listing order.
    pub async fn get_all_posts(&self) -> Vec<RawPost> {
        let files = self.list_post_files().await;
        let fetches = files.iter().map(|file| async move {
            self.get_file_content(&file.path)
                .await
                .map(|content| RawPost {
                    slug: slug_from_filename(&file.name).to_string(),
                    content,
                })
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Fetch a single post by slug
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<String> {
        let path = format!(
            "{}/{}.md",
            self.posts_path,
            utf8_percent_encode(slug, PATH_SEGMENT)
        );
        self.get_file_content(&path).await
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    fn name(&self) -> &str {
        "github"
    }

    async fn fetch(&self, slug: &str) -> Option<String> {
        self.get_post_by_slug(slug).await
    }

    async fn fetch_all(&self) -> Vec<RawPost> {
        self.get_all_posts().await
    }
}

/// Decode content embedded in a contents response, if it is base64
fn decode_inline_content(file: &GitHubFile) -> Result<Option<String>, SourceError> {
    let Some(content) = file.content.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    match file.encoding.as_deref() {
        Some("base64") => {
            // GitHub wraps the payload at 60 columns
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = STANDARD.decode(compact)?;
            Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Some("none") | None => Ok(None),
        Some(other) => {
            tracing::debug!("Ignoring inline {} content of {}", other, file.path);
            Ok(None)
        }
    }
}
