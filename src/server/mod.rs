//! Blog web server: HTML pages, the JSON content API and the sitemap

mod api;
mod pages;
mod sitemap;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cache::{SharedClock, SystemClock, TtlCache};
use crate::config::SiteConfig;
use crate::content::{ContentLoader, MarkdownRenderer, PostMetadata};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Shared state behind every handler
pub struct ServerState {
    pub(crate) config: SiteConfig,
    pub(crate) loader: ContentLoader,
    pub(crate) templates: TemplateRenderer,
    pub(crate) markdown: MarkdownRenderer,
    pub(crate) clock: SharedClock,
    posts: TtlCache<Vec<PostMetadata>>,
}

impl ServerState {
    pub fn new(config: SiteConfig, loader: ContentLoader, clock: SharedClock) -> Result<Self> {
        let posts = TtlCache::new(
            chrono::Duration::seconds(config.cache.posts_ttl),
            clock.clone(),
        );
        Ok(Self {
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_theme(&config.highlight_theme),
            config,
            loader,
            clock,
            posts,
        })
    }

    /// All posts, served from the collection cache while it is fresh
    pub async fn all_posts(&self) -> Vec<PostMetadata> {
        if let Some(posts) = self.posts.get() {
            tracing::debug!("Serving {} posts from cache", posts.len());
            return posts;
        }

        let posts = self.loader.get_all_posts().await;
        // An empty collection usually means every source failed
        if !posts.is_empty() {
            self.posts.set(posts.clone());
        }
        posts
    }

    /// Drop the cached collection so the next request reloads it
    pub fn invalidate(&self) {
        self.posts.clear();
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/blog/:slug", get(pages::post))
        .route("/about", get(pages::about))
        .route("/admin", get(pages::admin))
        .route("/api/content", get(api::content))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/assets/highlight.css", get(pages::highlight_css))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let clock: SharedClock = Arc::new(SystemClock);
    let state = Arc::new(ServerState::new(
        blog.config.clone(),
        blog.loader_with_clock(clock.clone())?,
        clock,
    )?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
