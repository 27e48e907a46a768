//! Content sources - where raw post documents come from
//!
//! The loader holds an ordered list of sources and takes the first one that
//! has something to offer.

mod github;
mod local;

pub use github::{GitHubClient, GitHubFile};
pub use local::LocalSource;

use async_trait::async_trait;

/// A raw document paired with its slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub slug: String,
    pub content: String,
}

/// A place posts can be read from
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Raw text of the post with this slug, if the source has it
    async fn fetch(&self, slug: &str) -> Option<String>;

    /// Every post the source can enumerate. Sources that cannot list their
    /// contents return nothing.
    async fn fetch_all(&self) -> Vec<RawPost> {
        Vec::new()
    }

    /// Slugs the source knows about without reading them
    async fn list_slugs(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Slug of a post file: its name without the `.md` extension
pub fn slug_from_filename(name: &str) -> &str {
    name.strip_suffix(".md").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_filename() {
        assert_eq!(slug_from_filename("event-order.md"), "event-order");
        assert_eq!(slug_from_filename("notes.md.md"), "notes.md");
        assert_eq!(slug_from_filename("README"), "README");
    }
}
