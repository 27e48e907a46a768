//! Posts bundled with the site

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

use super::{slug_from_filename, ContentSource};

/// Reads posts from a directory of markdown files
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Paths tried for a slug, in order
    fn candidates(&self, slug: &str) -> Vec<PathBuf> {
        vec![
            self.dir.join(format!("{}.md", slug)),
            self.dir.join(slug),
        ]
    }
}

/// A slug must name a file directly inside the posts directory
fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.contains('\0')
}

#[async_trait]
impl ContentSource for LocalSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch(&self, slug: &str) -> Option<String> {
        if !is_plain_slug(slug) {
            tracing::warn!("Rejected slug {:?}", slug);
            return None;
        }

        for path in self.candidates(slug) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    tracing::debug!("Loaded {:?}", path);
                    return Some(String::from_utf8_lossy(&bytes).nfc().collect());
                }
                Err(e) => {
                    tracing::trace!("Skipping {:?}: {}", path, e);
                }
            }
        }

        None
    }

    async fn list_slugs(&self) -> Vec<String> {
        if !self.dir.exists() {
            return Vec::new();
        }

        let mut slugs: Vec<String> = WalkDir::new(&self.dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?;
                name.ends_with(".md")
                    .then(|| slug_from_filename(name).to_string())
            })
            .collect();
        slugs.sort();
        slugs
    }
}
