//! URL helper functions

use crate::config::{GitHubConfig, SiteConfig};

/// Site-relative path of a post page
///
/// # Examples
/// ```ignore
/// post_path("event-order") // -> "/blog/event-order"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", encode_segment(slug))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// GitHub web editor link for an existing post
pub fn edit_post_url(github: &GitHubConfig, slug: &str) -> String {
    format!(
        "{}/edit/{}/{}/{}.md",
        github.repo_url(),
        github.branch,
        github.posts_path.trim_matches('/'),
        encode_segment(slug)
    )
}

/// GitHub web link for creating a file in the posts directory
pub fn new_post_url(github: &GitHubConfig) -> String {
    format!(
        "{}/new/{}/{}",
        github.repo_url(),
        github.branch,
        github.posts_path.trim_matches('/')
    )
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, percent_encoding::NON_ALPHANUMERIC)
        .to_string()
        // Unreserved characters read better unescaped
        .replace("%2D", "-")
        .replace("%5F", "_")
        .replace("%2E", ".")
        .replace("%7E", "~")
}
