//! Error types for content sources and parsing

use thiserror::Error;

/// Errors raised while talking to a remote content source.
///
/// These never leave the source: the public methods log them and degrade to
/// an empty listing or a missing file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {status}")]
    Status { status: reqwest::StatusCode },

    #[error("Failed to decode base64 content: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors raised while splitting a document into front-matter and body.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("Failed to parse YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid JSON front-matter")]
    UnterminatedJson,
}
