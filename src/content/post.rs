//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::normalize;

/// How much background a post expects from the reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty: {}", s))
    }
}

/// Normalized metadata of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub title: String,
    /// Display date, `YYYY-MM-DD`
    pub date: String,
    pub author: String,
    pub read_time: String,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    pub excerpt: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

impl PostMetadata {
    /// The date posts are ordered by: the publish date if present, else the
    /// display date. `None` when neither parses.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        let date = self
            .date_published
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.date);
        normalize::parse_date(date)
    }
}

/// A fully loaded post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Markdown body after text repair
    pub content: String,
    pub metadata: PostMetadata,
}

/// Sort newest first by effective date. The sort is stable, so posts with
/// equal dates keep their incoming order; undated posts go last.
pub fn sort_by_effective_date(posts: &mut [PostMetadata]) {
    posts.sort_by_cached_key(|p| std::cmp::Reverse(p.effective_date()));
}
