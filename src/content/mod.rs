//! Content module - posts, front-matter, normalization and rendering

mod frontmatter;
pub mod loader;
mod markdown;
pub mod normalize;
mod post;
mod scaffold;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::{html_escape, MarkdownRenderer};
pub use post::{sort_by_effective_date, Difficulty, Post, PostMetadata};
pub use scaffold::{post_scaffold, PLACEHOLDER_TITLE};
