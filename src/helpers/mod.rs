//! Helper functions for templates and commands

mod title;
mod url;

pub use title::*;
pub use url::*;
