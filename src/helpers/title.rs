//! Splitting a decorative emoji off post titles

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMOJI: Regex = Regex::new(
        r"^[\x{1F600}-\x{1F64F}]|[\x{1F300}-\x{1F5FF}]|[\x{1F680}-\x{1F6FF}]|[\x{1F1E0}-\x{1F1FF}]|[\x{2600}-\x{26FF}]|[\x{2700}-\x{27BF}]"
    )
    .unwrap();
    static ref LEADING_SYMBOLS: Regex = Regex::new(r"^[^\w\s]+").unwrap();
}

/// A title split into its text and an optional leading emoji
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FormattedTitle {
    pub clean_title: String,
    pub emoji: Option<String>,
}

/// Title with emoji and leading symbols removed
pub fn clean_title(title: &str) -> String {
    let without_emoji = EMOJI
        .replace_all(title, "")
        .replace(['\u{FE0F}', '\u{200D}'], "");
    let trimmed = without_emoji.trim_start();
    LEADING_SYMBOLS.replace(trimmed, "").trim().to_string()
}

/// The first emoji in the title, if any
pub fn extract_emoji(title: &str) -> Option<String> {
    EMOJI.find(title).map(|m| m.as_str().to_string())
}

pub fn format_title(title: &str) -> FormattedTitle {
    FormattedTitle {
        clean_title: clean_title(title),
        emoji: extract_emoji(title),
    }
}
