//! Text normalization applied to posts after parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Reading speed used for estimated read times
pub const WORDS_PER_MINUTE: usize = 200;

/// Maximum length of a derived excerpt, in characters
pub const EXCERPT_LENGTH: usize = 160;

/// Characters that show up when UTF-8 bytes were decoded as Latin-1
const MOJIBAKE_MARKERS: [char; 4] = ['Ã', 'Â', 'ð', '\u{FFFD}'];

/// Emoji that must survive rendering untouched
const EMOJI_TABLE: [(&str, &str); 24] = [
    ("🛡️", "🛡️"),
    ("🛳️", "🛳️"),
    ("👉", "👉"),
    ("✅", "✅"),
    ("❌", "❌"),
    ("🔧", "🔧"),
    ("🚀", "🚀"),
    ("💡", "💡"),
    ("⚡", "⚡"),
    ("🎯", "🎯"),
    ("📊", "📊"),
    ("🔍", "🔍"),
    ("💻", "💻"),
    ("🎉", "🎉"),
    ("🏗️", "🏗️"),
    ("🔥", "🔥"),
    ("💪", "💪"),
    ("🤖", "🤖"),
    ("📚", "📚"),
    ("⭐", "⭐"),
    ("🌟", "🌟"),
    ("😄", "😄"),
    ("😉", "😉"),
    ("🕺", "🕺"),
];

lazy_static! {
    static ref FENCED_CODE: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref HEADING: Regex = Regex::new(r"#{1,6}\s+").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`(.*?)`").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref BULLET: Regex = Regex::new(r"(?m)^\s*[-*+]\s+").unwrap();
    static ref NUMBERED: Regex = Regex::new(r"(?m)^\s*\d+\.\s+").unwrap();
    static ref BLANK_LINES: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// Repair text whose UTF-8 bytes were decoded as Latin-1 (`ðŸš€` for `🚀`).
///
/// Only fires when one of the marker characters is present. Each char is
/// narrowed to its low byte and the bytes are decoded again as UTF-8. This is
/// a heuristic and can misfire on correct text that happens to contain a
/// marker.
pub fn fix_mojibake(text: &str) -> String {
    if !text.contains(MOJIBAKE_MARKERS) {
        return text.to_string();
    }

    let bytes: Vec<u8> = text.chars().map(|c| (c as u32 & 0xff) as u8).collect();
    String::from_utf8_lossy(&bytes).nfc().collect()
}

/// Pass known emoji through a fixed table
pub fn process_emojis(text: &str) -> String {
    let mut processed = text.to_string();
    for (emoji, replacement) in EMOJI_TABLE {
        if processed.contains(emoji) {
            processed = processed.replace(emoji, replacement);
        }
    }
    processed
}

/// Estimate read time from the word count
pub fn calculate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}

/// Derive a plain-text excerpt from a markdown body
pub fn extract_excerpt(content: &str) -> String {
    extract_excerpt_with_length(content, EXCERPT_LENGTH)
}

pub fn extract_excerpt_with_length(content: &str, max_length: usize) -> String {
    let text = FENCED_CODE.replace_all(content, "");
    let text = HEADING.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = BULLET.replace_all(&text, "");
    let text = NUMBERED.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, " ");
    let plain = text.trim();

    if plain.chars().count() <= max_length {
        return plain.to_string();
    }

    let truncated: String = plain.chars().take(max_length).collect();
    match truncated.rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &truncated[..pos]),
        _ => format!("{}...", truncated),
    }
}

/// Parse a date string in various formats
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    // Offsets other than RFC 3339 shapes (`+0000`, `GMT`)
    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%a, %d %b %Y %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Normalize a date to `YYYY-MM-DD`, using `today` when it is missing or
/// cannot be parsed
pub fn format_date(date: Option<&str>, today: DateTime<Utc>) -> String {
    date.and_then(parse_date)
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}
