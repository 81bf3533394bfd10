//! Text cleanup helpers for HTML-bearing ADO fields.
//!
//! Work item descriptions, acceptance criteria, and discussion comments come
//! back from the REST API as HTML fragments. Everything rendered into a context
//! goes through `clean_html` first so the model sees plain text.

use regex::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Strip HTML tags, decode the common entities, and collapse whitespace.
///
/// This is lossy by design: formatting carries no weight in a generation
/// context, only the text content does.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let without_tags = tag_re().replace_all(html, "");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    whitespace_re()
        .replace_all(&decoded, " ")
        .trim()
        .to_string()
}

/// Length of a string in Unicode scalar values.
///
/// The context budget counts characters, not bytes, so multi-byte text
/// (names, non-Latin descriptions) doesn't get over-penalized.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max` characters, at a char boundary.
///
/// Returns the input unchanged if it already fits.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if char_len(s) <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}
