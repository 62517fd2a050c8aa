//! Slug generation for post filenames and permalinks.

use regex::Regex;
use std::sync::OnceLock;

static DISALLOWED_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn disallowed_regex() -> &'static Regex {
    DISALLOWED_REGEX.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug regex"))
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Convert a post title to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Drop everything outside `[a-z0-9]`, whitespace and hyphens (non-ASCII
///   letters are removed, not transliterated)
/// - Collapse each whitespace run into a single hyphen
/// - Trim leading/trailing hyphens
///
/// Literal hyphens are kept as-is, so `"Part 1 - X"` becomes `"part-1---x"`.
///
/// # Examples
///
/// ```
/// use vaultpress_core::slugify;
///
/// assert_eq!(slugify("My First Post"), "my-first-post");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("Café"), "caf");
/// ```
pub fn slugify(title: &str) -> String {
    let lowercased = title.to_lowercase();
    let cleaned = disallowed_regex().replace_all(&lowercased, "");
    let collapsed = whitespace_regex().replace_all(cleaned.trim(), "-");

    collapsed.trim_matches('-').to_string()
}
