//! Masking of fenced and inline code before wikilink scanning.
//!
//! Code spans are swapped for `\u{E000}CODE<n>\u{E001}` placeholders. The
//! delimiters are Unicode private-use characters, so a placeholder can neither
//! occur in a note by accident nor be mistaken for a wikilink.

use regex::{Captures, Regex};
use std::sync::OnceLock;

static FENCED_REGEX: OnceLock<Regex> = OnceLock::new();
static INLINE_REGEX: OnceLock<Regex> = OnceLock::new();
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn fenced_regex() -> &'static Regex {
    FENCED_REGEX.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("valid fence regex"))
}

fn inline_regex() -> &'static Regex {
    INLINE_REGEX.get_or_init(|| Regex::new(r"`[^`\n]+`").expect("valid inline code regex"))
}

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new("\u{E000}CODE([0-9]+)\u{E001}").expect("valid placeholder regex"))
}

fn placeholder(index: usize) -> String {
    format!("\u{E000}CODE{index}\u{E001}")
}

/// Restore table produced by [`shield`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeShield {
    originals: Vec<String>,
}

impl CodeShield {
    /// Put every masked span back in place
    pub fn restore(&self, text: &str) -> String {
        placeholder_regex()
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.originals.get(idx))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Masked spans in discovery order
    pub fn originals(&self) -> &[String] {
        &self.originals
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    fn mask(&mut self, text: &str, re: &Regex) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in re.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            out.push_str(&placeholder(self.originals.len()));
            self.originals.push(m.as_str().to_string());
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Mask fenced blocks, then inline code spans
///
/// A fence ends at the first closing triple backtick; nested fences are not
/// recognised.
pub fn shield(content: &str) -> (String, CodeShield) {
    let mut table = CodeShield::default();
    let fenced = table.mask(content, fenced_regex());
    let masked = table.mask(&fenced, inline_regex());
    (masked, table)
}
