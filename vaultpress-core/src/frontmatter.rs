//! Frontmatter extraction from markdown notes.

use crate::models::Frontmatter;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Frontmatter is not a key/value mapping")]
    NotAMapping,
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)(.*)\z")
            .expect("valid frontmatter regex")
    })
}

/// Parse frontmatter strictly
///
/// Returns `Ok(None)` when the document has no delimited block, and an error
/// when the block exists but is not a YAML mapping.
pub fn parse_frontmatter(content: &str) -> Result<Option<(Frontmatter, String)>, FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok(None);
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let fields = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    Ok(Some((Frontmatter::from_mapping(fields), body.to_string())))
}

/// Split a document into frontmatter and body
///
/// Never fails: a missing closing delimiter or malformed YAML yields an empty
/// mapping and the whole document, delimiters included, as the body.
///
/// # Example
///
/// ```
/// use vaultpress_core::frontmatter::split_frontmatter;
///
/// let (fm, body) = split_frontmatter("---\ntitle: My Post\n---\n\n# Hello\n");
/// assert_eq!(fm.title().as_deref(), Some("My Post"));
/// assert_eq!(body, "\n# Hello\n");
/// ```
pub fn split_frontmatter(content: &str) -> (Frontmatter, String) {
    match parse_frontmatter(content) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => (Frontmatter::default(), content.to_string()),
        Err(e) => {
            tracing::debug!("Ignoring malformed frontmatter: {}", e);
            (Frontmatter::default(), content.to_string())
        }
    }
}

/// Read a file and split it into frontmatter and body
pub fn read_frontmatter(path: &Path) -> Result<(Frontmatter, String), FrontmatterError> {
    let content = std::fs::read_to_string(path).map_err(|source| FrontmatterError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(split_frontmatter(&content))
}
