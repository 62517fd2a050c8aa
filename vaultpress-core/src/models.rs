//! Content model structs for source frontmatter and publish results.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

/// Source frontmatter: the arbitrary key/value block at the top of a note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    fields: Mapping,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(fields: Mapping) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(Value::String(key.to_string()), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.fields
    }

    pub fn into_mapping(self) -> Mapping {
        self.fields
    }

    /// The `title` field rendered as a string, if present and non-blank
    pub fn title(&self) -> Option<String> {
        self.get_string("title")
            .filter(|title| !title.trim().is_empty())
    }

    /// Any scalar field rendered as a string
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }
}

/// Render a YAML scalar as text; collections and null have no text form
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// A post written to the published and blog directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPost {
    pub source: PathBuf,
    pub title: String,
    /// `YYYY-MM-DD-<slug>.md`
    pub filename: String,
    /// Diagram files copied into the blog assets directory
    pub assets: Vec<String>,
}

/// A post that could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFailure {
    pub source: PathBuf,
    pub message: String,
}

/// Outcome of one publish run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishReport {
    /// Number of `*.md` files found in the ready directory
    pub found: usize,
    pub published: Vec<PublishedPost>,
    pub failures: Vec<PostFailure>,
}

impl PublishReport {
    pub fn published_filenames(&self) -> Vec<&str> {
        self.published.iter().map(|p| p.filename.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.found == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_accessor() {
        let fm: Frontmatter = serde_yaml::from_str("title: Hello\n").unwrap();
        assert_eq!(fm.title().as_deref(), Some("Hello"));

        let numeric: Frontmatter = serde_yaml::from_str("title: 2024\n").unwrap();
        assert_eq!(numeric.title().as_deref(), Some("2024"));

        let blank: Frontmatter = serde_yaml::from_str("title: '  '\n").unwrap();
        assert_eq!(blank.title(), None);

        let list: Frontmatter = serde_yaml::from_str("title: [a, b]\n").unwrap();
        assert_eq!(list.title(), None);
    }

    #[test]
    fn test_keys_with_spaces() {
        let fm: Frontmatter = serde_yaml::from_str("date created: 2023-01-01\n").unwrap();
        assert!(fm.contains_key("date created"));
        assert_eq!(fm.get_string("date created").as_deref(), Some("2023-01-01"));
    }
}
