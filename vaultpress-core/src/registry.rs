//! Title → slug index of every post a wikilink may point at.
//!
//! Duplicate titles resolve by traversal order: the existing posts directory
//! is listed in file-name order, the ready batch is applied after it in the
//! order given, and each later file overwrites an earlier entry. File
//! modification times play no part.

use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use crate::slug::slugify;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Case-fold a title into a registry key
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Where a title points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub slug: String,
    /// File the title was read from, if it came from disk
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl PostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the existing posts directory (if any), then the new batch
    ///
    /// Unreadable files and files without a title are skipped; building the
    /// registry never fails.
    pub fn build(existing_posts_dir: Option<&Path>, batch: &[PathBuf]) -> Self {
        let mut registry = Self::new();

        if let Some(dir) = existing_posts_dir.filter(|d| d.is_dir()) {
            for path in list_markdown_files(dir) {
                registry.register_file(&path);
            }
        }

        for path in batch {
            registry.register_file(path);
        }

        tracing::debug!("Post registry holds {} titles", registry.len());
        registry
    }

    /// Insert a title, returning the slug it previously mapped to
    pub fn insert(&mut self, title: &str, slug: impl Into<String>) -> Option<String> {
        let entry = RegistryEntry {
            slug: slug.into(),
            source: None,
        };
        self.insert_entry(title, entry).map(|old| old.slug)
    }

    fn insert_entry(&mut self, title: &str, entry: RegistryEntry) -> Option<RegistryEntry> {
        let source = entry.source.clone();
        let previous = self.entries.insert(normalize_title(title), entry);
        if let Some(old) = &previous {
            tracing::debug!(
                "Title '{}' registered again by {:?} (was {:?})",
                title,
                source,
                old.source
            );
        }
        previous
    }

    /// Insert a title with its derived slug
    pub fn insert_title(&mut self, title: &str) -> Option<String> {
        self.insert(title, slugify(title))
    }

    /// Look up the slug for a link text, ignoring case
    pub fn lookup(&self, link_text: &str) -> Option<&str> {
        self.entries
            .get(&normalize_title(link_text))
            .map(|entry| entry.slug.as_str())
    }

    /// File that registered the title a link text matches
    pub fn source(&self, link_text: &str) -> Option<&Path> {
        self.entries
            .get(&normalize_title(link_text))
            .and_then(|entry| entry.source.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.slug.as_str()))
    }

    fn register_file(&mut self, path: &Path) {
        match read_title(path) {
            Ok(Some(title)) => {
                let entry = RegistryEntry {
                    slug: slugify(&title),
                    source: Some(path.to_path_buf()),
                };
                self.insert_entry(&title, entry);
            }
            Ok(None) => tracing::debug!("No title in {:?}; not indexed", path),
            Err(e) => tracing::debug!("Skipping {:?} while indexing posts: {}", path, e),
        }
    }
}

fn read_title(path: &Path) -> Result<Option<String>, FrontmatterError> {
    let content = fs::read_to_string(path).map_err(|source| FrontmatterError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let Some((frontmatter, _)) = parse_frontmatter(&content)? else {
        return Ok(None);
    };
    Ok(frontmatter.title())
}

/// `*.md` files directly inside `dir`, sorted by file name
pub fn list_markdown_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(|e| e.into_path())
        .collect()
}
