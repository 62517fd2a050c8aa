//! Publishing logic - converts ready notes and writes Jekyll posts.

use crate::{
    assets::{AssetError, AssetLocator},
    config::PublishPaths,
    diagnostics::DiagnosticSink,
    frontmatter::split_frontmatter,
    jekyll::JekyllFrontmatter,
    links::LinkPipeline,
    models::{PostFailure, PublishReport, PublishedPost},
    registry::{list_markdown_files, PostRegistry},
    slug::slugify,
};
use chrono::{DateTime, FixedOffset, Local};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vaultpress_types::{AssetDescriptor, Diagnostic};

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Ready directory not found: {0:?}")]
    ReadyDirMissing(PathBuf),

    #[error("Blog posts directory not found: {0:?}")]
    BlogDirMissing(PathBuf),

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("{filename} was already published from {previous:?} in this run")]
    DuplicateOutput { filename: String, previous: PathBuf },
}

/// A converted post that has not been written yet
#[derive(Debug, Clone)]
pub struct PreparedPost {
    pub source: PathBuf,
    pub title: String,
    pub filename: String,
    pub contents: String,
    pub assets: Vec<AssetDescriptor>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Title for a note without a `title` field: `my-first-note` → `My First Note`
///
/// Hyphens become spaces. A letter is upper-cased when it follows anything
/// that is not a letter (`my_note` → `My_Note`) and lower-cased otherwise.
pub fn title_from_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut title = String::with_capacity(stem.len());
    let mut after_letter = false;
    for c in stem.chars().map(|c| if c == '-' { ' ' } else { c }) {
        let cased = c.is_uppercase() || c.is_lowercase();
        if !cased {
            title.push(c);
        } else if after_letter {
            title.extend(c.to_lowercase());
        } else {
            title.extend(c.to_uppercase());
        }
        after_letter = cased;
    }
    title
}

/// Main publisher
pub struct Publisher {
    paths: PublishPaths,
    explicit_date: Option<DateTime<FixedOffset>>,
    now: DateTime<FixedOffset>,
    locator: AssetLocator,
}

impl Publisher {
    pub fn new(paths: PublishPaths) -> Self {
        let locator = AssetLocator::new(paths.svg.clone());
        Self {
            paths,
            explicit_date: None,
            now: Local::now().fixed_offset(),
            locator,
        }
    }

    /// Date written into every post instead of `date created` or now
    pub fn with_date(mut self, date: Option<DateTime<FixedOffset>>) -> Self {
        self.explicit_date = date;
        self
    }

    /// Fix the publish time (output filenames and fallback dates)
    pub fn with_clock(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now;
        self
    }

    pub fn paths(&self) -> &PublishPaths {
        &self.paths
    }

    /// Publish every note in the ready directory
    ///
    /// Missing ready or blog directories abort the run. Anything that goes
    /// wrong with a single post is recorded in the report and the batch
    /// carries on.
    pub fn publish(&self, sink: &mut dyn DiagnosticSink) -> Result<PublishReport, PublishError> {
        if !self.paths.ready.is_dir() {
            return Err(PublishError::ReadyDirMissing(self.paths.ready.clone()));
        }
        if !self.paths.blog_posts.is_dir() {
            return Err(PublishError::BlogDirMissing(self.paths.blog_posts.clone()));
        }
        fs::create_dir_all(&self.paths.published).map_err(|source| PublishError::CreateDir {
            path: self.paths.published.clone(),
            source,
        })?;

        let ready_files = list_markdown_files(&self.paths.ready);
        let mut report = PublishReport {
            found: ready_files.len(),
            ..Default::default()
        };

        if ready_files.is_empty() {
            tracing::info!("No posts found in {:?}", self.paths.ready);
            return Ok(report);
        }

        tracing::info!("Found {} post(s) to publish", ready_files.len());

        let registry = PostRegistry::build(Some(&self.paths.blog_posts), &ready_files);
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();

        for path in &ready_files {
            match self.publish_one(path, &registry, &mut claimed, sink) {
                Ok(post) => report.published.push(post),
                Err(e) => {
                    let name = display_name(path);
                    sink.emit(
                        Diagnostic::error("post.failed", format!("✗ Error converting {name}: {e}"))
                            .with_source_path(path.display().to_string()),
                    );
                    report.failures.push(PostFailure {
                        source: path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("Successfully published {} post(s)", report.published.len());
        Ok(report)
    }

    fn publish_one(
        &self,
        path: &Path,
        registry: &PostRegistry,
        claimed: &mut HashMap<String, PathBuf>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PublishedPost, PublishError> {
        let prepared = self.prepare_post(path, registry)?;
        if let Some(previous) = claimed.get(&prepared.filename) {
            return Err(PublishError::DuplicateOutput {
                filename: prepared.filename,
                previous: previous.clone(),
            });
        }
        claimed.insert(prepared.filename.clone(), path.to_path_buf());
        self.write_post(prepared, sink)
    }

    /// Convert and write a single note
    pub fn convert_post(
        &self,
        path: &Path,
        registry: &PostRegistry,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PublishedPost, PublishError> {
        let prepared = self.prepare_post(path, registry)?;
        self.write_post(prepared, sink)
    }

    /// Convert a note in memory without touching the output directories
    pub fn prepare_post(&self, path: &Path, registry: &PostRegistry) -> Result<PreparedPost, PublishError> {
        tracing::info!("Converting: {}", display_name(path));

        let content = fs::read_to_string(path).map_err(|source| PublishError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (frontmatter, body) = split_frontmatter(&content);

        let title = frontmatter.title().unwrap_or_else(|| title_from_stem(path));
        let links = LinkPipeline::new(registry).process(&body, &title);

        let jekyll = JekyllFrontmatter::from_source(&frontmatter, &title, self.explicit_date, self.now);
        let filename = format!("{}-{}.md", self.now.format("%Y-%m-%d"), slugify(&title));

        Ok(PreparedPost {
            source: path.to_path_buf(),
            contents: jekyll.render_post(&links.content)?,
            title,
            filename,
            assets: links.assets,
            diagnostics: links.diagnostics,
        })
    }

    /// Copy a prepared post's assets, then write it to both output directories
    ///
    /// A failed asset copy leaves no post behind in either directory.
    pub fn write_post(
        &self,
        prepared: PreparedPost,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PublishedPost, PublishError> {
        let PreparedPost {
            source,
            title,
            filename,
            contents,
            assets,
            diagnostics,
        } = prepared;

        sink.emit_all(
            diagnostics
                .into_iter()
                .map(|d| d.with_source_path(source.display().to_string()))
                .collect(),
        );

        let copied = self.copy_assets(&assets, &source, &title, sink)?;

        let published_file = self.paths.published.join(&filename);
        fs::write(&published_file, &contents).map_err(|source| PublishError::Write {
            path: published_file.clone(),
            source,
        })?;

        let blog_file = self.paths.blog_posts.join(&filename);
        fs::copy(&published_file, &blog_file).map_err(|source| PublishError::Write {
            path: blog_file.clone(),
            source,
        })?;

        tracing::info!("✓ Published: {}", filename);
        Ok(PublishedPost {
            source,
            title,
            filename,
            assets: copied,
        })
    }

    fn copy_assets(
        &self,
        assets: &[AssetDescriptor],
        source: &Path,
        title: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<String>, PublishError> {
        if assets.is_empty() {
            return Ok(Vec::new());
        }
        let Some(target) = &self.paths.assets else {
            tracing::debug!(
                "No assets directory configured; {} embed(s) in '{}' not copied",
                assets.len(),
                title
            );
            return Ok(Vec::new());
        };

        let source_dir = source.parent().unwrap_or_else(|| Path::new("."));
        let report = self.locator.copy_assets(assets, source_dir, target)?;
        sink.emit_all(
            report
                .diagnostics
                .into_iter()
                .map(|d| d.with_post_title(title))
                .collect(),
        );
        Ok(report.copied)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
