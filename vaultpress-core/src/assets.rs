//! Locating and copying diagram files referenced by embeds.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vaultpress_types::{AssetDescriptor, Diagnostic};

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to create assets directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files copied for one post, and the embeds that could not be found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCopyReport {
    pub copied: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Filenames to look for, most specific first
pub fn candidate_filenames(asset: &AssetDescriptor) -> Vec<String> {
    let mut candidates = vec![asset.svg_filename.clone()];
    if let Some(base) = &asset.base_name {
        if asset.original.ends_with(".excalidraw") {
            candidates.push(format!("{base}.excalidraw.svg"));
        }
    }
    candidates
}

/// Searches, in order: the dedicated SVG directory, the post's directory,
/// and the `assets` folder next to the post's directory.
#[derive(Debug, Clone, Default)]
pub struct AssetLocator {
    svg_dir: Option<PathBuf>,
}

impl AssetLocator {
    pub fn new(svg_dir: Option<PathBuf>) -> Self {
        Self { svg_dir }
    }

    pub fn search_dirs(&self, source_dir: &Path) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(svg_dir) = &self.svg_dir {
            dirs.push(svg_dir.clone());
        }
        dirs.push(source_dir.to_path_buf());
        if let Some(parent) = source_dir.parent() {
            dirs.push(parent.join("assets"));
        }
        dirs
    }

    /// First existing file for the descriptor, if any
    pub fn locate(&self, asset: &AssetDescriptor, source_dir: &Path) -> Option<PathBuf> {
        let candidates = candidate_filenames(asset);
        self.search_dirs(source_dir).into_iter().find_map(|dir| {
            candidates
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Copy every locatable asset into `target_dir`
    ///
    /// Each file lands under the name the post refers to (the file part of
    /// `svg_filename`). Missing assets become diagnostics.
    pub fn copy_assets(
        &self,
        assets: &[AssetDescriptor],
        source_dir: &Path,
        target_dir: &Path,
    ) -> Result<AssetCopyReport, AssetError> {
        fs::create_dir_all(target_dir).map_err(|source| AssetError::CreateDir {
            path: target_dir.to_path_buf(),
            source,
        })?;

        let mut report = AssetCopyReport::default();
        for asset in assets {
            let Some(found) = self.locate(asset, source_dir) else {
                let tried = candidate_filenames(asset).join(", ");
                tracing::debug!("No file for embed '{}' (tried {})", asset.original, tried);
                report.diagnostics.push(
                    Diagnostic::warning(
                        "asset.missing",
                        format!("Could not find SVG for '{}' (tried {})", asset.original, tried),
                    )
                    .with_context(asset.original.clone()),
                );
                continue;
            };

            let file_name = target_file_name(asset);
            let dest = target_dir.join(&file_name);
            if same_file(&found, &dest) {
                tracing::debug!("{:?} is already in place", dest);
            } else {
                fs::copy(&found, &dest).map_err(|source| AssetError::Copy {
                    from: found.clone(),
                    to: dest.clone(),
                    source,
                })?;
                tracing::info!("Copied asset {}", file_name);
            }
            report.copied.push(file_name);
        }

        Ok(report)
    }
}

fn target_file_name(asset: &AssetDescriptor) -> String {
    Path::new(&asset.svg_filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| asset.svg_filename.clone())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
