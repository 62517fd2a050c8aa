//! Configuration parsing, default detection and path layering.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("{message}. Please specify {flag}")]
    MissingDirectory {
        message: &'static str,
        flag: &'static str,
    },

    #[error("SVG source directory does not exist: {0:?}")]
    SvgDirMissing(PathBuf),
}

/// Contents of `vaultpress.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    /// Name of the blog repository directory (e.g. `me.github.io`) used when
    /// detecting default paths
    #[serde(default)]
    pub blog_repo: Option<String>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

/// Directory settings; every field is optional until layering is done
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub ready: Option<PathBuf>,

    #[serde(default)]
    pub published: Option<PathBuf>,

    #[serde(default)]
    pub blog_posts: Option<PathBuf>,

    #[serde(default)]
    pub assets: Option<PathBuf>,

    #[serde(default)]
    pub svg: Option<PathBuf>,
}

/// Fully resolved directories for a publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPaths {
    /// Notes ready to publish (`*.md`)
    pub ready: PathBuf,
    /// Local mirror of converted posts, created if missing
    pub published: PathBuf,
    /// The blog repository's `_posts` directory
    pub blog_posts: PathBuf,
    /// Blog assets directory for diagrams, created if missing
    pub assets: Option<PathBuf>,
    /// Searched first for diagram files
    pub svg: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Directory settings, resolved relative to the config file
    pub fn resolved_paths(&self) -> PathsConfig {
        let resolve = |p: &Option<PathBuf>| p.as_deref().map(|p| self.resolve_path(p));
        PathsConfig {
            ready: resolve(&self.paths.ready),
            published: resolve(&self.paths.published),
            blog_posts: resolve(&self.paths.blog_posts),
            assets: resolve(&self.paths.assets),
            svg: resolve(&self.paths.svg),
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl PathsConfig {
    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: PathsConfig) -> PathsConfig {
        PathsConfig {
            ready: self.ready.or(fallback.ready),
            published: self.published.or(fallback.published),
            blog_posts: self.blog_posts.or(fallback.blog_posts),
            assets: self.assets.or(fallback.assets),
            svg: self.svg.or(fallback.svg),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.ready.is_some()
            && self.published.is_some()
            && self.blog_posts.is_some()
            && self.assets.is_some()
            && self.svg.is_some()
    }

    /// Check required directories are set
    pub fn into_publish_paths(self) -> Result<PublishPaths, ConfigError> {
        let ready = self.ready.ok_or(ConfigError::MissingDirectory {
            message: "Could not find Ready directory",
            flag: "--ready-dir",
        })?;
        let published = self.published.ok_or(ConfigError::MissingDirectory {
            message: "Could not determine published directory",
            flag: "--published-dir",
        })?;
        let blog_posts = self.blog_posts.ok_or(ConfigError::MissingDirectory {
            message: "Could not find blog _posts directory",
            flag: "--blog-dir",
        })?;

        if let Some(svg) = &self.svg {
            if !svg.is_dir() {
                return Err(ConfigError::SvgDirMissing(svg.clone()));
            }
        }

        Ok(PublishPaths {
            ready,
            published,
            blog_posts,
            assets: self.assets,
            svg: self.svg,
        })
    }
}

/// Guess directories from the usual vault and blog repository layout
///
/// - `<cwd>/Blog/Ready` and `<cwd>/Blog/Published` for notes
/// - `<cwd>/Excalidraw` for diagrams
/// - `<repo>/_posts` and `<repo>/assets`, where `<repo>` is `blog_repo` next
///   to `cwd` or under `<home>/git`, or any `*.github.io` directory next to
///   `cwd` when no name is configured
pub fn detect_default_paths(cwd: &Path, home: Option<&Path>, blog_repo: Option<&str>) -> PathsConfig {
    let mut paths = PathsConfig::default();

    let ready = cwd.join("Blog").join("Ready");
    if ready.is_dir() {
        paths.ready = Some(ready);
        paths.published = Some(cwd.join("Blog").join("Published"));

        let excalidraw = cwd.join("Excalidraw");
        if excalidraw.is_dir() {
            paths.svg = Some(excalidraw);
        }
    }

    for repo in blog_repo_candidates(cwd, home, blog_repo) {
        let posts = repo.join("_posts");
        if posts.is_dir() {
            let assets = repo.join("assets");
            tracing::debug!("Detected blog repository at {:?}", repo);
            paths.blog_posts = Some(posts);
            paths.assets = assets.is_dir().then_some(assets);
            break;
        }
    }

    paths
}

fn blog_repo_candidates(cwd: &Path, home: Option<&Path>, blog_repo: Option<&str>) -> Vec<PathBuf> {
    let parent = cwd.parent();

    match blog_repo {
        Some(name) => {
            let mut candidates = Vec::new();
            if let Some(parent) = parent {
                candidates.push(parent.join(name));
            }
            if let Some(home) = home {
                candidates.push(home.join("git").join(name));
            }
            candidates
        }
        None => {
            let Some(parent) = parent else {
                return Vec::new();
            };
            let Ok(entries) = std::fs::read_dir(parent) else {
                return Vec::new();
            };
            let mut found: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_dir()
                        && p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.ends_with(".github.io"))
                })
                .collect();
            found.sort();
            found
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("vaultpress.yml");
        fs::write(
            &config_path,
            r#"
paths:
  ready: "notes/Ready"
  published: "/abs/Published"
blog_repo: "me.github.io"
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        let paths = config.resolved_paths();

        assert_eq!(paths.ready, Some(dir.path().join("notes/Ready")));
        assert_eq!(paths.published, Some(PathBuf::from("/abs/Published")));
        assert_eq!(paths.blog_posts, None);
        assert_eq!(config.blog_repo.as_deref(), Some("me.github.io"));
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("missing.yml")),
            Err(ConfigError::ReadError(_))
        ));

        let bad = dir.path().join("bad.yml");
        fs::write(&bad, "paths: [not, a, map]\n").unwrap();
        assert!(matches!(
            Config::from_file(&bad),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_layering_prefers_earlier_layer() {
        let cli = PathsConfig {
            ready: Some(PathBuf::from("cli-ready")),
            ..Default::default()
        };
        let file = PathsConfig {
            ready: Some(PathBuf::from("file-ready")),
            published: Some(PathBuf::from("file-published")),
            ..Default::default()
        };
        let detected = PathsConfig {
            published: Some(PathBuf::from("detected-published")),
            blog_posts: Some(PathBuf::from("detected-posts")),
            ..Default::default()
        };

        let merged = cli.or(file).or(detected);
        assert_eq!(merged.ready, Some(PathBuf::from("cli-ready")));
        assert_eq!(merged.published, Some(PathBuf::from("file-published")));
        assert_eq!(merged.blog_posts, Some(PathBuf::from("detected-posts")));
        assert_eq!(merged.assets, None);
        assert!(!merged.is_complete());
    }

    #[test]
    fn test_missing_required_directories() {
        let err = PathsConfig::default().into_publish_paths().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find Ready directory. Please specify --ready-dir"
        );

        let err = PathsConfig {
            ready: Some(PathBuf::from("r")),
            published: Some(PathBuf::from("p")),
            ..Default::default()
        }
        .into_publish_paths()
        .unwrap_err();
        assert!(err.to_string().contains("--blog-dir"));
    }

    #[test]
    fn test_svg_dir_must_exist() {
        let err = PathsConfig {
            ready: Some(PathBuf::from("r")),
            published: Some(PathBuf::from("p")),
            blog_posts: Some(PathBuf::from("b")),
            svg: Some(PathBuf::from("/no/such/svg/dir")),
            ..Default::default()
        }
        .into_publish_paths()
        .unwrap_err();
        assert!(matches!(err, ConfigError::SvgDirMissing(_)));
    }

    #[test]
    fn test_detect_vault_layout() {
        let root = tempdir().unwrap();
        let vault = root.path().join("vault");
        fs::create_dir_all(vault.join("Blog").join("Ready")).unwrap();
        fs::create_dir_all(vault.join("Excalidraw")).unwrap();
        let repo = root.path().join("me.github.io");
        fs::create_dir_all(repo.join("_posts")).unwrap();
        fs::create_dir_all(repo.join("assets")).unwrap();

        let paths = detect_default_paths(&vault, None, None);
        assert_eq!(paths.ready, Some(vault.join("Blog").join("Ready")));
        assert_eq!(paths.published, Some(vault.join("Blog").join("Published")));
        assert_eq!(paths.svg, Some(vault.join("Excalidraw")));
        assert_eq!(paths.blog_posts, Some(repo.join("_posts")));
        assert_eq!(paths.assets, Some(repo.join("assets")));
    }

    #[test]
    fn test_detect_named_repo_under_home() {
        let root = tempdir().unwrap();
        let vault = root.path().join("vault");
        fs::create_dir_all(&vault).unwrap();
        let home = root.path().join("home");
        let repo = home.join("git").join("blog");
        fs::create_dir_all(repo.join("_posts")).unwrap();

        let paths = detect_default_paths(&vault, Some(&home), Some("blog"));
        assert_eq!(paths.ready, None);
        assert_eq!(paths.blog_posts, Some(repo.join("_posts")));
        assert_eq!(paths.assets, None);
    }

    #[test]
    fn test_detect_nothing() {
        let root = tempdir().unwrap();
        let vault = root.path().join("empty");
        fs::create_dir_all(&vault).unwrap();

        let paths = detect_default_paths(&vault, Some(root.path()), Some("absent"));
        assert_eq!(paths, PathsConfig::default());
    }
}
