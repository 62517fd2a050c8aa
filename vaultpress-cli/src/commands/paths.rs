//! Directory resolution shared by every command.

use crate::PathArgs;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use vaultpress_core::{detect_default_paths, Config, PathsConfig};

const DEFAULT_CONFIG_FILE: &str = "vaultpress.yml";

/// Layer command-line flags over the config file over detected defaults
pub fn resolve_paths(args: &PathArgs) -> Result<PathsConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let cli = PathsConfig {
        ready: args.ready_dir.clone(),
        published: args.published_dir.clone(),
        blog_posts: args.blog_dir.clone(),
        assets: args.assets_dir.clone(),
        svg: args.svg_dir.clone(),
    };

    let config = load_config(args.config.as_deref(), &cwd)?;
    let mut paths = match &config {
        Some(config) => cli.or(config.resolved_paths()),
        None => cli,
    };

    if !paths.is_complete() {
        let home = dirs::home_dir();
        let blog_repo = config.as_ref().and_then(|c| c.blog_repo.as_deref());
        paths = paths.or(detect_default_paths(&cwd, home.as_deref(), blog_repo));
    }

    tracing::debug!("Resolved paths: {:?}", paths);
    Ok(paths)
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<Config>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = cwd.join(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };

    tracing::debug!("Loading config from {:?}", path);
    let config = Config::from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(Some(config))
}

/// Print the directories a publish run would use
pub fn show_paths(args: &PathArgs) -> Result<()> {
    let paths = resolve_paths(args)?;

    let show = |label: &str, path: &Option<PathBuf>| match path {
        Some(path) => println!("{label:<12} {}", path.display()),
        None => println!("{label:<12} (not set)"),
    };
    show("ready", &paths.ready);
    show("published", &paths.published);
    show("blog posts", &paths.blog_posts);
    show("assets", &paths.assets);
    show("svg", &paths.svg);

    Ok(())
}
