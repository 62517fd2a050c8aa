//! # vaultpress CLI
//!
//! Command-line interface for publishing Obsidian notes to a Jekyll blog.

mod commands;

use chrono::{DateTime, FixedOffset, Local};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vaultpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Date for every published post (e.g. "2024-05-06" or "2024-05-06 07:08:09")
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<DateTime<FixedOffset>>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Directory overrides shared by every command
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Path to configuration file (defaults to ./vaultpress.yml when present)
    #[arg(long, env = "VAULTPRESS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with notes ready to publish
    #[arg(long)]
    ready_dir: Option<PathBuf>,

    /// Directory that keeps a copy of every published post
    #[arg(long)]
    published_dir: Option<PathBuf>,

    /// The blog repository's _posts directory
    #[arg(long)]
    blog_dir: Option<PathBuf>,

    /// Blog assets directory for diagrams
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Directory searched first for SVG and Excalidraw files
    #[arg(long)]
    svg_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish every note in the ready directory (default)
    Publish,

    /// Show the directories a publish run would use
    Paths,
}

fn parse_date_arg(value: &str) -> Result<DateTime<FixedOffset>, String> {
    let offset = *Local::now().fixed_offset().offset();
    vaultpress_core::parse_post_date(value, offset)
        .ok_or_else(|| format!("unrecognized date '{value}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Commands::Publish) {
        Commands::Publish => commands::publish_posts(&cli.paths, cli.date),
        Commands::Paths => commands::show_paths(&cli.paths),
    }
}
