//! Publish command implementation.

use super::resolve_paths;
use crate::PathArgs;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use vaultpress_core::{Publisher, TracingSink};

/// Convert every ready note and copy it into the blog
pub fn publish_posts(args: &PathArgs, date: Option<DateTime<FixedOffset>>) -> Result<()> {
    let paths = resolve_paths(args)?.into_publish_paths()?;

    tracing::info!("Ready directory: {}", paths.ready.display());
    tracing::info!("Blog posts directory: {}", paths.blog_posts.display());

    let publisher = Publisher::new(paths).with_date(date);
    let report = publisher
        .publish(&mut TracingSink)
        .context("Failed to publish posts")?;

    if report.is_empty() {
        println!("No posts found to publish.");
        return Ok(());
    }

    if !report.published.is_empty() {
        let paths = publisher.paths();
        println!("\nSuccessfully published {} post(s)!", report.published.len());
        println!("Blog posts: {}", paths.blog_posts.display());
        if let Some(assets) = &paths.assets {
            println!("Assets: {}", assets.display());
        }
        if let Some(svg) = &paths.svg {
            println!("SVG source: {}", svg.display());
        }

        println!("\nNext steps:");
        println!("  1. Review the posts in {}", paths.blog_posts.display());
        println!("  2. Commit and push the blog repository");
        println!("  3. Move the published notes out of {}", paths.ready.display());
    }

    if !report.failures.is_empty() {
        eprintln!("\n{} post(s) failed to publish:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.source.display(), failure.message);
        }
    }

    Ok(())
}
