//! # vaultpress-core
//!
//! Core library for publishing Obsidian notes as Jekyll blog posts.
//!
//! This crate provides frontmatter extraction, the wikilink resolution
//! pipeline, the cross-post registry, diagram asset copying, and the
//! publisher that ties them together.

pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod frontmatter;
pub mod jekyll;
pub mod links;
pub mod models;
pub mod publisher;
pub mod registry;
pub mod shield;
pub mod slug;

pub use assets::{AssetCopyReport, AssetLocator};
pub use config::{detect_default_paths, Config, PathsConfig, PublishPaths};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use jekyll::{parse_post_date, JekyllFrontmatter};
pub use links::{convert_links, LinkOutput, LinkPipeline, Resolution, Resolver};
pub use models::{Frontmatter, PostFailure, PublishReport, PublishedPost};
pub use publisher::{PublishError, Publisher};
pub use registry::{PostRegistry, RegistryEntry};
pub use slug::slugify;
pub use vaultpress_types::{AssetDescriptor, Diagnostic, DiagnosticSeverity, WikiLink};
