//! CLI command implementations.

pub mod paths;
pub mod publish;

pub use paths::{resolve_paths, show_paths};
pub use publish::publish_posts;
