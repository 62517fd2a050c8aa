//! Shared types for vaultpress
//!
//! This crate provides the plain data types passed between the link
//! pipeline, the asset locator and the publisher: wikilink tokens, asset
//! descriptors, and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `[[target]]` or `![[target]]` token found in post content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WikiLink {
    /// Text between the brackets, verbatim
    pub raw_text: String,
    /// True when the token was prefixed with `!`
    pub is_embed: bool,
}

impl WikiLink {
    pub fn new(raw_text: impl Into<String>, is_embed: bool) -> Self {
        Self {
            raw_text: raw_text.into(),
            is_embed,
        }
    }

    pub fn link(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, false)
    }

    pub fn embed(raw_text: impl Into<String>) -> Self {
        Self::new(raw_text, true)
    }

    pub fn as_str(&self) -> &str {
        &self.raw_text
    }
}

/// A diagram file referenced by an embed, to be located and copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Link text as written in the note
    pub original: String,
    /// Filename the published post refers to
    pub svg_filename: String,
    /// Stem of an `.excalidraw` embed, used to build the `.excalidraw.svg` candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
}

impl AssetDescriptor {
    pub fn svg(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            svg_filename: original.clone(),
            original,
            base_name: None,
        }
    }

    pub fn excalidraw(original: impl Into<String>, base_name: impl Into<String>) -> Self {
        let base_name = base_name.into();
        Self {
            original: original.into(),
            svg_filename: format!("{base_name}.svg"),
            base_name: Some(base_name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Info => "info",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Error => "error",
        }
    }
}

/// A non-fatal event raised while publishing a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable machine-readable code, e.g. `link.unresolved`
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    /// The link text, filename or other subject the diagnostic is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: DiagnosticSeverity::Warning,
            post_title: None,
            source_path: None,
            context: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            ..Self::warning(code, message)
        }
    }

    pub fn with_post_title(mut self, title: impl Into<String>) -> Self {
        self.post_title = Some(title.into());
        self
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
