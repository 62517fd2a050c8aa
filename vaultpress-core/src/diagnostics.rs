//! Reporting of non-fatal publish diagnostics.

use vaultpress_types::{Diagnostic, DiagnosticSeverity};

/// Receives diagnostics collected while publishing
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    fn emit_all(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }
}

/// Renders diagnostics through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let post = diagnostic.post_title.as_deref().unwrap_or("-");
        match diagnostic.severity {
            DiagnosticSeverity::Info => {
                tracing::info!(code = %diagnostic.code, post, "{}", diagnostic.message)
            }
            DiagnosticSeverity::Warning => {
                tracing::warn!(code = %diagnostic.code, post, "{}", diagnostic.message)
            }
            DiagnosticSeverity::Error => {
                tracing::error!(code = %diagnostic.code, post, "{}", diagnostic.message)
            }
        }
    }
}

/// Collects diagnostics in memory
impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
