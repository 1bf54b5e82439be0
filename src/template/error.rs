// ABOUTME: Template error types with SNAFU pattern.
// ABOUTME: Covers source loading, parsing, lookup, and rendering failures.

use snafu::Snafu;
use std::path::PathBuf;

/// Errors from the template store and renderer.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TemplateError {
    #[snafu(display("template source unavailable: {}: {source}", path.display()))]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("template '{name}' failed to parse: {reason}"))]
    Parse { name: String, reason: String },

    #[snafu(display("no template for manifest '{name}' and no default"))]
    NotFound { name: String },

    #[snafu(display("template '{name}' references unknown field '{field}'"))]
    MissingField { name: String, field: String },

    #[snafu(display("failed to render template '{name}': {reason}"))]
    Render { name: String, reason: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateErrorKind {
    /// The template source could not be read.
    SourceUnavailable,
    /// A template body has malformed placeholder syntax.
    Parse,
    /// A manifest matched neither a template nor the default key.
    NotFound,
    /// A placeholder named a field the context does not provide.
    MissingField,
    /// Any other substitution failure.
    Render,
}

impl TemplateError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> TemplateErrorKind {
        match self {
            TemplateError::SourceUnavailable { .. } => TemplateErrorKind::SourceUnavailable,
            TemplateError::Parse { .. } => TemplateErrorKind::Parse,
            TemplateError::NotFound { .. } => TemplateErrorKind::NotFound,
            TemplateError::MissingField { .. } => TemplateErrorKind::MissingField,
            TemplateError::Render { .. } => TemplateErrorKind::Render,
        }
    }
}
