//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the collaborators
//! reached through ports, not contract violations of the domain itself.
//! Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The minifier backend reported unrecoverable errors.
    #[error("Minifier failed: {}", messages.join("\n\n"))]
    BackendFailed { messages: Vec<String> },

    /// The template locator could not process the source.
    #[error("Could not locate templates in {file}: {reason}")]
    LocatorFailed { file: String, reason: String },

    /// Reading a source through the source provider failed.
    #[error("Cannot read {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// Writing output through the source provider failed.
    #[error("Cannot write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// The backend does not implement an optional operation.
    #[error("Minifier backend does not support {operation}")]
    Unsupported { operation: &'static str },
}

impl ApplicationError {
    /// Shorthand for a backend failure with a single message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendFailed {
            messages: vec![message.into()],
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BackendFailed { .. } => vec![
                "The template content could not be minified".into(),
                "Check the template for unbalanced markup or invalid CSS".into(),
                "Or disable style minification with --no-css".into(),
            ],
            Self::LocatorFailed { file, .. } => vec![
                format!("Failed to parse: {file}"),
                "Check that the file is valid JavaScript or TypeScript".into(),
            ],
            Self::SourceUnavailable { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Check that the file exists and is readable".into(),
            ],
            Self::WriteFailed { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::Unsupported { operation } => vec![
                format!("The configured backend cannot perform {operation}"),
                "Use the default backend or disable that mode".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BackendFailed { .. } => ErrorCategory::Validation,
            Self::LocatorFailed { .. } => ErrorCategory::Validation,
            Self::SourceUnavailable { .. } => ErrorCategory::NotFound,
            Self::WriteFailed { .. } => ErrorCategory::Internal,
            Self::Unsupported { .. } => ErrorCategory::Configuration,
        }
    }
}
