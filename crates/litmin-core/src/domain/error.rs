// ============================================================================
// domain/error.rs - CONTRACT VIOLATIONS OF THE LITERAL-MINIFICATION DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is deterministic given the same source and configuration,
/// so none of them is ever retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Codec Errors
    // ========================================================================
    #[error("placeholder must be a non-empty string")]
    PlaceholderInvalid,

    #[error(
        "split returned {actual} parts for a template with {expected} parts \
         (the minifier did not preserve every expression placeholder)"
    )]
    PartCountMismatch { expected: usize, actual: usize },

    // ========================================================================
    // Edit Buffer Errors
    // ========================================================================
    #[error("overwrite [{start},{end}) overlaps an existing overwrite [{other_start},{other_end})")]
    OverlappingEdit {
        start: usize,
        end: usize,
        other_start: usize,
        other_end: usize,
    },

    #[error("overwrite [{start},{end}) is not a non-empty range within the source (length {len})")]
    EditOutOfRange { start: usize, end: usize, len: usize },

    #[error("overwrite [{start},{end}) does not fall on character boundaries")]
    EditNotOnCharBoundary { start: usize, end: usize },

    #[error("template at byte {start} has overlapping or unordered segments")]
    UnorderedParts { start: usize },

    // ========================================================================
    // Source Map Errors
    // ========================================================================
    #[error("failed to build source map: {0}")]
    InvalidSourceMap(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PlaceholderInvalid => vec![
                "The configured minifier backend produced an empty placeholder".into(),
                "Check the backend's placeholder implementation".into(),
            ],
            Self::PartCountMismatch { expected, actual } => vec![
                format!("Expected {expected} literal segments, the minifier produced {actual}"),
                "The minifier removed or duplicated an expression placeholder".into(),
                "Disable minification for this template or adjust the minifier options".into(),
            ],
            Self::OverlappingEdit { .. }
            | Self::EditOutOfRange { .. }
            | Self::EditNotOnCharBoundary { .. }
            | Self::UnorderedParts { .. } => vec![
                "The template locator reported overlapping or invalid segment ranges".into(),
                "This is a bug in the locator, please report it".into(),
            ],
            Self::InvalidSourceMap(_) => vec!["Retry with source maps disabled".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PlaceholderInvalid | Self::PartCountMismatch { .. } => ErrorCategory::Validation,
            Self::OverlappingEdit { .. }
            | Self::EditOutOfRange { .. }
            | Self::EditNotOnCharBoundary { .. }
            | Self::UnorderedParts { .. }
            | Self::InvalidSourceMap(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
