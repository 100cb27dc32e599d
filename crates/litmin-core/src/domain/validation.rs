use crate::domain::{TemplatePart, error::DomainError};

/// Centralized shape checks applied between the codec steps.
///
/// All validation logic lives here, not scattered across the orchestrator.
pub struct DomainValidator;

impl DomainValidator {
    /// A placeholder must be non-empty; an empty one would "split" on every
    /// character boundary.
    pub fn validate_placeholder(placeholder: &str) -> Result<(), DomainError> {
        if placeholder.is_empty() {
            return Err(DomainError::PlaceholderInvalid);
        }
        Ok(())
    }

    /// The split result must have exactly one entry per original part.
    pub fn validate_parts(parts: &[TemplatePart], minified: &[String]) -> Result<(), DomainError> {
        if parts.len() != minified.len() {
            return Err(DomainError::PartCountMismatch {
                expected: parts.len(),
                actual: minified.len(),
            });
        }
        Ok(())
    }
}
