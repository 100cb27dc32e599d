// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for litmin.
//!
//! This module contains the pure text-transformation logic: templates and
//! their literal segments, the placeholder codec, the overwrite buffer and the
//! source map it produces. Minifiers, lexers and file access are reached
//! through ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: Templates are Clone + PartialEq and never mutated
//! - **Pure rendering**: the edit buffer renders text and maps from its
//!   recorded state only
//!
// Public API - what the world sees
pub mod classification;
pub mod codec;
pub mod edit_buffer;
pub mod entities;
pub mod error;
pub mod source_map;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::template::{Template, TemplatePart};

pub use classification::{EscapeScan, TemplateKind};
pub use edit_buffer::{Chunk, EditBuffer, MapOptions, Overwrite};
pub use error::{DomainError, ErrorCategory};
pub use source_map::SourceMap;
pub use value_objects::{MarkupOptions, StyleLevel, StyleOptions};

pub use validation::DomainValidator;
