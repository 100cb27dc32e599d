//! Application layer for litmin.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (LiteralMinifier, MinifyService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Defaults**: Built-in implementations of the replaceable ports
//! - **Config**: Run-time options of the orchestrator
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! text-transformation rules itself. Those live in `crate::domain`.

pub mod config;
pub mod defaults;
pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    FileOutcome, FileReport, LiteralMinifier, MinifyOutput, MinifyService, Processed,
    TemplatePredicate, TemplateStats, TextResult,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    Diagnostic, DiagnosticKind, DiagnosticSink, Minified, MinifierBackend, SourceFile,
    SourceMapGenerator, SourceProvider, TemplateLocator, Validator,
};

pub use config::{MinifyConfig, SourceMapMode, StyleFn, StyleMinification, ValidationMode};
pub use defaults::{CollectedDiagnostics, DefaultValidator, HiresSourceMapGenerator, TracingDiagnostics};

pub use error::ApplicationError;
