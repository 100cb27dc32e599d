//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `litmin-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `MinifierBackend`: placeholder codec plus markup and style minification
//!   - `TemplateLocator`: finds template literals in JavaScript/TypeScript
//!   - `SourceProvider`: file reads and writes
//!   - `DiagnosticSink`, `Validator`, `SourceMapGenerator`: replaceable
//!     collaborators with defaults in this crate
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    Diagnostic, DiagnosticKind, DiagnosticSink, Minified, MinifierBackend, SourceFile,
    SourceMapGenerator, SourceProvider, TemplateLocator, Validator,
};
