//! litmin Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for litmin, a
//! minifier for the HTML and CSS held in JavaScript/TypeScript template
//! literals, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            litmin-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (LiteralMinifier, MinifyService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  (Backend, Locator, Sources, Sinks)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     litmin-adapters (Infrastructure)    │
//! │ (DefaultBackend, TreeSitterLocator, ..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │   (Template, codec, EditBuffer, maps)   │
//! │         No I/O, no minifiers            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use litmin_core::application::{LiteralMinifier, MinifyConfig};
//!
//! // 1. Inject adapters
//! let minifier = LiteralMinifier::new(backend, locator)
//!     .with_config(MinifyConfig::default());
//!
//! // 2. Minify a source; `None` means nothing changed
//! if let Some(out) = minifier.minify(source, "app.js")? {
//!     std::fs::write("app.min.js", out.code)?;
//! }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        FileOutcome, FileReport, LiteralMinifier, MinifyConfig, MinifyOutput, MinifyService,
        SourceMapMode, StyleMinification, ValidationMode,
        ports::{
            DiagnosticSink, Minified, MinifierBackend, SourceProvider, TemplateLocator, Validator,
        },
    };
    pub use crate::domain::{
        MarkupOptions, SourceMap, StyleLevel, StyleOptions, Template, TemplatePart,
    };
    pub use crate::error::{LitminError, LitminResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
