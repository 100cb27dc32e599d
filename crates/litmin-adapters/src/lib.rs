//! Infrastructure adapters for litmin.
//!
//! This crate implements the ports defined in `litmin-core::application::ports`.
//! It contains the minifier bindings, the JavaScript/TypeScript parser and
//! all file I/O.

pub mod backend;
pub mod locator;
pub mod source;

// Re-export commonly used adapters
pub use backend::DefaultBackend;
pub use locator::TreeSitterLocator;
pub use source::{LocalSources, MemorySources, discover};

use litmin_core::application::LiteralMinifier;

/// A minifier wired with the default backend and locator.
pub fn default_minifier() -> LiteralMinifier {
    LiteralMinifier::new(Box::new(DefaultBackend::new()), Box::new(TreeSitterLocator::new()))
}
