//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "minify the templates of this source" or
//! "minify this file and write its map".

pub mod literal_minifier;
pub mod minify_service;

pub use literal_minifier::{LiteralMinifier, MinifyOutput, Processed, TemplatePredicate, TemplateStats};
pub use minify_service::{FileOutcome, FileReport, MinifyService, TextResult, map_path_for};
