//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the orchestrator needs from external systems.
//! The `litmin-adapters` crate provides the production implementations.

use std::path::Path;

use crate::application::ApplicationError;
use crate::domain::{
    EditBuffer, MarkupOptions, SourceMap, StyleOptions, Template, TemplatePart, codec,
};
use crate::error::LitminResult;

/// Output of one backend call.
///
/// `warnings` are recoverable problems (for example a style sheet that
/// needed the degraded fallback); they are forwarded to the diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Minified {
    pub code: String,
    pub warnings: Vec<String>,
}

impl Minified {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Port for the pluggable minifier.
///
/// Implemented by:
/// - `litmin_adapters::backend::DefaultBackend` (minify-html + lightningcss)
///
/// Only `minify_markup` is required. The codec operations default to the
/// exact forms in [`crate::domain::codec`]; a backend whose minifier is
/// known to mangle placeholders overrides `split`.
pub trait MinifierBackend: Send + Sync {
    /// Choose a placeholder that occurs in no part.
    fn placeholder(&self, parts: &[TemplatePart]) -> String {
        codec::unique_placeholder(parts, codec::PLACEHOLDER_BASE, codec::PLACEHOLDER_SUFFIX)
    }

    /// Join the part texts with the placeholder between each pair.
    fn combine(&self, parts: &[TemplatePart], placeholder: &str) -> String {
        codec::combine(parts, placeholder)
    }

    /// Minify a combined markup string.
    fn minify_markup(&self, markup: &str, options: &MarkupOptions) -> LitminResult<Minified>;

    /// Split minified text back into per-part strings.
    fn split(&self, minified: &str, placeholder: &str) -> Vec<String> {
        codec::split_exact(minified, placeholder)
    }

    /// Whether [`MinifierBackend::minify_style`] is implemented.
    ///
    /// A backend without style support never has templates classified as
    /// style.
    fn supports_style(&self) -> bool {
        false
    }

    /// Minify a combined style sheet string.
    fn minify_style(&self, style: &str, options: &StyleOptions) -> LitminResult<Minified> {
        let _ = (style, options);
        Err(ApplicationError::Unsupported {
            operation: "style minification",
        }
        .into())
    }
}

/// Port for finding template literals in a source file.
///
/// Implemented by:
/// - `litmin_adapters::locator::TreeSitterLocator`
pub trait TemplateLocator: Send + Sync {
    /// Every template literal in `source`, tagged or untagged, including
    /// nested ones, in source order.
    ///
    /// `file_name` selects the grammar and labels errors.
    fn locate(&self, source: &str, file_name: &str) -> LitminResult<Vec<Template>>;
}

/// What kind of non-fatal condition a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// `unsafeCSS(` found; style minification off for the file.
    StyleEscape,
    /// `unsafeHTML(` found; markup minification off for the file.
    MarkupEscape,
    /// The backend recovered from a problem and still produced output.
    BackendWarning,
}

impl DiagnosticKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StyleEscape => "style-escape",
            Self::MarkupEscape => "markup-escape",
            Self::BackendWarning => "backend-warning",
        }
    }
}

/// A non-fatal message about one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub file_name: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, file_name: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            file_name: file_name.to_string(),
            message: message.into(),
        }
    }
}

/// Port for reporting non-fatal conditions.
///
/// Implemented by:
/// - `crate::application::TracingDiagnostics` (default)
/// - `crate::application::CollectedDiagnostics` (tests, reports)
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Port for checking codec results before they reach the edit buffer.
///
/// Implemented by:
/// - `crate::application::DefaultValidator`
pub trait Validator: Send + Sync {
    fn ensure_placeholder_valid(&self, placeholder: &str) -> LitminResult<()>;

    fn ensure_parts_valid(&self, parts: &[TemplatePart], minified: &[String]) -> LitminResult<()>;
}

/// Port for turning a finished edit buffer into a source map.
///
/// Implemented by:
/// - `crate::application::HiresSourceMapGenerator` (default)
pub trait SourceMapGenerator: Send + Sync {
    fn generate(&self, buffer: &EditBuffer, file_name: &str) -> LitminResult<SourceMap>;
}

/// A source file read through a [`SourceProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Logical name used for grammar selection and in source maps.
    pub name: String,
    pub text: String,
}

/// Port for reading sources and writing results.
///
/// Implemented by:
/// - `litmin_adapters::source::LocalSources` (production)
/// - `litmin_adapters::source::MemorySources` (testing)
pub trait SourceProvider: Send + Sync {
    /// Read a UTF-8 source file.
    fn read(&self, path: &Path) -> LitminResult<SourceFile>;

    /// Write `contents` to `path`, creating parent directories.
    fn write(&self, path: &Path, contents: &str) -> LitminResult<()>;
}
