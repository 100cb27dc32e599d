//! Default implementations of the replaceable ports.
//!
//! These need nothing from the outside world, so they live next to the ports
//! instead of in `litmin-adapters`.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::application::ports::{Diagnostic, DiagnosticSink, SourceMapGenerator, Validator};
use crate::domain::{DomainValidator, EditBuffer, MapOptions, SourceMap, TemplatePart};
use crate::error::LitminResult;

/// Emits every diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        warn!(
            kind = diagnostic.kind.as_str(),
            file = %diagnostic.file_name,
            "{}",
            diagnostic.message
        );
    }
}

/// Keeps diagnostics in memory so callers can inspect or print them later.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything reported so far.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// Non-empty placeholder and one split entry per original part.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn ensure_placeholder_valid(&self, placeholder: &str) -> LitminResult<()> {
        Ok(DomainValidator::validate_placeholder(placeholder)?)
    }

    fn ensure_parts_valid(&self, parts: &[TemplatePart], minified: &[String]) -> LitminResult<()> {
        Ok(DomainValidator::validate_parts(parts, minified)?)
    }
}

/// Per-character map against the original file, with its content embedded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiresSourceMapGenerator;

impl SourceMapGenerator for HiresSourceMapGenerator {
    fn generate(&self, buffer: &EditBuffer, file_name: &str) -> LitminResult<SourceMap> {
        Ok(buffer.generate_map(&MapOptions::for_file(file_name))?)
    }
}
