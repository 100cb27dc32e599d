//! Literal Minifier - the per-source orchestrator.
//!
//! For one source text this service:
//! 1. Locates every template literal
//! 2. Scans for the whole-file escape markers
//! 3. Classifies, combines, minifies and splits each template (in parallel)
//! 4. Applies the resulting overwrites to an edit buffer
//! 5. Renders the new text and, optionally, a source map
//!
//! Any failure aborts the whole source; nothing partial is returned.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument, trace};

use crate::{
    application::{
        DefaultValidator, HiresSourceMapGenerator, MinifyConfig, SourceMapMode, StyleMinification,
        TracingDiagnostics, ValidationMode,
        ports::{
            Diagnostic, DiagnosticKind, DiagnosticSink, Minified, MinifierBackend,
            SourceMapGenerator, TemplateLocator, Validator,
        },
    },
    domain::{
        DomainError, EditBuffer, EscapeScan, Overwrite, SourceMap, Template, TemplateKind,
        classification::{MARKUP_ESCAPE_MARKER, STYLE_ESCAPE_MARKER, is_markup_tag, is_style_tag},
    },
    error::LitminResult,
};

/// Decides whether a template is eligible for one minification mode.
pub type TemplatePredicate = Box<dyn Fn(&Template) -> bool + Send + Sync>;

/// Rewritten source text and its optional map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// How the templates of one source fared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateStats {
    pub found: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub changed: usize,
}

/// Result of [`LiteralMinifier::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    /// `None` when no template changed.
    pub output: Option<MinifyOutput>,
    pub stats: TemplateStats,
}

/// Terminal state of one template.
#[derive(Debug)]
enum TemplateOutcome {
    Skipped,
    Unchanged,
    Changed(Vec<Overwrite>),
}

/// Minifies the markup and style template literals of JavaScript and
/// TypeScript sources.
pub struct LiteralMinifier {
    backend: Box<dyn MinifierBackend>,
    locator: Box<dyn TemplateLocator>,
    diagnostics: Arc<dyn DiagnosticSink>,
    should_minify_markup: TemplatePredicate,
    should_minify_style: TemplatePredicate,
    config: MinifyConfig,
}

impl LiteralMinifier {
    /// Create a minifier with default predicates, configuration and
    /// diagnostics.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use litmin_core::application::LiteralMinifier;
    ///
    /// let minifier = LiteralMinifier::new(
    ///     backend, // impl MinifierBackend
    ///     locator, // impl TemplateLocator
    /// );
    /// let out = minifier.minify("html`<p> hi </p>`", "app.js")?;
    /// ```
    pub fn new(backend: Box<dyn MinifierBackend>, locator: Box<dyn TemplateLocator>) -> Self {
        Self {
            backend,
            locator,
            diagnostics: Arc::new(TracingDiagnostics),
            should_minify_markup: Box::new(is_markup_tag),
            should_minify_style: Box::new(is_style_tag),
            config: MinifyConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MinifyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn with_markup_predicate(
        mut self,
        predicate: impl Fn(&Template) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_minify_markup = Box::new(predicate);
        self
    }

    pub fn with_style_predicate(
        mut self,
        predicate: impl Fn(&Template) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_minify_style = Box::new(predicate);
        self
    }

    pub fn config(&self) -> &MinifyConfig {
        &self.config
    }

    /// Minify every eligible template in `source`.
    ///
    /// Returns `None` when the source has no templates or nothing changed.
    pub fn minify(&self, source: &str, file_name: &str) -> LitminResult<Option<MinifyOutput>> {
        Ok(self.process(source, file_name)?.output)
    }

    /// Like [`LiteralMinifier::minify`], also reporting per-template counts.
    #[instrument(skip_all, fields(file = %file_name, bytes = source.len()))]
    pub fn process(&self, source: &str, file_name: &str) -> LitminResult<Processed> {
        let templates = self.locator.locate(source, file_name)?;
        let mut stats = TemplateStats {
            found: templates.len(),
            ..TemplateStats::default()
        };

        if templates.is_empty() {
            debug!("No template literals found");
            return Ok(Processed {
                output: None,
                stats,
            });
        }

        let escapes = self.scan_escapes(source, file_name);

        let outcomes = templates
            .par_iter()
            .map(|template| self.process_template(template, escapes, file_name))
            .collect::<LitminResult<Vec<_>>>()?;

        let mut buffer = EditBuffer::new(source);
        for outcome in outcomes {
            match outcome {
                TemplateOutcome::Skipped => stats.skipped += 1,
                TemplateOutcome::Unchanged => stats.unchanged += 1,
                TemplateOutcome::Changed(overwrites) => {
                    stats.changed += 1;
                    for overwrite in overwrites {
                        buffer.overwrite(overwrite.start, overwrite.end, overwrite.text)?;
                    }
                }
            }
        }

        if buffer.is_empty() {
            debug!(?stats, "Source unchanged");
            return Ok(Processed {
                output: None,
                stats,
            });
        }

        let code = buffer.render();
        let map = match &self.config.source_map {
            SourceMapMode::Disabled => None,
            SourceMapMode::Default => Some(HiresSourceMapGenerator.generate(&buffer, file_name)?),
            SourceMapMode::Custom(generator) => Some(generator.generate(&buffer, file_name)?),
        };

        info!(
            templates = stats.found,
            changed = stats.changed,
            before = source.len(),
            after = code.len(),
            "Minified template literals"
        );

        Ok(Processed {
            output: Some(MinifyOutput { code, map }),
            stats,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn scan_escapes(&self, source: &str, file_name: &str) -> EscapeScan {
        let escapes = EscapeScan::scan(source);
        if escapes.style_escaped {
            self.diagnostics.report(Diagnostic::new(
                DiagnosticKind::StyleEscape,
                file_name,
                format!("{STYLE_ESCAPE_MARKER} found; style templates in this file are left as-is"),
            ));
        }
        if escapes.markup_escaped {
            self.diagnostics.report(Diagnostic::new(
                DiagnosticKind::MarkupEscape,
                file_name,
                format!(
                    "{MARKUP_ESCAPE_MARKER} found; markup templates in this file are left as-is"
                ),
            ));
        }
        escapes
    }

    fn classify(&self, template: &Template, escapes: EscapeScan) -> TemplateKind {
        let wants_markup = !escapes.markup_escaped && (self.should_minify_markup)(template);
        let wants_style = !escapes.style_escaped
            && self.style_enabled()
            && (self.should_minify_style)(template);
        TemplateKind::resolve(wants_markup, wants_style)
    }

    /// Style classification is off when the backend cannot minify style and
    /// no custom function stands in for it.
    fn style_enabled(&self) -> bool {
        match self.config.style {
            StyleMinification::Custom(_) => true,
            StyleMinification::Disabled | StyleMinification::Backend(_) => {
                self.backend.supports_style()
            }
        }
    }

    fn process_template(
        &self,
        template: &Template,
        escapes: EscapeScan,
        file_name: &str,
    ) -> LitminResult<TemplateOutcome> {
        let kind = self.classify(template, escapes);
        if kind == TemplateKind::Skip {
            trace!(%template, "Skipping template");
            return Ok(TemplateOutcome::Skipped);
        }
        if !template.has_disjoint_parts() {
            return Err(DomainError::UnorderedParts {
                start: template.start().unwrap_or_default(),
            }
            .into());
        }

        let placeholder = self.backend.placeholder(&template.parts);
        if let Some(validator) = self.validator() {
            validator.ensure_placeholder_valid(&placeholder)?;
        }

        let combined = self.backend.combine(&template.parts, &placeholder);
        let minified = match kind {
            TemplateKind::Style => self.minify_style(&combined)?,
            _ => self.backend.minify_markup(&combined, &self.config.markup)?,
        };
        for warning in minified.warnings {
            self.diagnostics.report(Diagnostic::new(
                DiagnosticKind::BackendWarning,
                file_name,
                warning,
            ));
        }

        let split = self.backend.split(&minified.code, &placeholder);
        if let Some(validator) = self.validator() {
            validator.ensure_parts_valid(&template.parts, &split)?;
        }

        let overwrites: Vec<Overwrite> = template
            .parts
            .iter()
            .zip(split)
            .filter(|(part, text)| !part.is_empty() && part.text != *text)
            .map(|(part, text)| Overwrite {
                start: part.start,
                end: part.end,
                text,
            })
            .collect();

        trace!(
            kind = kind.as_str(),
            expressions = template.expression_count(),
            overwrites = overwrites.len(),
            "Template minified"
        );

        if overwrites.is_empty() {
            Ok(TemplateOutcome::Unchanged)
        } else {
            Ok(TemplateOutcome::Changed(overwrites))
        }
    }

    fn minify_style(&self, combined: &str) -> LitminResult<Minified> {
        match &self.config.style {
            StyleMinification::Disabled => Ok(Minified::new(combined)),
            StyleMinification::Custom(minify) => Ok(Minified::new(minify(combined))),
            StyleMinification::Backend(options) => self
                .backend
                .minify_style(combined, &options.placeholder_safe()),
        }
    }

    fn validator(&self) -> Option<&dyn Validator> {
        match &self.config.validation {
            ValidationMode::Default => Some(&DefaultValidator),
            ValidationMode::Disabled => None,
            ValidationMode::Custom(validator) => Some(validator.as_ref()),
        }
    }
}
