//! Minify Service - file-level workflow on top of [`LiteralMinifier`].
//!
//! Reads a source through the [`SourceProvider`], runs the literal minifier
//! and writes the code (plus an optional `.map` file next to it).

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
    application::{
        LiteralMinifier, MinifyOutput, TemplateStats,
        ports::{SourceFile, SourceProvider},
    },
    error::LitminResult,
};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one template changed.
    Minified,
    /// No template changed; the output is a copy of the input.
    Unchanged,
}

impl FileOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minified => "minified",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Summary of one processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub original_len: usize,
    pub minified_len: usize,
    pub templates: TemplateStats,
    /// Where the map was written, if one was.
    pub map_path: Option<PathBuf>,
}

impl FileReport {
    /// Bytes removed from the file.
    pub fn saved(&self) -> usize {
        self.original_len.saturating_sub(self.minified_len)
    }
}

/// Result of minifying an in-memory source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResult {
    /// The final text, with a trailing `sourceMappingURL` comment when a
    /// map name was requested and a map was produced.
    pub code: String,
    pub output: Option<MinifyOutput>,
    pub templates: TemplateStats,
}

/// File-oriented driver for the literal minifier.
pub struct MinifyService {
    minifier: LiteralMinifier,
    sources: Box<dyn SourceProvider>,
}

impl MinifyService {
    pub fn new(minifier: LiteralMinifier, sources: Box<dyn SourceProvider>) -> Self {
        Self { minifier, sources }
    }

    pub fn minifier(&self) -> &LiteralMinifier {
        &self.minifier
    }

    /// Minify `input` and write the result to `output`.
    ///
    /// When `emit_map` is set and a map was produced, it is written to
    /// `<output>.map` and referenced from a trailing comment. Unchanged files
    /// are still written, so `output` always exists afterwards.
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub fn minify_file(&self, input: &Path, output: &Path, emit_map: bool) -> LitminResult<FileReport> {
        let SourceFile { name, text } = self.sources.read(input)?;

        let map_path = map_path_for(output);
        let map_name = map_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{name}.map"));

        let result = self.minify_text(&text, &name, emit_map.then_some(map_name.as_str()))?;

        self.sources.write(output, &result.code)?;

        let mut written_map = None;
        if emit_map {
            if let Some(map) = result.output.as_ref().and_then(|o| o.map.as_ref()) {
                self.sources.write(&map_path, &map.to_json()?)?;
                written_map = Some(map_path);
            }
        }

        let report = FileReport {
            path: output.to_path_buf(),
            outcome: outcome_of(&result),
            original_len: text.len(),
            minified_len: result.code.len(),
            templates: result.templates,
            map_path: written_map,
        };
        info!(
            outcome = report.outcome.as_str(),
            saved = report.saved(),
            "File processed"
        );
        Ok(report)
    }

    /// Minify `input` without writing anything.
    pub fn check_file(&self, input: &Path) -> LitminResult<FileReport> {
        let SourceFile { name, text } = self.sources.read(input)?;
        let result = self.minify_text(&text, &name, None)?;

        Ok(FileReport {
            path: input.to_path_buf(),
            outcome: outcome_of(&result),
            original_len: text.len(),
            minified_len: result.code.len(),
            templates: result.templates,
            map_path: None,
        })
    }

    /// Minify an in-memory source.
    ///
    /// `map_name` is the file name the `sourceMappingURL` comment points at;
    /// with `None` no comment is appended.
    pub fn minify_text(
        &self,
        source: &str,
        file_name: &str,
        map_name: Option<&str>,
    ) -> LitminResult<TextResult> {
        let processed = self.minifier.process(source, file_name)?;

        let code = match (&processed.output, map_name) {
            (Some(out), Some(map_name)) if out.map.is_some() => {
                format!(
                    "{}\n//# sourceMappingURL={map_name}\n",
                    without_map_comment(&out.code)
                )
            }
            (Some(out), _) => out.code.clone(),
            (None, _) => source.to_string(),
        };

        Ok(TextResult {
            code,
            output: processed.output,
            templates: processed.stats,
        })
    }
}

fn outcome_of(result: &TextResult) -> FileOutcome {
    if result.output.is_some() {
        FileOutcome::Minified
    } else {
        FileOutcome::Unchanged
    }
}

/// `code` without a trailing `//# sourceMappingURL=` line, which would point
/// at a map of the unminified source.
fn without_map_comment(code: &str) -> &str {
    let body = code.trim_end();
    let line_start = body.rfind('\n').map_or(0, |at| at + 1);
    let last = body[line_start..].trim_start();
    if last.starts_with("//# sourceMappingURL=") || last.starts_with("//@ sourceMappingURL=") {
        &body[..line_start]
    } else {
        code
    }
}

/// `dist/app.js` -> `dist/app.js.map`.
pub fn map_path_for(output: &Path) -> PathBuf {
    let mut os = output.as_os_str().to_owned();
    os.push(".map");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ApplicationError, SourceMapMode,
        ports::{Minified, MinifierBackend, TemplateLocator},
    };
    use crate::application::MinifyConfig;
    use crate::domain::{MarkupOptions, Template, TemplatePart};
    use crate::error::LitminError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Collapses all whitespace.
    struct SqueezeBackend;

    impl MinifierBackend for SqueezeBackend {
        fn minify_markup(&self, markup: &str, _: &MarkupOptions) -> LitminResult<Minified> {
            Ok(Minified::new(
                markup.split_whitespace().collect::<Vec<_>>().join(""),
            ))
        }
    }

    /// Treats a source of the form ``html`...` `` as one template.
    struct WholeSourceLocator;

    impl TemplateLocator for WholeSourceLocator {
        fn locate(&self, source: &str, _: &str) -> LitminResult<Vec<Template>> {
            match (source.find('`'), source.rfind('`')) {
                (Some(open), Some(close)) if close > open => Ok(vec![Template::tagged(
                    &source[..open],
                    vec![TemplatePart::from_source(source, open + 1, close).unwrap()],
                )]),
                _ => Ok(vec![]),
            }
        }
    }

    #[derive(Default, Clone)]
    struct Files(Arc<Mutex<HashMap<PathBuf, String>>>);

    impl SourceProvider for Files {
        fn read(&self, path: &Path) -> LitminResult<SourceFile> {
            let text = self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
                LitminError::from(ApplicationError::SourceUnavailable {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                })
            })?;
            Ok(SourceFile {
                name: path.file_name().unwrap().to_string_lossy().into_owned(),
                text,
            })
        }

        fn write(&self, path: &Path, contents: &str) -> LitminResult<()> {
            self.0
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }
    }

    fn service(files: &Files, config: MinifyConfig) -> MinifyService {
        let minifier = LiteralMinifier::new(Box::new(SqueezeBackend), Box::new(WholeSourceLocator))
            .with_config(config);
        MinifyService::new(minifier, Box::new(files.clone()))
    }

    #[test]
    fn writes_code_and_map() {
        let files = Files::default();
        files
            .write(Path::new("src/app.js"), "html`<p> hi </p>`")
            .unwrap();
        let svc = service(&files, MinifyConfig::default());

        let report = svc
            .minify_file(Path::new("src/app.js"), Path::new("dist/app.js"), true)
            .unwrap();

        assert_eq!(report.outcome, FileOutcome::Minified);
        assert_eq!(report.map_path, Some(PathBuf::from("dist/app.js.map")));
        assert_eq!(report.templates.changed, 1);

        let store = files.0.lock().unwrap();
        assert_eq!(
            store[Path::new("dist/app.js")],
            "html`<p>hi</p>`\n//# sourceMappingURL=app.js.map\n"
        );
        assert!(store[Path::new("dist/app.js.map")].contains("\"sourcesContent\""));
    }

    #[test]
    fn existing_map_comment_is_replaced() {
        let files = Files::default();
        files
            .write(
                Path::new("app.js"),
                "html`<p> hi </p>`\n//# sourceMappingURL=app.src.js.map\n",
            )
            .unwrap();
        let svc = service(&files, MinifyConfig::default());

        svc.minify_file(Path::new("app.js"), Path::new("app.js"), true)
            .unwrap();

        let store = files.0.lock().unwrap();
        let code = &store[Path::new("app.js")];
        assert_eq!(code, "html`<p>hi</p>`\n\n//# sourceMappingURL=app.js.map\n");
        assert_eq!(code.matches("sourceMappingURL").count(), 1);
    }

    #[test]
    fn map_comment_is_only_stripped_from_the_last_line() {
        assert_eq!(without_map_comment("a\n//# sourceMappingURL=x.map\n"), "a\n");
        assert_eq!(without_map_comment("//# sourceMappingURL=x.map"), "");
        assert_eq!(
            without_map_comment("//# sourceMappingURL=x.map\nb"),
            "//# sourceMappingURL=x.map\nb"
        );
    }

    #[test]
    fn unchanged_file_is_copied_without_map() {
        let files = Files::default();
        files.write(Path::new("a.js"), "html`<p>hi</p>`").unwrap();
        let svc = service(&files, MinifyConfig::default());

        let report = svc
            .minify_file(Path::new("a.js"), Path::new("out/a.js"), true)
            .unwrap();

        assert_eq!(report.outcome, FileOutcome::Unchanged);
        assert_eq!(report.map_path, None);
        assert_eq!(report.saved(), 0);
        assert_eq!(
            files.0.lock().unwrap()[Path::new("out/a.js")],
            "html`<p>hi</p>`"
        );
    }

    #[test]
    fn no_map_when_mode_disabled() {
        let files = Files::default();
        files.write(Path::new("a.js"), "html`<p> hi </p>`").unwrap();
        let svc = service(
            &files,
            MinifyConfig::default().with_source_map(SourceMapMode::Disabled),
        );

        let report = svc
            .minify_file(Path::new("a.js"), Path::new("b.js"), true)
            .unwrap();

        assert_eq!(report.map_path, None);
        assert_eq!(files.0.lock().unwrap()[Path::new("b.js")], "html`<p>hi</p>`");
    }

    #[test]
    fn check_file_writes_nothing() {
        let files = Files::default();
        files.write(Path::new("a.js"), "html`<p> hi </p>`").unwrap();
        let svc = service(&files, MinifyConfig::default());

        let report = svc.check_file(Path::new("a.js")).unwrap();
        assert_eq!(report.outcome, FileOutcome::Minified);
        assert_eq!(report.saved(), 2);
        assert_eq!(files.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_source_is_not_found() {
        let svc = service(&Files::default(), MinifyConfig::default());
        let err = svc.check_file(Path::new("nope.js")).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::NotFound);
    }

    #[test]
    fn map_path_appends_extension() {
        assert_eq!(
            map_path_for(Path::new("dist/app.min.js")),
            PathBuf::from("dist/app.min.js.map")
        );
    }
}
