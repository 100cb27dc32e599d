//! `litmin minify` — minify the template literals of source files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use litmin_adapters::{LocalSources, default_minifier, discover};
use litmin_core::{
    application::{
        CollectedDiagnostics, FileOutcome, FileReport, MinifyService, ports::SourceProvider,
    },
    error::LitminError,
};

use crate::{
    cli::{MinifyArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// One input file and where its result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    input: PathBuf,
    output: PathBuf,
}

/// One line of the JSON report.
#[derive(Debug, Serialize)]
struct FileSummary {
    input: String,
    output: Option<String>,
    outcome: &'static str,
    original_bytes: usize,
    minified_bytes: usize,
    templates_found: usize,
    templates_changed: usize,
    source_map: Option<String>,
    error: Option<String>,
}

impl FileSummary {
    fn from_report(job: &Job, report: &FileReport, written: bool) -> Self {
        Self {
            input: job.input.display().to_string(),
            output: written.then(|| job.output.display().to_string()),
            outcome: report.outcome.as_str(),
            original_bytes: report.original_len,
            minified_bytes: report.minified_len,
            templates_found: report.templates.found,
            templates_changed: report.templates.changed,
            source_map: report.map_path.as_ref().map(|p| p.display().to_string()),
            error: None,
        }
    }

    fn from_error(job: &Job, err: &LitminError) -> Self {
        Self {
            input: job.input.display().to_string(),
            output: None,
            outcome: "failed",
            original_bytes: 0,
            minified_bytes: 0,
            templates_found: 0,
            templates_changed: 0,
            source_map: None,
            error: Some(err.to_string()),
        }
    }
}

#[instrument(skip_all, fields(inputs = args.files.len()))]
pub fn execute(args: MinifyArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let jobs = plan(&args.files, args.out_dir.as_deref())?;
    debug!(files = jobs.len(), "Planned minification");

    let sink = Arc::new(CollectedDiagnostics::new());
    let minifier = default_minifier()
        .with_config(config.minify_config(args.no_css, args.no_source_map))
        .with_diagnostics(sink.clone());
    let service = MinifyService::new(minifier, Box::new(LocalSources::new()));
    let emit_map = config.source_maps.enabled && !args.no_source_map;

    let result = if args.stdout {
        to_stdout(&service, &jobs, &output)
    } else if args.check {
        check(&service, &jobs, &output)
    } else {
        write_all(&service, &jobs, emit_map, &output)
    };

    for diagnostic in sink.drain() {
        output.warning(&format!("{}: {}", diagnostic.file_name, diagnostic.message))?;
    }
    result
}

/// Expand the inputs into jobs. Directory inputs keep their layout below
/// `out_dir`; file inputs land directly in it.
fn plan(inputs: &[PathBuf], out_dir: Option<&Path>) -> CliResult<Vec<Job>> {
    let mut jobs: Vec<Job> = Vec::new();
    for root in inputs {
        for input in discover(std::slice::from_ref(root))? {
            let output = match out_dir {
                Some(dir) => dir.join(relative_to(root, &input)),
                None => input.clone(),
            };
            jobs.push(Job { input, output });
        }
    }

    jobs.sort_by(|a, b| a.input.cmp(&b.input));
    jobs.dedup_by(|a, b| a.input == b.input);

    if jobs.is_empty() {
        return Err(CliError::NoSources {
            paths: inputs.to_vec(),
        });
    }
    Ok(jobs)
}

fn relative_to(root: &Path, input: &Path) -> PathBuf {
    if root.is_dir() {
        if let Ok(relative) = input.strip_prefix(root) {
            return relative.to_path_buf();
        }
    }
    input
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.to_path_buf())
}

fn to_stdout(service: &MinifyService, jobs: &[Job], output: &OutputManager) -> CliResult<()> {
    let [job] = jobs else {
        return Err(CliError::InvalidInput {
            message: format!("--stdout takes exactly one file, {} found", jobs.len()),
            source: None,
        });
    };

    let file = LocalSources::new()
        .read(&job.input)
        .with_cli_context(|| "reading input")?;
    let result = service.minify_text(&file.text, &file.name, None)?;
    output.raw(&result.code)?;
    Ok(())
}

fn check(service: &MinifyService, jobs: &[Job], output: &OutputManager) -> CliResult<()> {
    let mut summaries = Vec::with_capacity(jobs.len());
    let mut changing = 0;

    for job in jobs {
        let report = service.check_file(&job.input)?;
        if report.outcome == FileOutcome::Minified {
            changing += 1;
            info!(file = %job.input.display(), saved = report.saved(), "Would minify");
            output.info(&format!(
                "{} would change ({} bytes smaller)",
                job.input.display(),
                report.saved()
            ))?;
        }
        summaries.push(FileSummary::from_report(job, &report, false));
    }

    if output.format() == OutputFormat::Json {
        output.json(&summaries)?;
    }

    if changing > 0 {
        return Err(CliError::WouldChange { files: changing });
    }
    output.success(&format!("{} file(s) already minified", jobs.len()))?;
    Ok(())
}

fn write_all(
    service: &MinifyService,
    jobs: &[Job],
    emit_map: bool,
    output: &OutputManager,
) -> CliResult<()> {
    let progress = output.progress(jobs.len());
    let mut summaries = Vec::with_capacity(jobs.len());
    let mut failures: Vec<(usize, LitminError)> = Vec::new();
    let (mut minified, mut saved) = (0usize, 0usize);

    for (index, job) in jobs.iter().enumerate() {
        progress.set_message(job.input.display().to_string());
        match service.minify_file(&job.input, &job.output, emit_map) {
            Ok(report) => {
                if report.outcome == FileOutcome::Minified {
                    minified += 1;
                    saved += report.saved();
                }
                summaries.push(FileSummary::from_report(job, &report, true));
            }
            Err(err) => {
                summaries.push(FileSummary::from_error(job, &err));
                failures.push((index, err));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if output.format() == OutputFormat::Json {
        output.json(&summaries)?;
    }

    if jobs.len() == 1 {
        if let Some((_, err)) = failures.pop() {
            return Err(CliError::Core(err));
        }
    }
    for (index, err) in &failures {
        output.error(&format!("{}: {err}", jobs[*index].input.display()))?;
    }

    let processed = jobs.len() - failures.len();
    output.success(&format!(
        "Minified {minified} of {processed} file(s), {saved} bytes saved"
    ))?;

    if !failures.is_empty() {
        return Err(CliError::FilesFailed {
            failed: failures.len(),
            total: jobs.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, file: &str) {
        let path = root.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn in_place_plan_writes_over_inputs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.js");

        let jobs = plan(&[dir.path().join("a.js")], None).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].input, jobs[0].output);
    }

    #[test]
    fn directory_layout_is_mirrored_into_out_dir() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/a.js");
        touch(dir.path(), "src/nested/b.ts");

        let out = dir.path().join("dist");
        let jobs = plan(&[dir.path().join("src")], Some(&out)).unwrap();
        let outputs: Vec<_> = jobs.iter().map(|j| j.output.clone()).collect();
        assert_eq!(outputs, vec![out.join("a.js"), out.join("nested/b.ts")]);
    }

    #[test]
    fn file_inputs_land_flat_in_out_dir() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "deep/x/app.mjs");

        let out = dir.path().join("dist");
        let jobs = plan(&[dir.path().join("deep/x/app.mjs")], Some(&out)).unwrap();
        assert_eq!(jobs[0].output, out.join("app.mjs"));
    }

    #[test]
    fn duplicate_inputs_are_planned_once() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.js");

        let file = dir.path().join("a.js");
        let jobs = plan(&[file.clone(), file], None).unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn empty_directory_has_no_sources() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "readme.md");

        let err = plan(&[dir.path().to_path_buf()], None).unwrap_err();
        assert!(matches!(err, CliError::NoSources { .. }));
    }
}
