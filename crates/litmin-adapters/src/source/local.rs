//! Local source files using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use litmin_core::{
    application::{
        ApplicationError,
        ports::{SourceFile, SourceProvider},
    },
    error::{LitminError, LitminResult},
};

/// File extensions searched for template literals.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Production source provider using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalSources;

impl LocalSources {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalSources {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceProvider for LocalSources {
    fn read(&self, path: &Path) -> LitminResult<SourceFile> {
        let text = std::fs::read_to_string(path).map_err(|e| unavailable(path, &e))?;
        Ok(SourceFile {
            name: path.display().to_string(),
            text,
        })
    }

    fn write(&self, path: &Path, content: &str) -> LitminResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_failed(path, &e, "create directory"))?;
        }
        std::fs::write(path, content).map_err(|e| write_failed(path, &e, "write file"))
    }
}

/// Expand `paths` into the source files to minify.
///
/// Files are taken as given; directories are walked recursively for
/// [`SOURCE_EXTENSIONS`], skipping hidden entries and `node_modules`. The
/// result is sorted and free of duplicates.
pub fn discover(paths: &[PathBuf]) -> LitminResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(ApplicationError::SourceUnavailable {
                path: path.clone(),
                reason: "No such file or directory".into(),
            }
            .into());
        }

        let walker = WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(e));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && has_source_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "Discovered source files");
    Ok(files)
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && name == "node_modules")
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

fn unavailable(path: &Path, e: &io::Error) -> LitminError {
    ApplicationError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

fn write_failed(path: &Path, e: &io::Error, operation: &str) -> LitminError {
    ApplicationError::WriteFailed {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out/nested/app.js");

        LocalSources::new().write(&target, "x").unwrap();
        let file = LocalSources::new().read(&target).unwrap();
        assert_eq!(file.text, "x");
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = LocalSources::new()
            .read(&dir.path().join("nope.js"))
            .unwrap_err();
        assert!(matches!(
            err,
            LitminError::Application(ApplicationError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn discover_walks_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for file in [
            "a.js",
            "b.txt",
            "src/c.ts",
            "src/d.tsx",
            "node_modules/lib/e.js",
            ".cache/f.js",
        ] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }

        let found = discover(&[root.to_path_buf(), root.join("a.js")]).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.js", "src/c.ts", "src/d.tsx"]);
    }

    #[test]
    fn discover_rejects_missing_paths() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&[dir.path().join("missing")]).is_err());
    }
}
