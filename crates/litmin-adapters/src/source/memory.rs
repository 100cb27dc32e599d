//! In-memory source provider for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use litmin_core::{
    application::{
        ApplicationError,
        ports::{SourceFile, SourceProvider},
    },
    error::LitminResult,
};

/// In-memory source files, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), text.into());
    }

    /// Current content of a file (testing helper).
    pub fn get(&self, path: &Path) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// All stored paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    pub fn clear(&self) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl SourceProvider for MemorySources {
    fn read(&self, path: &Path) -> LitminResult<SourceFile> {
        let text = self.get(path).ok_or_else(|| ApplicationError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: "No such file".into(),
        })?;
        Ok(SourceFile {
            name: path.display().to_string(),
            text,
        })
    }

    fn write(&self, path: &Path, content: &str) -> LitminResult<()> {
        self.insert(path, content);
        Ok(())
    }
}
