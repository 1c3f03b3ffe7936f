// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Expected-output files stored next to each test script.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Default baseline file extension
pub const DEFAULT_EXTENSION: &str = "out";

/// Reads and writes baselines at `<dir>/<stem>.<extension>`
#[derive(Clone, Debug)]
pub struct BaselineStore {
    extension: String,
}

impl Default for BaselineStore {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl BaselineStore {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Same directory and stem as the test file, baseline extension.
    pub fn path_for(&self, test: &Path) -> PathBuf {
        test.with_extension(&self.extension)
    }

    pub fn exists(&self, test: &Path) -> bool {
        self.path_for(test).is_file()
    }

    pub async fn read(&self, test: &Path) -> Result<String, HarnessError> {
        let path = self.path_for(test);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(HarnessError::BaselineNotFound(path)),
            Err(e) => Err(HarnessError::io(path, e)),
        }
    }

    /// Overwrite the baseline unconditionally.
    pub async fn write(&self, test: &Path, content: &str) -> Result<PathBuf, HarnessError> {
        let path = self.path_for(test);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| HarnessError::io(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "baseline_tests.rs"]
mod tests;
