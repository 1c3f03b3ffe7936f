// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test file discovery and build-configuration partitioning.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::diagnostic::print_warning;

/// Build variant a test must run against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "debug",
            Configuration::Release => "release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A script to run, tagged with the configuration its path selects
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFile {
    path: PathBuf,
    configuration: Configuration,
}

impl TestFile {
    /// Classify `path`: anything under `debug_prefix` is a debug test.
    ///
    /// Both paths are resolved against `cwd` first, so a test named by
    /// absolute path lands in the same configuration as its relative form.
    pub fn classify(path: impl Into<PathBuf>, debug_prefix: &Path, cwd: &Path) -> Self {
        let path = path.into();
        let configuration =
            if resolve_lexically(&path, cwd).starts_with(resolve_lexically(debug_prefix, cwd)) {
                Configuration::Debug
            } else {
                Configuration::Release
            };
        Self {
            path,
            configuration,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }
}

impl fmt::Display for TestFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Join `path` onto `cwd` and fold `.` and `..` components without
/// touching the filesystem.
pub fn resolve_lexically(path: &Path, cwd: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}

/// Test files split by configuration, input order preserved within each half
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub debug: Vec<TestFile>,
    pub release: Vec<TestFile>,
}

impl Partition {
    /// Non-empty subsets in execution order: debug first, then release.
    pub fn subsets(&self) -> impl Iterator<Item = (Configuration, &[TestFile])> {
        [
            (Configuration::Debug, self.debug.as_slice()),
            (Configuration::Release, self.release.as_slice()),
        ]
        .into_iter()
        .filter(|(_, files)| !files.is_empty())
    }
}

pub fn partition(files: &[TestFile]) -> Partition {
    let (debug, release) = files
        .iter()
        .cloned()
        .partition(|f| f.configuration() == Configuration::Debug);
    Partition { debug, release }
}

/// Recursively collect every `*.{extension}` file below `root`.
///
/// Results are sorted. Entries that cannot be read are skipped with a warning.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/*.{}", escaped_root, glob::Pattern::escape(extension));

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => print_warning(format_args!("skipping {}: {}", e.path().display(), e)),
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
