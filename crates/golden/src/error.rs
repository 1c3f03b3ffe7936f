// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while building, running or persisting a batch.

use std::path::PathBuf;

use thiserror::Error;

use crate::suite::Configuration;

/// Errors that abort a batch
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The build tool wrote to its error stream.
    #[error("{configuration} build failed:\n{stderr}")]
    Build {
        configuration: Configuration,
        stderr: String,
    },

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no baseline found at {}", .0.display())]
    BaselineNotFound(PathBuf),

    #[error("{}: test file not found", .0.display())]
    TestNotFound(PathBuf),

    #[error("invalid test discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code the binary should terminate with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Build { .. } => crate::exit_codes::BUILD_FAILED,
            _ => crate::exit_codes::HARNESS_ERROR,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
