// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Running the interpreter on a single test file.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::HarnessError;

/// Both output streams of one interpreter invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit status, for logging only; it never decides pass or fail.
    pub exit_code: Option<i32>,
}

/// Runs a test file and captures what it printed
pub trait Runner: Send + Sync {
    fn run<'a>(
        &'a self,
        test: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput, HarnessError>> + Send + 'a>>;
}

/// Spawns `<binary> <test>` and waits for it to exit.
///
/// There is no timeout: a hanging interpreter hangs the batch.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    binary: PathBuf,
}

impl ProcessRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn capture(&self, test: &Path) -> Result<CapturedOutput, HarnessError> {
        let output = Command::new(&self.binary)
            .arg(test)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| HarnessError::Spawn {
                program: self.binary.display().to_string(),
                source,
            })?;

        Ok(CapturedOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

impl Runner for ProcessRunner {
    fn run<'a>(
        &'a self,
        test: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput, HarnessError>> + Send + 'a>> {
        Box::pin(self.capture(test))
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
