// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Build coordination: produce a fresh interpreter for a configuration.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::HarnessError;
use crate::suite::Configuration;

/// Produces the interpreter binary for a configuration
pub trait Builder: Send + Sync {
    /// Clean and rebuild. Any error is fatal for the whole invocation.
    fn ensure<'a>(
        &'a self,
        configuration: Configuration,
    ) -> Pin<Box<dyn Future<Output = Result<(), HarnessError>> + Send + 'a>>;
}

/// Build tool command lines
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build tool executable (default: "make")
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments for the clean step (default: ["clean"])
    #[serde(default = "default_clean_args")]
    pub clean_args: Vec<String>,

    /// Arguments for a debug build (default: ["debug"])
    #[serde(default = "default_debug_args")]
    pub debug_args: Vec<String>,

    /// Arguments for a release build (default: none)
    #[serde(default)]
    pub release_args: Vec<String>,
}

fn default_program() -> String {
    "make".to_string()
}

fn default_clean_args() -> Vec<String> {
    vec!["clean".to_string()]
}

fn default_debug_args() -> Vec<String> {
    vec!["debug".to_string()]
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            clean_args: default_clean_args(),
            debug_args: default_debug_args(),
            release_args: Vec::new(),
        }
    }
}

impl BuildConfig {
    pub fn args_for(&self, configuration: Configuration) -> &[String] {
        match configuration {
            Configuration::Debug => &self.debug_args,
            Configuration::Release => &self.release_args,
        }
    }
}

/// Runs the configured build tool as a child process.
///
/// The build counts as failed when it writes anything to stderr; its exit
/// status is ignored.
#[derive(Clone, Debug, Default)]
pub struct CommandBuilder {
    config: BuildConfig,
}

impl CommandBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    fn spawn_error(&self, source: std::io::Error) -> HarnessError {
        HarnessError::Spawn {
            program: self.config.program.clone(),
            source,
        }
    }

    async fn clean(&self) -> Result<(), HarnessError> {
        Command::new(&self.config.program)
            .args(&self.config.clean_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;
        Ok(())
    }

    async fn build(&self, configuration: Configuration) -> Result<(), HarnessError> {
        self.clean().await?;

        let output = Command::new(&self.config.program)
            .args(self.config.args_for(configuration))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            return Err(HarnessError::Build {
                configuration,
                stderr: stderr.into_owned(),
            });
        }
        Ok(())
    }
}

impl Builder for CommandBuilder {
    fn ensure<'a>(
        &'a self,
        configuration: Configuration,
    ) -> Pin<Box<dyn Future<Output = Result<(), HarnessError>> + Send + 'a>> {
        Box::pin(self.build(configuration))
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
