// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness configuration loaded from `golden.toml`.
//!
//! Every field has a default, so the file is optional. Command-line flags
//! override file values via [`HarnessConfig::apply_cli`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::BuildConfig;
use crate::cli::Cli;
use crate::executor::MissingBaselinePolicy;
use crate::normalize::{NormalizationRule, Normalizer};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "golden.toml";

fn default_true() -> bool {
    true
}

fn default_binary() -> PathBuf {
    PathBuf::from("./stamp")
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("tests")
}

fn default_script_extension() -> String {
    "st".to_string()
}

fn default_baseline_extension() -> String {
    crate::baseline::DEFAULT_EXTENSION.to_string()
}

fn default_debug_prefix() -> PathBuf {
    PathBuf::from("tests/dbg")
}

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Validation(String),

    #[error("invalid normalization pattern: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Top-level harness configuration
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Interpreter to run each test with (default: "./stamp")
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Root searched for test scripts (default: "tests")
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,

    /// Script file extension, without the dot (default: "st")
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    /// Baseline file extension, without the dot (default: "out")
    #[serde(default = "default_baseline_extension")]
    pub baseline_extension: String,

    /// Tests under this path need the debug build (default: "tests/dbg")
    #[serde(default = "default_debug_prefix")]
    pub debug_prefix: PathBuf,

    /// Bake missing baselines during test runs (default: true)
    #[serde(default = "default_true")]
    pub autobake: bool,

    /// Exit non-zero when any test fails (default: true)
    #[serde(default = "default_true")]
    pub fail_on_mismatch: bool,

    #[serde(default)]
    pub build: BuildConfig,

    /// Extra rules applied after object-hash masking
    #[serde(default)]
    pub normalization_rules: Vec<NormalizationRule>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            tests_dir: default_tests_dir(),
            script_extension: default_script_extension(),
            baseline_extension: default_baseline_extension(),
            debug_prefix: default_debug_prefix(),
            autobake: true,
            fail_on_mismatch: true,
            build: BuildConfig::default(),
            normalization_rules: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config for an invocation: the explicit `--config` file,
    /// else `golden.toml` in `cwd` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let implicit = cwd.join(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::load(&implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, ext) in [
            ("script_extension", &self.script_extension),
            ("baseline_extension", &self.baseline_extension),
        ] {
            if ext.is_empty() || ext.contains(['.', '/']) {
                return Err(ConfigError::Validation(format!(
                    "{} must be a bare extension, got '{}'",
                    name, ext
                )));
            }
        }
        if self.script_extension == self.baseline_extension {
            return Err(ConfigError::Validation(
                "script_extension and baseline_extension must differ".to_string(),
            ));
        }
        if self.build.program.is_empty() {
            return Err(ConfigError::Validation(
                "build.program cannot be empty".to_string(),
            ));
        }
        Normalizer::with_rules(&self.normalization_rules)?;
        Ok(())
    }

    /// Overlay command-line flags.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref binary) = cli.binary {
            self.binary = binary.clone();
        }
        if let Some(ref dir) = cli.tests_dir {
            self.tests_dir = dir.clone();
        }
        if cli.no_autobake {
            self.autobake = false;
        }
        if cli.allow_failures {
            self.fail_on_mismatch = false;
        }
    }

    pub fn missing_baseline_policy(&self) -> MissingBaselinePolicy {
        if self.autobake {
            MissingBaselinePolicy::Autobake
        } else {
            MissingBaselinePolicy::Strict
        }
    }

    pub fn normalizer(&self) -> Result<Normalizer, ConfigError> {
        Ok(Normalizer::with_rules(&self.normalization_rules)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
