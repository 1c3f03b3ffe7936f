// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::executor::Mode;

/// Golden-file regression harness
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "golden", version, about = "Bake and check interpreter test output")]
pub struct Cli {
    /// Store new baselines for FILEs (all discovered tests when none are given)
    #[arg(short = 'b', long = "bake", value_name = "FILE", num_args = 0..)]
    pub bake: Option<Vec<PathBuf>>,

    /// Check FILEs against their baselines (all discovered tests when none are given)
    #[arg(short = 'f', long = "files", value_name = "FILE", num_args = 0..)]
    pub files: Option<Vec<PathBuf>>,

    /// Report tests without a baseline instead of baking them
    #[arg(short = 'a', long = "no-autobake")]
    pub no_autobake: bool,

    /// Config file (default: ./golden.toml when present)
    #[arg(short = 'c', long, value_name = "PATH", env = "GOLDEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interpreter binary to test
    #[arg(long, value_name = "PATH", env = "GOLDEN_BINARY")]
    pub binary: Option<PathBuf>,

    /// Directory searched for test scripts
    #[arg(long, value_name = "DIR")]
    pub tests_dir: Option<PathBuf>,

    /// Show failures as unified diffs instead of expected/got blocks
    #[arg(long)]
    pub diff: bool,

    /// Print the batch summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Exit 0 even when tests fail
    #[arg(long)]
    pub allow_failures: bool,

    /// Log build steps and per-test exit codes to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Which tests a batch covers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every script found under the tests directory
    All,
    Files(Vec<PathBuf>),
}

impl Selection {
    fn from_arg(files: &[PathBuf]) -> Self {
        if files.is_empty() {
            Selection::All
        } else {
            Selection::Files(files.to_vec())
        }
    }
}

/// One batch to execute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub mode: Mode,
    pub selection: Selection,
}

impl Cli {
    /// Batches requested by the flags, in execution order.
    ///
    /// Baking runs before testing when both are requested; with neither,
    /// every discovered test is checked.
    pub fn plans(&self) -> Vec<Plan> {
        let mut plans = Vec::new();
        if let Some(ref files) = self.bake {
            plans.push(Plan {
                mode: Mode::Bake,
                selection: Selection::from_arg(files),
            });
        }
        if let Some(ref files) = self.files {
            plans.push(Plan {
                mode: Mode::Test,
                selection: Selection::from_arg(files),
            });
        }
        if plans.is_empty() {
            plans.push(Plan {
                mode: Mode::Test,
                selection: Selection::All,
            });
        }
        plans
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
