// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Batch execution: build once per configuration, then bake or compare.
//!
//! A batch is split into its debug and release halves. Each non-empty
//! half gets exactly one `Builder::ensure` call before any of its tests
//! run, debug first. Tests run one at a time in input order. Per-test
//! problems (mismatches, missing baselines) are collected into the
//! [`BatchOutcome`]; build, spawn and I/O errors abort the batch.

use std::path::PathBuf;

use serde::Serialize;

use crate::baseline::BaselineStore;
use crate::builder::Builder;
use crate::diagnostic::print_info;
use crate::error::HarnessError;
use crate::normalize::{NormalizedOutput, Normalizer};
use crate::progress::Progress;
use crate::runner::Runner;
use crate::suite::{partition, TestFile};

/// What a batch does with fresh output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Store fresh output as the baseline
    Bake,
    /// Compare fresh output against the baseline
    Test,
}

/// What to do when a test has no baseline yet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingBaselinePolicy {
    /// Bake the fresh output and count the test as passed
    #[default]
    Autobake,
    /// Report an error entry; the test neither passes nor fails
    Strict,
}

#[derive(Clone, Debug, Default)]
pub struct ExecutorOptions {
    pub missing_baseline: MissingBaselinePolicy,
    /// Draw a progress line on stderr
    pub progress: bool,
    pub verbose: bool,
}

/// A test whose output no longer matches its baseline
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub test: PathBuf,
    pub expected: String,
    pub actual: String,
}

/// A test that could not be compared because it was never baked
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingBaseline {
    pub test: PathBuf,
}

impl MissingBaseline {
    pub const MESSAGE: &'static str =
        "No baseline file found for test. Bake the test or rerun without -a to autobake.";
}

/// Everything a batch produced, in the order it happened
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub mode: Mode,
    pub total: usize,
    /// Baselines written, by explicit bake or autobake
    pub baked: Vec<PathBuf>,
    pub failures: Vec<FailureRecord>,
    pub errors: Vec<MissingBaseline>,
}

impl BatchOutcome {
    fn new(mode: Mode, total: usize) -> Self {
        Self {
            mode,
            total,
            baked: Vec::new(),
            failures: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn unbaked(&self) -> usize {
        self.errors.len()
    }

    /// Tests that neither failed nor lacked a baseline.
    pub fn passed(&self) -> usize {
        self.total - self.failed() - self.unbaked()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }
}

/// Runs batches of test files against freshly built interpreters
pub struct BatchExecutor<'a> {
    builder: &'a dyn Builder,
    runner: &'a dyn Runner,
    normalizer: &'a Normalizer,
    store: &'a BaselineStore,
    options: ExecutorOptions,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(
        builder: &'a dyn Builder,
        runner: &'a dyn Runner,
        normalizer: &'a Normalizer,
        store: &'a BaselineStore,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            builder,
            runner,
            normalizer,
            store,
            options,
        }
    }

    pub async fn execute(
        &self,
        files: &[TestFile],
        mode: Mode,
    ) -> Result<BatchOutcome, HarnessError> {
        let split = partition(files);
        let mut outcome = BatchOutcome::new(mode, files.len());

        for (configuration, subset) in split.subsets() {
            print_info(
                self.options.verbose,
                format_args!("building {} configuration", configuration),
            );
            self.builder.ensure(configuration).await?;

            let progress =
                Progress::new(mode, configuration, subset.len(), self.options.progress);
            progress.start();
            for test in subset {
                let fresh = self.produce(test).await?;
                match mode {
                    Mode::Bake => self.bake(test, &fresh, &mut outcome).await?,
                    Mode::Test => self.compare(test, &fresh, &mut outcome).await?,
                }
                progress.tick();
            }
            progress.finish();
        }

        Ok(outcome)
    }

    /// Run one test and normalize what it printed.
    async fn produce(&self, test: &TestFile) -> Result<NormalizedOutput, HarnessError> {
        let captured = self.runner.run(test.path()).await?;
        print_info(
            self.options.verbose,
            format_args!(
                "ran {} (exit {})",
                test,
                captured
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string())
            ),
        );
        Ok(self.normalizer.normalize_output(&captured))
    }

    async fn bake(
        &self,
        test: &TestFile,
        fresh: &NormalizedOutput,
        outcome: &mut BatchOutcome,
    ) -> Result<(), HarnessError> {
        let path = self.store.write(test.path(), &fresh.to_string()).await?;
        outcome.baked.push(path);
        Ok(())
    }

    async fn compare(
        &self,
        test: &TestFile,
        fresh: &NormalizedOutput,
        outcome: &mut BatchOutcome,
    ) -> Result<(), HarnessError> {
        if !self.store.exists(test.path()) {
            match self.options.missing_baseline {
                MissingBaselinePolicy::Autobake => {
                    print_info(self.options.verbose, format_args!("autobaking {}", test));
                    self.bake(test, fresh, outcome).await?;
                }
                MissingBaselinePolicy::Strict => outcome.errors.push(MissingBaseline {
                    test: test.path().to_path_buf(),
                }),
            }
            return Ok(());
        }

        let expected = self.store.read(test.path()).await?;
        let actual = fresh.to_string();
        if expected != actual {
            outcome.failures.push(FailureRecord {
                test: test.path().to_path_buf(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
