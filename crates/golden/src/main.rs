// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden harness binary entry point.

use std::io::{self, IsTerminal};
use std::path::Path;

use clap::Parser;

use golden::baseline::BaselineStore;
use golden::builder::CommandBuilder;
use golden::cli::{Cli, Selection};
use golden::config::HarnessConfig;
use golden::diagnostic::{print_error, print_info, print_raw};
use golden::error::HarnessError;
use golden::executor::{BatchExecutor, ExecutorOptions};
use golden::exit_codes;
use golden::report::{write_json, FailureStyle, Reporter};
use golden::runner::ProcessRunner;
use golden::suite::{discover, TestFile};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = run(&cli).await;
    std::process::exit(code);
}

async fn run(cli: &Cli) -> i32 {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            print_error(format_args!("cannot determine working directory: {}", e));
            return exit_codes::HARNESS_ERROR;
        }
    };

    let mut config = match HarnessConfig::resolve(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(e) => {
            print_error(e);
            return exit_codes::HARNESS_ERROR;
        }
    };
    config.apply_cli(cli);

    let normalizer = match config.normalizer() {
        Ok(normalizer) => normalizer,
        Err(e) => {
            print_error(e);
            return exit_codes::HARNESS_ERROR;
        }
    };

    let builder = CommandBuilder::new(config.build.clone());
    let runner = ProcessRunner::new(&config.binary);
    let store = BaselineStore::new(&config.baseline_extension);
    let options = ExecutorOptions {
        missing_baseline: config.missing_baseline_policy(),
        progress: !cli.json && io::stderr().is_terminal(),
        verbose: cli.verbose,
    };
    let executor = BatchExecutor::new(&builder, &runner, &normalizer, &store, options);

    let style = if cli.diff {
        FailureStyle::UnifiedDiff
    } else {
        FailureStyle::Blocks
    };
    let reporter = Reporter::new(!cli.no_color && io::stdout().is_terminal(), style);

    let mut code = exit_codes::SUCCESS;
    for plan in cli.plans() {
        let files = match select(&plan.selection, &config, &cwd) {
            Ok(files) => files,
            Err(e) => {
                print_error(e);
                return exit_codes::HARNESS_ERROR;
            }
        };
        print_info(
            cli.verbose,
            format_args!("{:?} batch of {} tests", plan.mode, files.len()),
        );

        let outcome = match executor.execute(&files, plan.mode).await {
            Ok(outcome) => outcome,
            Err(HarnessError::Build {
                configuration,
                stderr,
            }) => {
                print_raw(&stderr);
                print_error(format_args!("{} build failed", configuration));
                return exit_codes::BUILD_FAILED;
            }
            Err(e) => {
                print_error(&e);
                return e.exit_code();
            }
        };

        let mut stdout = io::stdout().lock();
        let written = if cli.json {
            write_json(&mut stdout, &outcome)
        } else {
            reporter.write(&mut stdout, &outcome)
        };
        if let Err(e) = written {
            print_error(format_args!("failed to write report: {}", e));
            return exit_codes::HARNESS_ERROR;
        }

        if !outcome.is_clean() && config.fail_on_mismatch {
            code = exit_codes::TEST_FAILURES;
        }
    }
    code
}

/// Turn a selection into classified test files.
fn select(
    selection: &Selection,
    config: &HarnessConfig,
    cwd: &Path,
) -> Result<Vec<TestFile>, HarnessError> {
    let paths = match selection {
        Selection::All => discover(&config.tests_dir, &config.script_extension)?,
        Selection::Files(paths) => {
            if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
                return Err(HarnessError::TestNotFound(missing.clone()));
            }
            paths.clone()
        }
    };
    Ok(paths
        .into_iter()
        .map(|p| TestFile::classify(p, &config.debug_prefix, cwd))
        .collect())
}
