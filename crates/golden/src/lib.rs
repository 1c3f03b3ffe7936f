// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden-file regression harness.
//!
//! Builds an interpreter in its debug or release configuration, runs a
//! corpus of scripts against it and either bakes the normalized output as
//! the expected baseline or compares fresh output against the baseline.

pub mod baseline;
pub mod builder;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod executor;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod runner;
pub mod suite;

/// Process exit codes for the harness binary
pub mod exit_codes {
    /// Every test passed (or the batch only baked)
    pub const SUCCESS: i32 = 0;
    /// At least one test failed or had no baseline in strict mode
    pub const TEST_FAILURES: i32 = 1;
    /// The build tool reported errors
    pub const BUILD_FAILED: i32 = 2;
    /// Configuration, spawn or I/O error inside the harness
    pub const HARNESS_ERROR: i32 = 3;
}
