// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable and JSON reports for a finished batch.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;
use similar::TextDiff;

use crate::executor::{BatchOutcome, FailureRecord, MissingBaseline, Mode};

const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// How a failing test is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailureStyle {
    /// Full baseline under `EXPECTED:`, full fresh output under `GOT:`
    #[default]
    Blocks,
    /// Unified line diff from baseline to fresh output
    UnifiedDiff,
}

#[derive(Clone, Debug, Default)]
pub struct Reporter {
    color: bool,
    style: FailureStyle,
}

impl Reporter {
    pub fn new(color: bool, style: FailureStyle) -> Self {
        Self { color, style }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Write the full text report for `outcome`.
    pub fn write<W: Write>(&self, w: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
        match outcome.mode {
            Mode::Bake => writeln!(w, "Done baking tests."),
            Mode::Test => self.write_test_report(w, outcome),
        }
    }

    fn write_test_report<W: Write>(&self, w: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
        writeln!(w)?;
        for error in &outcome.errors {
            self.write_error(w, error)?;
        }
        for failure in &outcome.failures {
            self.write_failure(w, failure)?;
        }
        self.write_summary(w, outcome)
    }

    fn write_error<W: Write>(&self, w: &mut W, error: &MissingBaseline) -> io::Result<()> {
        writeln!(
            w,
            "{}: {}",
            self.paint(BLUE, &error.test.display().to_string()),
            MissingBaseline::MESSAGE
        )
    }

    fn write_failure<W: Write>(&self, w: &mut W, failure: &FailureRecord) -> io::Result<()> {
        writeln!(
            w,
            "{}",
            self.paint(BLUE, &format!("{}:", failure.test.display()))
        )?;
        match self.style {
            FailureStyle::Blocks => {
                writeln!(w, "{}{}", self.paint(GREEN, "EXPECTED:\n"), failure.expected)?;
                writeln!(w, "{}{}\n", self.paint(RED, "GOT:\n"), failure.actual)
            }
            FailureStyle::UnifiedDiff => {
                let diff = TextDiff::from_lines(&failure.expected, &failure.actual);
                let rendered = diff
                    .unified_diff()
                    .context_radius(3)
                    .header("expected", "got")
                    .to_string();
                for line in rendered.lines() {
                    let painted = if line.starts_with("+++") || line.starts_with("---") {
                        line.to_string()
                    } else if line.starts_with('+') {
                        self.paint(RED, line)
                    } else if line.starts_with('-') {
                        self.paint(GREEN, line)
                    } else {
                        line.to_string()
                    };
                    writeln!(w, "{}", painted)?;
                }
                writeln!(w)
            }
        }
    }

    fn write_summary<W: Write>(&self, w: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
        write!(
            w,
            "\nFinished running tests. {}: {}. {}: {}.",
            self.paint(GREEN, "Correct"),
            outcome.passed(),
            self.paint(RED, "Failed"),
            outcome.failed()
        )?;
        if outcome.unbaked() > 0 {
            write!(w, " {}: {}.", self.paint(BLUE, "Unbaked"), outcome.unbaked())?;
        }
        writeln!(w)
    }
}

/// Machine-readable batch summary
#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    mode: Mode,
    total: usize,
    passed: usize,
    failed: usize,
    unbaked: usize,
    baked: &'a [PathBuf],
    failures: &'a [FailureRecord],
    errors: &'a [MissingBaseline],
}

/// Write `outcome` as one line of JSON.
pub fn write_json<W: Write>(w: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
    let summary = JsonSummary {
        mode: outcome.mode,
        total: outcome.total,
        passed: outcome.passed(),
        failed: outcome.failed(),
        unbaked: outcome.unbaked(),
        baked: &outcome.baked,
        failures: &outcome.failures,
        errors: &outcome.errors,
    };
    serde_json::to_writer(&mut *w, &summary)?;
    writeln!(w)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
