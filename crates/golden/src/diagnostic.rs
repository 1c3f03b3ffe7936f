// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Harness diagnostics on stderr.
//!
//! Stdout carries only the report, so everything the harness says about
//! itself goes here. Errors and warnings are colored on a terminal; info
//! lines appear only with `--verbose`.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Error,
    Warning,
    Info,
}

impl Level {
    fn prefix(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "golden",
        }
    }

    /// ANSI color, if the level is ever colored
    fn color(self) -> Option<&'static str> {
        match self {
            Level::Error => Some("\x1b[31m"),
            Level::Warning => Some("\x1b[33m"),
            Level::Info => None,
        }
    }
}

fn write_line<W: Write>(writer: &mut W, level: Level, msg: impl Display, color: bool) {
    let _ = match level.color().filter(|_| color) {
        Some(code) => writeln!(writer, "{}{}: {}\x1b[0m", code, level.prefix(), msg),
        None => writeln!(writer, "{}: {}", level.prefix(), msg),
    };
}

fn emit(level: Level, msg: impl Display) {
    let stderr = io::stderr();
    let color = stderr.is_terminal();
    write_line(&mut stderr.lock(), level, msg, color);
}

pub fn print_error(msg: impl Display) {
    emit(Level::Error, msg);
}

pub fn print_warning(msg: impl Display) {
    emit(Level::Warning, msg);
}

/// Print a progress detail when `verbose` is set.
pub fn print_info(verbose: bool, msg: impl Display) {
    if verbose {
        emit(Level::Info, msg);
    }
}

/// Pass build tool output through unmodified.
pub fn print_raw(text: &str) {
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
