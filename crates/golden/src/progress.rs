// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Progress bar for a batch subset.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::executor::Mode;
use crate::suite::Configuration;

/// Labels are padded so debug and release bars line up.
const TEMPLATE: &str = "{msg:<22} |{bar:32}| {pos}/{len}";

/// One bar per subset, drawn on stderr
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// A hidden bar when `enabled` is false; it still counts.
    pub fn new(mode: Mode, configuration: Configuration, total: usize, enabled: bool) -> Self {
        let target = if enabled {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(total as u64), target);
        bar.set_style(style());
        bar.set_message(label(mode, configuration));
        Self { bar }
    }

    pub fn start(&self) {
        self.bar.tick();
    }

    pub fn tick(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

fn style() -> ProgressStyle {
    ProgressStyle::with_template(TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn label(mode: Mode, configuration: Configuration) -> String {
    let verb = match mode {
        Mode::Bake => "Baking",
        Mode::Test => "Running",
    };
    format!("{} {} tests.", verb, configuration)
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
