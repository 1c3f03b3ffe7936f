// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output normalization for deterministic comparison.
//!
//! The interpreter prints objects as `<Type>-<hex hash>`, where the hash
//! changes from run to run. Every capture is passed through the same
//! [`Normalizer`] before it is baked or compared, so both sides of a
//! comparison always carry `<Type>-hash` instead.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::runner::CapturedOutput;

/// Placeholder substituted for an object-identity hash
pub const HASH_PLACEHOLDER: &str = "hash";

/// `<Capitalized type>-<lowercase alnum run>`, type prefix kept in group 1
static OBJECT_HASH_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([A-Z][A-Za-z_]*-)([a-z0-9]+)").ok());

static ANSI_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").ok());

/// Replace object-identity hashes with [`HASH_PLACEHOLDER`].
pub fn mask_object_hashes(input: &str) -> String {
    match OBJECT_HASH_REGEX.as_ref() {
        Some(re) => re
            .replace_all(input, format!("${{1}}{}", HASH_PLACEHOLDER).as_str())
            .into_owned(),
        None => input.to_string(),
    }
}

/// Additional normalization configured by the user
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizationRule {
    /// Replace every match of `pattern` with `replacement`
    Replace {
        pattern: String,
        replacement: String,
    },
    /// Drop whole lines matching `pattern`
    RemoveLines { pattern: String },
    /// Strip ANSI escape codes
    StripAnsi,
}

#[derive(Clone, Debug)]
enum CompiledRule {
    Replace(Regex, String),
    RemoveLines(Regex),
    StripAnsi,
}

impl CompiledRule {
    fn compile(rule: &NormalizationRule) -> Result<Self, regex::Error> {
        Ok(match rule {
            NormalizationRule::Replace {
                pattern,
                replacement,
            } => CompiledRule::Replace(Regex::new(pattern)?, replacement.clone()),
            NormalizationRule::RemoveLines { pattern } => {
                CompiledRule::RemoveLines(Regex::new(pattern)?)
            }
            NormalizationRule::StripAnsi => CompiledRule::StripAnsi,
        })
    }

    fn apply(&self, input: &str) -> String {
        match self {
            CompiledRule::Replace(re, replacement) => {
                re.replace_all(input, replacement.as_str()).into_owned()
            }
            // Line terminators of the kept lines are preserved.
            CompiledRule::RemoveLines(re) => input
                .split_inclusive('\n')
                .filter(|line| !re.is_match(line.trim_end_matches(['\n', '\r'])))
                .collect(),
            CompiledRule::StripAnsi => match ANSI_REGEX.as_ref() {
                Some(re) => re.replace_all(input, "").into_owned(),
                None => input.to_string(),
            },
        }
    }
}

/// The single normalization pipeline shared by baking and testing
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    extra: Vec<CompiledRule>,
}

impl Normalizer {
    /// Normalizer that only masks object hashes
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer that masks object hashes, then applies `rules` in order
    pub fn with_rules(rules: &[NormalizationRule]) -> Result<Self, regex::Error> {
        let extra = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { extra })
    }

    pub fn normalize(&self, input: &str) -> String {
        self.extra
            .iter()
            .fold(mask_object_hashes(input), |acc, rule| rule.apply(&acc))
    }

    /// Normalize both streams of a capture.
    pub fn normalize_output(&self, captured: &CapturedOutput) -> NormalizedOutput {
        NormalizedOutput {
            stdout: self.normalize(&captured.stdout),
            stderr: self.normalize(&captured.stderr),
        }
    }
}

/// A capture after normalization; the unit that is baked or compared.
///
/// Displays as the baseline file text: a `STDOUT:` section, then `STDERR:`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for NormalizedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STDOUT:\n{}STDERR:\n{}", self.stdout, self.stderr)
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
