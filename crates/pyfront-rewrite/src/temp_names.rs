/*
 * temp_names.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-run counters for compiler-generated variable names.
 */

use std::collections::HashMap;

/// Generates `{hint}_{ordinal}` names, counting separately for each hint.
///
/// One instance belongs to one compilation run; names restart from `_0`
/// after [`TempNames::reset`].
#[derive(Debug, Default, Clone)]
pub struct TempNames {
    counters: HashMap<String, usize>,
}

impl TempNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next unused name for `hint`.
    pub fn fresh(&mut self, hint: &str) -> String {
        let counter = self.counters.entry(hint.to_string()).or_insert(0);
        let name = format!("{hint}_{counter}");
        *counter += 1;
        name
    }

    /// How many names have been handed out for `hint`.
    pub fn issued(&self, hint: &str) -> usize {
        self.counters.get(hint).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }
}
