/*
 * future.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Names accepted in `from __future__ import ...`.
 */

/// Module name that marks a future import.
pub const FUTURE_MODULE: &str = "__future__";

/// Every feature name Python defines for `__future__`.
pub const KNOWN_FEATURES: &[&str] = &[
    "nested_scopes",
    "generators",
    "division",
    "absolute_import",
    "with_statement",
    "print_function",
    "unicode_literals",
    "barry_as_FLUFL",
    "generator_stop",
    "annotations",
];

pub fn is_known_feature(name: &str) -> bool {
    KNOWN_FEATURES.contains(&name)
}
