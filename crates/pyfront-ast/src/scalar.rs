/*
 * scalar.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Membership tests for the special scalar element types.
 */

//! Special scalar kinds.
//!
//! An *identifier* is a string matching `^[A-Za-z_][A-Za-z0-9_]*$`. The
//! pattern is ASCII-only and does not accept dotted names; fields holding
//! qualified module paths are typed `string` instead. Any string is a
//! candidate identifier, so a string that fails the pattern is rejected as a
//! bad value rather than a bad type.
//!
//! A *singleton* is one of `True`, `False` or `None`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// True if `s` is shaped like an identifier.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// True if `value` has the right type to be checked as an identifier.
pub fn is_identifier_candidate(value: &Value) -> bool {
    matches!(value, Value::Str(_))
}

/// True for `True`, `False` and `None`.
pub fn is_singleton(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::None)
}

/// True for any primitive literal value.
pub fn is_constant(value: &Value) -> bool {
    matches!(
        value,
        Value::None
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Complex(_)
            | Value::Str(_)
            | Value::Bytes(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_pattern() {
        assert!(is_identifier("valid_name"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("x1"));
        assert!(!is_identifier("invalid name"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("os.path"));
        assert!(!is_identifier("naïve"));
    }

    #[test]
    fn test_singleton_members() {
        assert!(is_singleton(&Value::Bool(true)));
        assert!(is_singleton(&Value::Bool(false)));
        assert!(is_singleton(&Value::None));
        assert!(!is_singleton(&Value::Int(0)));
        assert!(!is_singleton(&Value::from("None")));
    }

    #[test]
    fn test_constant_excludes_containers() {
        assert!(is_constant(&Value::Int(3)));
        assert!(is_constant(&Value::from("s")));
        assert!(!is_constant(&Value::List(vec![])));
    }
}
