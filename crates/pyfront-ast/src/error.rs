/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for schema construction and node operations.
 */

use thiserror::Error;

/// Errors raised while building schemas or a schema registry.
///
/// Duplicate field names across an inheritance chain are the only schema
/// invariant checked eagerly; everything else is deferred to node operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("duplicate field '{field}' in kind '{kind}' (already declared by '{declared_by}')")]
    DuplicateField {
        kind: String,
        field: String,
        declared_by: String,
    },

    #[error("duplicate kind '{0}' in schema table")]
    DuplicateKind(String),

    #[error("kind '{kind}' names unknown parent '{parent}'")]
    UnknownParent { kind: String, parent: String },

    #[error("unknown node kind '{0}'")]
    UnknownKind(String),

    #[error("malformed schema table: {0}")]
    Table(#[from] serde_json::Error),
}

/// Errors raised by construction, assignment and finalize.
///
/// These are usage errors and are never batched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("{kind} constructor takes either 0 or {expected} positional arguments, got {given}")]
    Arity {
        kind: String,
        expected: usize,
        given: usize,
    },

    #[error("{kind} has no field '{field}'")]
    Field { kind: String, field: String },

    #[error("{}", wrong_type_message(.kind, .field, .expected, .got, .index))]
    WrongType {
        kind: String,
        field: String,
        expected: String,
        got: String,
        index: Option<usize>,
    },

    #[error("invalid value {value} for {kind}.{field}: not a valid {expected}")]
    WrongAttributeValue {
        kind: String,
        field: String,
        expected: String,
        value: String,
    },

    #[error("{kind} is missing required fields: {}", .missing.join(", "))]
    Incomplete { kind: String, missing: Vec<String> },

    #[error("unknown modifier '{modifier}' for field {kind}.{field}")]
    UnknownModifier {
        kind: String,
        field: String,
        modifier: String,
    },
}

fn wrong_type_message(
    kind: &str,
    field: &str,
    expected: &str,
    got: &str,
    index: &Option<usize>,
) -> String {
    match index {
        Some(index) => format!("{kind}.{field}[{index}] must be {expected}, got {got}"),
        None => format!("{kind}.{field} must be {expected}, got {got}"),
    }
}

pub type Result<T> = std::result::Result<T, NodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_type_message_names_index() {
        let err = NodeError::WrongType {
            kind: "Module".to_string(),
            field: "body".to_string(),
            expected: "stmt".to_string(),
            got: "int".to_string(),
            index: Some(2),
        };
        assert_eq!(err.to_string(), "Module.body[2] must be stmt, got int");
    }

    #[test]
    fn test_incomplete_message_lists_fields() {
        let err = NodeError::Incomplete {
            kind: "For".to_string(),
            missing: vec!["target".to_string(), "body".to_string()],
        };
        assert_eq!(err.to_string(), "For is missing required fields: target, body");
    }
}
