//! Error types for matching and rewriting

use pyfront_ast::{NodeError, SchemaError};
use thiserror::Error;

/// A matcher was built from something it cannot compare against.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("cannot match against a {0} value: expected a primitive or a nested matcher")]
    UnsupportedPattern(String),
}

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("rule '{rule}' expected {expected}")]
    Shape { rule: String, expected: String },

    #[error("root {kind} node was replaced by {replacement}")]
    RootReplaced { kind: String, replacement: String },

    #[error("rule '{rule}' still matches after desugaring: {node}")]
    Residual { rule: String, node: String },

    #[error("unknown desugaring rule '{0}'")]
    UnknownRule(String),
}

pub type Result<T> = std::result::Result<T, RewriteError>;
