/*
 * matcher.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Structural predicates over syntax trees.
 */

//! Structural matchers.
//!
//! A [`Matcher`] is a pure predicate over a [`Value`]. Kind matchers accept a
//! node of the given kind (or any kind inheriting from it) whose named
//! attributes satisfy nested matchers:
//!
//! ```
//! use pyfront_rewrite::Matcher;
//!
//! // x += ... where x is a plain name
//! let m = Matcher::kind("AugAssign").attr("target", Matcher::kind("Name"));
//! ```
//!
//! An `Equals` matcher only compares primitive values. Holding a node or a
//! collection is a usage error and is reported as [`MatchError`] rather than
//! treated as a mismatch.

use std::fmt;
use std::sync::Arc;

use pyfront_ast::{Node, Slot, Value};

use crate::error::MatchError;

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

#[derive(Clone)]
pub enum Matcher {
    /// Primitive equality. Integers and floats compare numerically.
    Equals(Value),
    /// A node of `kind` or a sub-kind whose attributes all match.
    Kind {
        kind: String,
        attrs: Vec<(String, Matcher)>,
    },
    Predicate(Arc<PredicateFn>),
}

impl Matcher {
    pub fn kind(kind: impl Into<String>) -> Self {
        Matcher::Kind {
            kind: kind.into(),
            attrs: Vec::new(),
        }
    }

    /// Add an attribute constraint to a kind matcher.
    ///
    /// Has no effect on other matchers.
    pub fn attr(mut self, name: impl Into<String>, matcher: impl Into<Matcher>) -> Self {
        if let Matcher::Kind { attrs, .. } = &mut self {
            attrs.push((name.into(), matcher.into()));
        }
        self
    }

    pub fn equals(value: impl Into<Value>) -> Self {
        Matcher::Equals(value.into())
    }

    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Predicate(Arc::new(f))
    }

    /// The kind a kind matcher is keyed on.
    pub fn kind_name(&self) -> Option<&str> {
        match self {
            Matcher::Kind { kind, .. } => Some(kind.as_str()),
            _ => None,
        }
    }

    pub fn matches(&self, value: &Value) -> Result<bool, MatchError> {
        match self {
            Matcher::Equals(expected) => equals(expected, value),
            Matcher::Kind { .. } => match value.as_node() {
                Some(node) => self.matches_node(node),
                None => Ok(false),
            },
            Matcher::Predicate(f) => Ok(f(value)),
        }
    }

    pub fn matches_node(&self, node: &Node) -> Result<bool, MatchError> {
        let Matcher::Kind { kind, attrs } = self else {
            return self.matches(&Value::from(node.clone()));
        };
        if !node.is_a(kind) {
            return Ok(false);
        }
        for (name, expected) in attrs {
            let matched = match node.slot(name) {
                None | Some(Slot::Unset) => false,
                Some(Slot::ExplicitNone) => expected.matches(&Value::None)?,
                Some(Slot::Value(actual)) => expected.matches(actual)?,
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn equals(expected: &Value, actual: &Value) -> Result<bool, MatchError> {
    match (expected, actual) {
        (Value::Node(_) | Value::List(_) | Value::Tuple(_), _) => Err(
            MatchError::UnsupportedPattern(expected.type_name().to_string()),
        ),
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
            Ok(int_equals_float(*a, *b))
        }
        _ => Ok(expected == actual),
    }
}

/// Exact comparison; no rounding of `a` beyond 2^53.
fn int_equals_float(a: i64, b: f64) -> bool {
    // -2^63 and 2^63 are exact in f64.
    b.fract() == 0.0 && b >= i64::MIN as f64 && b < i64::MAX as f64 && b as i64 == a
}

impl From<Value> for Matcher {
    fn from(value: Value) -> Self {
        Matcher::Equals(value)
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Matcher::Equals(Value::from(s))
    }
}

impl From<bool> for Matcher {
    fn from(b: bool) -> Self {
        Matcher::Equals(Value::Bool(b))
    }
}

impl From<i64> for Matcher {
    fn from(n: i64) -> Self {
        Matcher::Equals(Value::Int(n))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Equals(value) => write!(f, "{value}"),
            Matcher::Kind { kind, attrs } => {
                write!(f, "{kind}(")?;
                for (i, (name, m)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={m:?}")?;
                }
                f.write_str(")")
            }
            Matcher::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}
