//! Built-in desugaring rules

use pyfront_ast::{Node, Value};

use crate::error::{Result, RewriteError};
use crate::modifier::Modifier;

pub mod assert;
pub mod aug_assign;
pub mod for_loop;

pub use assert::AssertRule;
pub use aug_assign::AugAssignRule;
pub use for_loop::ForLoopRule;

/// Names of the built-in rules, in their default order.
pub const RULE_NAMES: &[&str] = &[for_loop::NAME, aug_assign::NAME, assert::NAME];

pub fn rule_by_name(name: &str) -> Option<Box<dyn Modifier>> {
    match name {
        for_loop::NAME => Some(Box::new(ForLoopRule::new())),
        aug_assign::NAME => Some(Box::new(AugAssignRule::new())),
        assert::NAME => Some(Box::new(AssertRule::new())),
        _ => None,
    }
}

pub fn standard_rules() -> Vec<Box<dyn Modifier>> {
    RULE_NAMES.iter().filter_map(|name| rule_by_name(name)).collect()
}

/// Move a required node-valued field out of `node`.
fn take_node(rule: &str, node: &mut Node, field: &str) -> Result<Node> {
    node.take(field)?
        .and_then(Value::into_node)
        .ok_or_else(|| RewriteError::Shape {
            rule: rule.to_string(),
            expected: format!("a node in {}.{}", node.kind(), field),
        })
}

/// Move a sequence field out of `node`. Unset fields read as empty.
fn take_items(rule: &str, node: &mut Node, field: &str) -> Result<Vec<Value>> {
    match node.take(field)? {
        Some(Value::List(items) | Value::Tuple(items)) => Ok(items),
        None => Ok(Vec::new()),
        Some(other) => Err(RewriteError::Shape {
            rule: rule.to_string(),
            expected: format!(
                "a sequence in {}.{}, got {}",
                node.kind(),
                field,
                other.type_name()
            ),
        }),
    }
}
