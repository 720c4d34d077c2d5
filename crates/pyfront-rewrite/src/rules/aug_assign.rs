/*
 * aug_assign.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Lower augmented assignment to plain names.
 */

//! `x op= value` becomes `x = x op value`.
//!
//! Only plain name targets are rewritten. Attribute and subscript targets
//! would evaluate their base expression twice and are left alone.

use pyfront_ast::{Node, Replacement, Value};

use super::take_node;
use crate::error::{Result, RewriteError};
use crate::matcher::Matcher;
use crate::modifier::{Modifier, RewriteContext};

pub const NAME: &str = "aug-assign";

pub struct AugAssignRule {
    matcher: Matcher,
}

impl AugAssignRule {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::kind("AugAssign").attr("target", Matcher::kind("Name")),
        }
    }
}

impl Default for AugAssignRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Modifier for AugAssignRule {
    fn name(&self) -> &str {
        NAME
    }

    fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    fn rewrite(&self, mut node: Node, ctx: &mut RewriteContext<'_>) -> Result<Replacement> {
        let target = take_node(NAME, &mut node, "target")?;
        let op = take_node(NAME, &mut node, "op")?;
        let value = take_node(NAME, &mut node, "value")?;

        let id = target
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| RewriteError::Shape {
                rule: NAME.to_string(),
                expected: "a name target".to_string(),
            })?
            .to_string();

        let b = ctx.builder();
        let binop = b.node(
            "BinOp",
            vec![
                ("left", Value::from(b.load(&id)?)),
                ("op", Value::from(op)),
                ("right", Value::from(value)),
            ],
        )?;
        Ok(Replacement::node(b.assign(&id, binop)?))
    }
}
