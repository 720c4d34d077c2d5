/*
 * assert.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Lower assert statements to explicit raises.
 */

//! `assert test, msg` becomes `if not test: raise AssertionError(msg)`.

use pyfront_ast::{Node, Replacement, Value};

use super::take_node;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::modifier::{Modifier, RewriteContext};

pub const NAME: &str = "assert";

pub struct AssertRule {
    matcher: Matcher,
}

impl AssertRule {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::kind("Assert"),
        }
    }
}

impl Default for AssertRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Modifier for AssertRule {
    fn name(&self) -> &str {
        NAME
    }

    fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    fn rewrite(&self, mut node: Node, ctx: &mut RewriteContext<'_>) -> Result<Replacement> {
        let test = take_node(NAME, &mut node, "test")?;
        let args: Vec<Node> = node.take("msg")?.and_then(Value::into_node).into_iter().collect();

        let b = ctx.builder();
        let raise = b.raise(b.call("AssertionError", args)?)?;
        let check = b.if_stmt(b.not(test)?, vec![Value::from(raise)], Vec::new())?;
        Ok(Replacement::node(check))
    }
}
