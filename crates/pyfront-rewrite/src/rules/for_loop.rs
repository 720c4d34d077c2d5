/*
 * for_loop.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Lower `for` loops to `while True` loops over an explicit iterator.
 */

//! `for` loop lowering.
//!
//! ```text
//! for t in it:              __nobreak_0 = False          # only with else
//!     body                  __iter_0 = iter(it)
//! else:                     while True:
//!     orelse                    try:
//!                                   __item_0 = next(__iter_0)
//!                               except StopIteration:
//!                                   __nobreak_0 = True   # only with else
//!                                   break
//!                               t = __item_0
//!                               body
//!                           if __nobreak_0:              # only with else
//!                               orelse
//! ```
//!
//! `break` and `continue` in the original body keep their meaning because
//! they now act on the `while` loop.

use pyfront_ast::{Node, Replacement, Value};

use super::{take_items, take_node};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::modifier::{Modifier, RewriteContext};

pub const NAME: &str = "for-loop";

pub struct ForLoopRule {
    matcher: Matcher,
}

impl ForLoopRule {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::kind("For"),
        }
    }
}

impl Default for ForLoopRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Modifier for ForLoopRule {
    fn name(&self) -> &str {
        NAME
    }

    fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    fn rewrite(&self, mut node: Node, ctx: &mut RewriteContext<'_>) -> Result<Replacement> {
        let target = take_node(NAME, &mut node, "target")?;
        let iter = take_node(NAME, &mut node, "iter")?;
        let body = take_items(NAME, &mut node, "body")?;
        let orelse = take_items(NAME, &mut node, "orelse")?;

        let b = ctx.builder();
        let iter_name = ctx.fresh("__iter");
        let item_name = ctx.fresh("__item");
        let nobreak = if orelse.is_empty() {
            None
        } else {
            Some(ctx.fresh("__nobreak"))
        };

        let mut out = Vec::new();
        if let Some(flag) = &nobreak {
            out.push(b.assign(flag, b.constant(false)?)?);
        }
        out.push(b.assign(&iter_name, b.call("iter", vec![iter])?)?);

        let advance = b.assign(&item_name, b.call("next", vec![b.load(&iter_name)?])?)?;
        let mut exhausted = Vec::new();
        if let Some(flag) = &nobreak {
            exhausted.push(b.assign(flag, b.constant(true)?)?);
        }
        exhausted.push(b.leaf("Break")?);
        let step = b.try_except(vec![advance], "StopIteration", exhausted)?;

        let mut loop_body = vec![
            Value::from(step),
            Value::from(b.assign_to(target, b.load(&item_name)?)?),
        ];
        loop_body.extend(body);
        out.push(b.while_true(loop_body)?);

        if let Some(flag) = &nobreak {
            out.push(b.if_stmt(b.load(flag)?, orelse, Vec::new())?);
        }

        Ok(Replacement::nodes(out))
    }
}
