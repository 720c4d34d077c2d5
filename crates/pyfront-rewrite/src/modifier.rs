/*
 * modifier.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rewrite rules: a matcher paired with a replacement function.
 */

//! Rewrite rules.
//!
//! A [`Modifier`] pairs a [`Matcher`] with a rewrite function. The rewrite
//! may only be called on a node the matcher accepted, and its output must
//! never be accepted by the same matcher again: desugaring is a single
//! bottom-up pass, not a fixpoint.

use pyfront_ast::{Node, Replacement, SchemaRegistry};

use crate::build::TreeBuilder;
use crate::error::Result;
use crate::matcher::Matcher;
use crate::temp_names::TempNames;

/// State shared by all rules during one rewrite run.
pub struct RewriteContext<'a> {
    pub registry: &'a SchemaRegistry,
    pub names: &'a mut TempNames,
}

impl<'a> RewriteContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, names: &'a mut TempNames) -> Self {
        Self { registry, names }
    }

    pub fn builder(&self) -> TreeBuilder<'a> {
        TreeBuilder::new(self.registry)
    }

    pub fn fresh(&mut self, hint: &str) -> String {
        self.names.fresh(hint)
    }
}

/// A rewrite rule.
pub trait Modifier: Send + Sync {
    /// Rule name, used for configuration and logging.
    fn name(&self) -> &str;

    fn matcher(&self) -> &Matcher;

    /// Produce the replacement for a node the matcher accepted.
    fn rewrite(&self, node: Node, ctx: &mut RewriteContext<'_>) -> Result<Replacement>;
}

/// Apply a rule to a node.
///
/// The caller must already have checked `modifier.matcher()`; this does not
/// check it again.
pub fn apply(
    modifier: &dyn Modifier,
    node: Node,
    ctx: &mut RewriteContext<'_>,
) -> Result<Replacement> {
    tracing::debug!(rule = modifier.name(), kind = node.kind(), "Applying rewrite rule");
    modifier.rewrite(node, ctx)
}

/// A rule built from a closure.
pub struct FnModifier<F> {
    name: String,
    matcher: Matcher,
    rewrite: F,
}

impl<F> FnModifier<F>
where
    F: Fn(Node, &mut RewriteContext<'_>) -> Result<Replacement> + Send + Sync,
{
    pub fn new(name: impl Into<String>, matcher: Matcher, rewrite: F) -> Self {
        Self {
            name: name.into(),
            matcher,
            rewrite,
        }
    }
}

impl<F> Modifier for FnModifier<F>
where
    F: Fn(Node, &mut RewriteContext<'_>) -> Result<Replacement> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    fn rewrite(&self, node: Node, ctx: &mut RewriteContext<'_>) -> Result<Replacement> {
        (self.rewrite)(node, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfront_ast::python;

    #[test]
    fn test_fn_modifier_uses_context() {
        let rule = FnModifier::new("rename", Matcher::kind("Name"), |_node, ctx| {
            let id = ctx.fresh("__tmp");
            Ok(Replacement::node(ctx.builder().load(&id)?))
        });

        let mut names = TempNames::new();
        let mut ctx = RewriteContext::new(python::registry(), &mut names);
        let input = ctx.builder().load("x").unwrap();

        assert!(rule.matcher().matches_node(&input).unwrap());
        let out = apply(&rule, input, &mut ctx).unwrap().into_node().unwrap();
        assert_eq!(out.to_string(), "Name(id='__tmp_0', ctx=Load())");
        assert_eq!(names.issued("__tmp"), 1);
    }

    #[test]
    fn test_apply_does_not_recheck_matcher() {
        let rule = FnModifier::new("delete", Matcher::kind("Pass"), |_node, _ctx| {
            Ok(Replacement::Delete)
        });
        let mut names = TempNames::new();
        let mut ctx = RewriteContext::new(python::registry(), &mut names);
        let not_pass = ctx.builder().load("x").unwrap();
        assert_eq!(apply(&rule, not_pass, &mut ctx).unwrap(), Replacement::Delete);
    }
}
