/*
 * pass.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Running rewrite rules over whole trees.
 */

//! Desugaring passes.
//!
//! - [`Desugarer`] - an ordered set of rules plus the registry they build
//!   nodes from
//! - [`ModifierPass`] - the [`Transformer`] that applies those rules
//!
//! Rules are dispatched through a table keyed by node kind. A rule whose
//! matcher is keyed on a base kind (`stmt`, `expr`) is found for every kind
//! inheriting from it. Children are rewritten before their parent, and a
//! rule's output is installed without being visited again.
//!
//! # Example
//!
//! ```ignore
//! let desugarer = Desugarer::standard(python::registry());
//! let mut names = TempNames::new();
//! let module = desugarer.run(module, &mut names)?;
//! ```

use std::collections::HashMap;

use pyfront_ast::{Node, Replacement, SchemaRegistry, Transformer, Value, Visitor, transform_children};

use crate::error::{RewriteError, Result};
use crate::modifier::{Modifier, RewriteContext, apply};
use crate::rules;
use crate::temp_names::TempNames;

/// An ordered collection of rewrite rules.
pub struct Desugarer<'r> {
    registry: &'r SchemaRegistry,
    modifiers: Vec<Box<dyn Modifier>>,
    /// Rule indices keyed by the kind their matcher names.
    by_kind: HashMap<String, Vec<usize>>,
    /// Rules whose matcher is not keyed on a kind; tried on every node.
    unkeyed: Vec<usize>,
}

impl<'r> Desugarer<'r> {
    /// Create an empty desugarer.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            modifiers: Vec::new(),
            by_kind: HashMap::new(),
            unkeyed: Vec::new(),
        }
    }

    /// A desugarer with every built-in rule.
    pub fn standard(registry: &'r SchemaRegistry) -> Self {
        let mut desugarer = Self::new(registry);
        desugarer.extend(rules::standard_rules());
        desugarer
    }

    /// A desugarer with the named built-in rules, in the given order.
    pub fn with_rules<S: AsRef<str>>(registry: &'r SchemaRegistry, names: &[S]) -> Result<Self> {
        let mut desugarer = Self::new(registry);
        for name in names {
            let name = name.as_ref();
            let rule =
                rules::rule_by_name(name).ok_or_else(|| RewriteError::UnknownRule(name.to_string()))?;
            desugarer.push(rule);
        }
        Ok(desugarer)
    }

    /// Add a rule. Earlier rules win when several match the same node.
    pub fn push(&mut self, modifier: Box<dyn Modifier>) {
        let index = self.modifiers.len();
        match modifier.matcher().kind_name() {
            Some(kind) => self.by_kind.entry(kind.to_string()).or_default().push(index),
            None => self.unkeyed.push(index),
        }
        self.modifiers.push(modifier);
    }

    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = Box<dyn Modifier>>) {
        for modifier in modifiers {
            self.push(modifier);
        }
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Rule names in priority order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.modifiers.iter().map(|m| m.name()).collect()
    }

    /// Rules that may apply to `node`, in priority order.
    fn candidates(&self, node: &Node) -> Vec<&dyn Modifier> {
        let mut indices: Vec<usize> = self.unkeyed.clone();
        let mut schema = Some(node.schema().as_ref());
        while let Some(current) = schema {
            if let Some(found) = self.by_kind.get(current.kind()) {
                indices.extend(found);
            }
            schema = current.parent().map(|p| p.as_ref());
        }
        indices.sort_unstable();
        indices.into_iter().map(|i| self.modifiers[i].as_ref()).collect()
    }

    /// The first rule whose matcher accepts `node`.
    pub fn find_match(&self, node: &Node) -> Result<Option<&dyn Modifier>> {
        for modifier in self.candidates(node) {
            if modifier.matcher().matches_node(node)? {
                return Ok(Some(modifier));
            }
        }
        Ok(None)
    }

    /// Apply every rule bottom-up across the tree.
    ///
    /// The root itself may be rewritten, but only into a single node.
    pub fn rewrite(&self, root: Node, names: &mut TempNames) -> Result<Node> {
        tracing::debug!(rules = ?self.rule_names(), "Running desugaring pass");
        let kind = root.kind().to_string();
        let mut pass = ModifierPass {
            desugarer: self,
            ctx: RewriteContext::new(self.registry, names),
            applied: 0,
        };
        let replacement = pass.visit(root)?;
        tracing::debug!(applied = pass.applied, "Desugaring pass finished");

        match replacement {
            Replacement::Value(Value::Node(node)) => Ok(*node),
            other => Err(RewriteError::RootReplaced {
                kind,
                replacement: describe(&other),
            }),
        }
    }

    /// Rewrite, finalize and verify a tree.
    pub fn run(&self, root: Node, names: &mut TempNames) -> Result<Node> {
        let mut node = self.rewrite(root, names)?;
        node.finalize()?;
        self.verify(&node)?;
        Ok(node)
    }

    /// Fail if any rule still matches a node of the tree.
    pub fn verify(&self, root: &Node) -> Result<()> {
        let mut check = ResidualCheck {
            desugarer: self,
            error: None,
        };
        check.visit(root);
        match check.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn describe(replacement: &Replacement) -> String {
    match replacement {
        Replacement::Value(value) => format!("a {} value", value.type_name()),
        Replacement::Splice(values) => format!("a sequence of {} values", values.len()),
        Replacement::ExplicitNone => "an explicit None".to_string(),
        Replacement::Delete => "nothing".to_string(),
    }
}

/// Applies a [`Desugarer`]'s rules during one tree walk.
pub struct ModifierPass<'a> {
    desugarer: &'a Desugarer<'a>,
    ctx: RewriteContext<'a>,
    applied: usize,
}

impl<'a> ModifierPass<'a> {
    pub fn new(desugarer: &'a Desugarer<'a>, names: &'a mut TempNames) -> Self {
        Self {
            desugarer,
            ctx: RewriteContext::new(desugarer.registry, names),
            applied: 0,
        }
    }

    /// Number of rewrites performed so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Transformer for ModifierPass<'_> {
    type Error = RewriteError;

    fn visit(&mut self, mut node: Node) -> Result<Replacement> {
        transform_children(self, &mut node)?;
        let desugarer = self.desugarer;
        match desugarer.find_match(&node)? {
            Some(modifier) => {
                self.applied += 1;
                apply(modifier, node, &mut self.ctx)
            }
            None => Ok(Replacement::node(node)),
        }
    }
}

struct ResidualCheck<'a> {
    desugarer: &'a Desugarer<'a>,
    error: Option<RewriteError>,
}

impl Visitor for ResidualCheck<'_> {
    fn visit(&mut self, node: &Node) {
        if self.error.is_some() {
            return;
        }
        match self.desugarer.find_match(node) {
            Ok(Some(modifier)) => {
                self.error = Some(RewriteError::Residual {
                    rule: modifier.name().to_string(),
                    node: node.to_string(),
                });
            }
            Ok(None) => self.generic_visit(node),
            Err(err) => self.error = Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::modifier::FnModifier;
    use pyfront_ast::python;

    fn module(body: Vec<Node>) -> Node {
        Node::with_fields(
            python::schema("Module").unwrap(),
            [("body", Value::from(body))],
        )
        .unwrap()
    }

    fn pass_stmt() -> Node {
        Node::empty(python::schema("Pass").unwrap())
    }

    fn continue_stmt() -> Node {
        Node::empty(python::schema("Continue").unwrap())
    }

    fn drop_pass() -> Box<dyn Modifier> {
        Box::new(FnModifier::new("drop-pass", Matcher::kind("Pass"), |_, _| {
            Ok(Replacement::Delete)
        }))
    }

    #[test]
    fn test_rules_keyed_on_base_kind_apply_to_subkinds() {
        let registry = python::registry();
        let mut desugarer = Desugarer::new(registry);
        desugarer.push(Box::new(FnModifier::new(
            "any-stmt",
            Matcher::kind("stmt"),
            |_, ctx| Ok(Replacement::node(ctx.builder().leaf("Break")?)),
        )));

        let mut names = TempNames::new();
        let out = desugarer
            .rewrite(module(vec![pass_stmt(), continue_stmt()]), &mut names)
            .unwrap();
        assert_eq!(out.to_string(), "Module(body=[Break(), Break()])");
    }

    #[test]
    fn test_first_registered_rule_wins() {
        let registry = python::registry();
        let mut desugarer = Desugarer::new(registry);
        desugarer.push(drop_pass());
        desugarer.push(Box::new(FnModifier::new(
            "pass-to-break",
            Matcher::kind("Pass"),
            |_, ctx| Ok(Replacement::node(ctx.builder().leaf("Break")?)),
        )));
        assert_eq!(desugarer.rule_names(), vec!["drop-pass", "pass-to-break"]);

        let mut names = TempNames::new();
        let out = desugarer
            .rewrite(module(vec![pass_stmt(), continue_stmt()]), &mut names)
            .unwrap();
        assert_eq!(out.to_string(), "Module(body=[Continue()])");
    }

    #[test]
    fn test_root_must_stay_a_node() {
        let registry = python::registry();
        let mut desugarer = Desugarer::new(registry);
        desugarer.push(drop_pass());

        let mut names = TempNames::new();
        let err = desugarer.rewrite(pass_stmt(), &mut names).unwrap_err();
        assert_eq!(err.to_string(), "root Pass node was replaced by nothing");
    }

    #[test]
    fn test_verify_reports_residual_matches() {
        let registry = python::registry();
        let mut desugarer = Desugarer::new(registry);
        desugarer.push(drop_pass());

        let tree = module(vec![continue_stmt(), pass_stmt()]);
        let err = desugarer.verify(&tree).unwrap_err();
        assert!(matches!(err, RewriteError::Residual { ref rule, .. } if rule == "drop-pass"));
        assert!(desugarer.verify(&module(vec![continue_stmt()])).is_ok());
    }

    #[test]
    fn test_with_rules_rejects_unknown_names() {
        let err = Desugarer::with_rules(python::registry(), &["for-loop", "no-such-rule"])
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "unknown desugaring rule 'no-such-rule'");
    }

    #[test]
    fn test_modifier_pass_counts_rewrites() {
        let registry = python::registry();
        let mut desugarer = Desugarer::new(registry);
        desugarer.push(drop_pass());

        let mut names = TempNames::new();
        let mut pass = ModifierPass::new(&desugarer, &mut names);
        pass.visit(module(vec![pass_stmt(), pass_stmt(), continue_stmt()]))
            .unwrap();
        assert_eq!(pass.applied(), 2);
    }
}
