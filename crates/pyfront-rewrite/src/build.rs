/*
 * build.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Helpers for building the Python nodes emitted by rewrite rules.
 */

use std::sync::Arc;

use pyfront_ast::{Node, NodeSchema, SchemaRegistry, Value};

use crate::error::Result;

/// Builds validated nodes from a schema registry.
#[derive(Clone, Copy)]
pub struct TreeBuilder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    fn schema(&self, kind: &str) -> Result<&'a Arc<NodeSchema>> {
        Ok(self.registry.get(kind)?)
    }

    pub fn node(&self, kind: &str, fields: Vec<(&str, Value)>) -> Result<Node> {
        Ok(Node::with_fields(self.schema(kind)?, fields)?)
    }

    /// A node with no fields, such as an operator or a context marker.
    pub fn leaf(&self, kind: &str) -> Result<Node> {
        Ok(Node::empty(self.schema(kind)?))
    }

    pub fn load(&self, id: &str) -> Result<Node> {
        self.name(id, "Load")
    }

    pub fn store(&self, id: &str) -> Result<Node> {
        self.name(id, "Store")
    }

    fn name(&self, id: &str, ctx: &str) -> Result<Node> {
        self.node(
            "Name",
            vec![("id", Value::from(id)), ("ctx", Value::from(self.leaf(ctx)?))],
        )
    }

    pub fn constant(&self, value: impl Into<Value>) -> Result<Node> {
        self.node("NameConstant", vec![("value", value.into())])
    }

    /// `id = value`
    pub fn assign(&self, id: &str, value: Node) -> Result<Node> {
        self.assign_to(self.store(id)?, value)
    }

    /// `target = value`
    pub fn assign_to(&self, target: Node, value: Node) -> Result<Node> {
        self.node(
            "Assign",
            vec![
                ("targets", Value::from(vec![target])),
                ("value", Value::from(value)),
            ],
        )
    }

    /// `func(args...)` where `func` is a plain name.
    pub fn call(&self, func: &str, args: Vec<Node>) -> Result<Node> {
        self.node(
            "Call",
            vec![
                ("func", Value::from(self.load(func)?)),
                ("args", Value::from(args)),
            ],
        )
    }

    pub fn while_true(&self, body: Vec<Value>) -> Result<Node> {
        self.node(
            "While",
            vec![
                ("test", Value::from(self.constant(true)?)),
                ("body", Value::List(body)),
            ],
        )
    }

    pub fn if_stmt(&self, test: Node, body: Vec<Value>, orelse: Vec<Value>) -> Result<Node> {
        self.node(
            "If",
            vec![
                ("test", Value::from(test)),
                ("body", Value::List(body)),
                ("orelse", Value::List(orelse)),
            ],
        )
    }

    /// `try: body` / `except exception: handler`
    pub fn try_except(&self, body: Vec<Node>, exception: &str, handler: Vec<Node>) -> Result<Node> {
        let handler = self.node(
            "ExceptHandler",
            vec![
                ("type", Value::from(self.load(exception)?)),
                ("body", Value::from(handler)),
            ],
        )?;
        self.node(
            "Try",
            vec![
                ("body", Value::from(body)),
                ("handlers", Value::from(vec![handler])),
            ],
        )
    }

    /// `not operand`
    pub fn not(&self, operand: Node) -> Result<Node> {
        self.node(
            "UnaryOp",
            vec![
                ("op", Value::from(self.leaf("Not")?)),
                ("operand", Value::from(operand)),
            ],
        )
    }

    pub fn raise(&self, exc: Node) -> Result<Node> {
        self.node("Raise", vec![("exc", Value::from(exc))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfront_ast::python;

    #[test]
    fn test_assign_display() {
        let b = TreeBuilder::new(python::registry());
        let node = b.assign("x", b.constant(false).unwrap()).unwrap();
        assert_eq!(
            node.to_string(),
            "Assign(targets=[Name(id='x', ctx=Store())], value=NameConstant(value=False))"
        );
    }

    #[test]
    fn test_unknown_kind() {
        let b = TreeBuilder::new(python::registry());
        assert!(b.leaf("NotAKind").is_err());
    }
}
