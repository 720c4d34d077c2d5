/*
 * visit.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Generic read-only and rewriting tree walks.
 */

//! Tree traversal.
//!
//! Two walks are provided. A [`Visitor`] borrows the tree and only observes
//! it. A [`Transformer`] takes nodes by value and hands back a
//! [`Replacement`], which the walk installs in the parent:
//!
//! - `Value(v)`: replace the field or list element with `v` (returning the
//!   node unchanged is the identity rewrite)
//! - `Splice(vs)`: replace one list element with several
//! - `ExplicitNone`: store an explicit "no value"
//! - `Delete`: unset the field, or drop the list element
//!
//! Implementors dispatch on [`Node::kind`] in `visit` and fall back to
//! `generic_visit` for every other kind. Children are only settled before the
//! parent's override sees them when that override calls `generic_visit`
//! first.

use crate::error::NodeError;
use crate::node::Node;
use crate::schema::Cardinality;
use crate::value::{Slot, Value};

/// A read-only walk over a tree.
pub trait Visitor {
    fn visit(&mut self, node: &Node) {
        self.generic_visit(node);
    }

    fn generic_visit(&mut self, node: &Node) {
        walk_node(self, node);
    }
}

/// Visit every child node of `node` in schema field order.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &Node) {
    for (_, slot) in node.fields() {
        match slot.value() {
            Some(Value::Node(child)) => visitor.visit(child),
            Some(Value::List(items) | Value::Tuple(items)) => {
                for item in items {
                    if let Value::Node(child) = item {
                        visitor.visit(child);
                    }
                }
            }
            _ => {}
        }
    }
}

/// What a [`Transformer`] wants in place of the node it was given.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    Value(Value),
    Splice(Vec<Value>),
    ExplicitNone,
    Delete,
}

impl Replacement {
    pub fn node(node: Node) -> Self {
        Replacement::Value(Value::from(node))
    }

    pub fn nodes(nodes: Vec<Node>) -> Self {
        Replacement::Splice(nodes.into_iter().map(Value::from).collect())
    }

    /// The replacement as a single node, if it is one.
    pub fn into_node(self) -> Option<Node> {
        match self {
            Replacement::Value(value) => value.into_node(),
            _ => None,
        }
    }
}

impl From<Node> for Replacement {
    fn from(node: Node) -> Self {
        Replacement::node(node)
    }
}

/// A rewriting walk over a tree.
///
/// Nodes are moved into `visit`; the caller's copy is gone and only the
/// returned [`Replacement`] survives.
pub trait Transformer {
    type Error: From<NodeError>;

    fn visit(&mut self, node: Node) -> Result<Replacement, Self::Error> {
        self.generic_visit(node)
    }

    fn generic_visit(&mut self, mut node: Node) -> Result<Replacement, Self::Error> {
        transform_children(self, &mut node)?;
        Ok(Replacement::node(node))
    }
}

/// Run `transformer` over every child of `node` and install the results.
///
/// Replacements for singular fields go through validated assignment, so a
/// splice into a singular field is a type error. Rebuilt sequences keep
/// their list or tuple form and their elements are not revalidated, but a
/// `one_or_more` field may not be left empty.
pub fn transform_children<T: Transformer + ?Sized>(
    transformer: &mut T,
    node: &mut Node,
) -> Result<(), T::Error> {
    for index in 0..node.schema().effective_fields().len() {
        match node.take_at(index) {
            Slot::Value(Value::Node(child)) => match transformer.visit(*child)? {
                Replacement::Value(value) => node.set_at(index, value)?,
                Replacement::Splice(values) => node.set_at(index, Value::List(values))?,
                Replacement::ExplicitNone => node.restore_at(index, Slot::ExplicitNone),
                Replacement::Delete => {}
            },
            Slot::Value(Value::List(items)) => {
                let items = transform_items(transformer, items)?;
                check_not_emptied(node, index, &items)?;
                node.restore_at(index, Slot::Value(Value::List(items)));
            }
            Slot::Value(Value::Tuple(items)) => {
                let items = transform_items(transformer, items)?;
                check_not_emptied(node, index, &items)?;
                node.restore_at(index, Slot::Value(Value::Tuple(items)));
            }
            other => node.restore_at(index, other),
        }
    }
    Ok(())
}

fn check_not_emptied(node: &Node, index: usize, items: &[Value]) -> Result<(), NodeError> {
    let field = &node.schema().effective_fields()[index];
    if items.is_empty() && field.cardinality == Cardinality::OneOrMore {
        return Err(NodeError::WrongType {
            kind: node.kind().to_string(),
            field: field.name.clone(),
            expected: format!("at least one {}", field.element_type.name()),
            got: "an empty sequence".to_string(),
            index: None,
        });
    }
    Ok(())
}

fn transform_items<T: Transformer + ?Sized>(
    transformer: &mut T,
    items: Vec<Value>,
) -> Result<Vec<Value>, T::Error> {
    let mut rebuilt = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Node(child) => match transformer.visit(*child)? {
                Replacement::Value(value) => rebuilt.push(value),
                Replacement::Splice(values) => rebuilt.extend(values),
                Replacement::ExplicitNone => rebuilt.push(Value::None),
                Replacement::Delete => {}
            },
            other => rebuilt.push(other),
        }
    }
    Ok(rebuilt)
}
