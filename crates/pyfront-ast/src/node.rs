/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The generic, schema-tagged tree node.
 */

//! The generic tree node.
//!
//! Every syntax node is a [`Node`]: a shared [`NodeSchema`] plus one [`Slot`]
//! per effective field. Values are validated against the field's cardinality
//! and element type when they are assigned, never when they are read, so a
//! node can only ever hold well-typed values. Completeness is a separate,
//! explicit step: [`Node::finalize`] fills defaults for unset optional and
//! repeated fields and reports the mandatory fields that are still missing.

use std::fmt;
use std::sync::Arc;

use crate::error::{NodeError, Result};
use crate::scalar;
use crate::schema::{Cardinality, ElementType, FieldSpec, NodeSchema};
use crate::value::{Slot, Value};

#[derive(Clone)]
pub struct Node {
    schema: Arc<NodeSchema>,
    slots: Vec<Slot>,
}

impl Node {
    /// A node of the given kind with every field unset.
    pub fn empty(schema: &Arc<NodeSchema>) -> Self {
        Self {
            schema: Arc::clone(schema),
            slots: vec![Slot::Unset; schema.effective_fields().len()],
        }
    }

    /// Construct a node from positional and keyword values.
    ///
    /// Positional values must be absent or cover every effective field, in
    /// schema order. Both calling conventions go through [`Node::set`];
    /// keywords are applied after positional values.
    pub fn new<K: AsRef<str>>(
        schema: &Arc<NodeSchema>,
        positional: Vec<Value>,
        keywords: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self> {
        let mut node = Self::empty(schema);
        let expected = node.slots.len();
        if !positional.is_empty() && positional.len() != expected {
            return Err(NodeError::Arity {
                kind: schema.kind().to_string(),
                expected,
                given: positional.len(),
            });
        }
        for (index, value) in positional.into_iter().enumerate() {
            node.set_at(index, value)?;
        }
        for (name, value) in keywords {
            node.set(name.as_ref(), value)?;
        }
        Ok(node)
    }

    /// Construct a node from positional values only.
    pub fn positional(schema: &Arc<NodeSchema>, values: Vec<Value>) -> Result<Self> {
        Self::new(schema, values, Vec::<(&str, Value)>::new())
    }

    /// Construct a node from keyword values only.
    pub fn with_fields<K: AsRef<str>>(
        schema: &Arc<NodeSchema>,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self> {
        Self::new(schema, Vec::new(), fields)
    }

    pub fn kind(&self) -> &str {
        self.schema.kind()
    }

    pub fn schema(&self) -> &Arc<NodeSchema> {
        &self.schema
    }

    /// True if this node is of `kind` or of a kind inheriting from it.
    pub fn is_a(&self, kind: &str) -> bool {
        self.schema.is_subkind_of(kind)
    }

    /// Assign a field after validating it against its spec.
    ///
    /// `Value::None` on an optional field records an explicit "no value".
    /// Collections are stored as given; `finalize` normalizes them later.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(name)?;
        self.set_at(index, value.into())
    }

    pub(crate) fn set_at(&mut self, index: usize, value: Value) -> Result<()> {
        let field = &self.schema.effective_fields()[index];
        let slot = validate(self.schema.kind(), field, value)?;
        self.slots[index] = slot;
        Ok(())
    }

    /// The stored value of a field. Unset, explicitly-none and undeclared
    /// fields all read as `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slot(name).and_then(Slot::value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let index = self.schema.field_index(name)?;
        match &mut self.slots[index] {
            Slot::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.schema.field_index(name).map(|index| &self.slots[index])
    }

    /// True if the field holds a value or an explicit "no value".
    pub fn is_set(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| !slot.is_unset())
    }

    /// Return a field to the unset state.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name)?;
        self.slots[index] = Slot::Unset;
        Ok(())
    }

    /// Move a field's value out, leaving the field unset.
    pub fn take(&mut self, name: &str) -> Result<Option<Value>> {
        let index = self.index_of(name)?;
        Ok(match self.take_at(index) {
            Slot::Value(value) => Some(value),
            _ => None,
        })
    }

    pub(crate) fn take_at(&mut self, index: usize) -> Slot {
        std::mem::take(&mut self.slots[index])
    }

    /// Put a slot back without validation. Only for slots that came out of
    /// this node through `take_at`, possibly with their contents rewritten.
    pub(crate) fn restore_at(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot;
    }

    /// Fields paired with their slots, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, &Slot)> {
        self.schema.effective_fields().iter().zip(self.slots.iter())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.schema
            .field_index(name)
            .ok_or_else(|| NodeError::Field {
                kind: self.kind().to_string(),
                field: name.to_string(),
            })
    }

    /// Fill defaults and check completeness, recursively.
    ///
    /// Fields are visited in schema order: unset optional fields become
    /// explicitly none, unset zero-or-more fields become empty tuples, set
    /// collections become tuples and their node elements are finalized, and
    /// set node values are finalized. An unset field with an unknown
    /// cardinality fails immediately. Unset required and one-or-more fields
    /// are reported together once the loop is done.
    ///
    /// This is not transactional: defaults already filled and children
    /// already finalized stay that way when an error is returned.
    pub fn finalize(&mut self) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let mut missing = Vec::new();

        for (field, slot) in schema.effective_fields().iter().zip(self.slots.iter_mut()) {
            match slot {
                Slot::Unset => match &field.cardinality {
                    Cardinality::Required | Cardinality::OneOrMore => {
                        missing.push(field.name.clone());
                    }
                    Cardinality::Optional => *slot = Slot::ExplicitNone,
                    Cardinality::ZeroOrMore => *slot = Slot::Value(Value::Tuple(Vec::new())),
                    Cardinality::Unknown(tag) => {
                        return Err(NodeError::UnknownModifier {
                            kind: schema.kind().to_string(),
                            field: field.name.clone(),
                            modifier: tag.clone(),
                        });
                    }
                },
                Slot::ExplicitNone => {}
                Slot::Value(value) if field.cardinality.is_sequence() => {
                    if let Value::List(items) = value {
                        *value = Value::Tuple(std::mem::take(items));
                    }
                    if let Value::Tuple(items) = value {
                        for item in items.iter_mut() {
                            if let Value::Node(child) = item {
                                child.finalize()?;
                            }
                        }
                    }
                }
                Slot::Value(value) => {
                    if let Value::Node(child) = value {
                        child.finalize()?;
                    }
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(NodeError::Incomplete {
                kind: schema.kind().to_string(),
                missing,
            })
        }
    }
}

/// Check a value against a field spec and produce the slot to store.
fn validate(kind: &str, field: &FieldSpec, value: Value) -> Result<Slot> {
    match &field.cardinality {
        Cardinality::Required => {
            check_element(kind, field, &value, None)?;
        }
        Cardinality::Optional => {
            if value.is_none() {
                return Ok(Slot::ExplicitNone);
            }
            check_element(kind, field, &value, None)?;
        }
        Cardinality::ZeroOrMore | Cardinality::OneOrMore => {
            let Some(items) = value.as_items() else {
                return Err(NodeError::WrongType {
                    kind: kind.to_string(),
                    field: field.name.clone(),
                    expected: format!("a sequence of {}", field.element_type.name()),
                    got: value.type_name().to_string(),
                    index: None,
                });
            };
            if items.is_empty() && field.cardinality == Cardinality::OneOrMore {
                return Err(NodeError::WrongType {
                    kind: kind.to_string(),
                    field: field.name.clone(),
                    expected: format!("at least one {}", field.element_type.name()),
                    got: "an empty sequence".to_string(),
                    index: None,
                });
            }
            for (index, item) in items.iter().enumerate() {
                check_element(kind, field, item, Some(index))?;
            }
        }
        // Deferred: finalize reports the bad tag if the field is ever unset.
        Cardinality::Unknown(_) => {}
    }
    Ok(Slot::Value(value))
}

fn check_element(kind: &str, field: &FieldSpec, value: &Value, index: Option<usize>) -> Result<()> {
    let ok = match &field.element_type {
        ElementType::Identifier => {
            if let Value::Str(s) = value {
                if !scalar::is_identifier(s) {
                    return Err(NodeError::WrongAttributeValue {
                        kind: kind.to_string(),
                        field: field.name.clone(),
                        expected: "identifier".to_string(),
                        value: value.to_string(),
                    });
                }
            }
            scalar::is_identifier_candidate(value)
        }
        ElementType::String => matches!(value, Value::Str(_)),
        ElementType::Bytes => matches!(value, Value::Bytes(_)),
        ElementType::Int => matches!(value, Value::Int(_)),
        ElementType::Float => matches!(value, Value::Float(_)),
        ElementType::Complex => matches!(value, Value::Complex(_)),
        ElementType::Bool => matches!(value, Value::Bool(_)),
        ElementType::Singleton => scalar::is_singleton(value),
        ElementType::Constant => scalar::is_constant(value),
        ElementType::Object => true,
        ElementType::Kind(expected) => value.as_node().is_some_and(|node| node.is_a(expected)),
    };
    if ok {
        Ok(())
    } else {
        Err(NodeError::WrongType {
            kind: kind.to_string(),
            field: field.name.clone(),
            expected: field.element_type.name().to_string(),
            got: value.type_name().to_string(),
            index,
        })
    }
}

/// Nodes are equal only when they share the same schema and every slot
/// compares equal. Two kinds with identical field lists never compare equal.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) && self.slots == other.slots
    }
}

/// `Kind(field=value, ...)`, listing set and explicitly-none fields in
/// schema order.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind())?;
        let mut first = true;
        for (field, slot) in self.fields() {
            let value = match slot {
                Slot::Unset => continue,
                Slot::ExplicitNone => &Value::None,
                Slot::Value(value) => value,
            };
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}={}", field.name, value)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_schema() -> Arc<NodeSchema> {
        NodeSchema::root("BasicNode", vec![FieldSpec::from_tags("n", "int", "required")]).unwrap()
    }

    fn wide_schema() -> Arc<NodeSchema> {
        NodeSchema::root(
            "Wide",
            vec![
                FieldSpec::from_tags("f1", "int", "required"),
                FieldSpec::from_tags("f2", "int", "optional"),
                FieldSpec::from_tags("f3", "int", "zero_or_more"),
                FieldSpec::from_tags("f4", "int", "one_or_more"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_basic_node_equality() {
        let schema = basic_schema();
        let mut a = Node::positional(&schema, vec![Value::Int(1)]).unwrap();
        let mut b = Node::positional(&schema, vec![Value::Int(1)]).unwrap();
        a.finalize().unwrap();
        b.finalize().unwrap();
        assert_eq!(a, b);

        let zero = Node::positional(&schema, vec![Value::Int(0)]).unwrap();
        let one = Node::positional(&schema, vec![Value::Int(1)]).unwrap();
        assert_ne!(zero, one);
    }

    #[test]
    fn test_different_kinds_never_equal() {
        let a = basic_schema();
        let b = NodeSchema::root("OtherNode", vec![FieldSpec::from_tags("n", "int", "required")])
            .unwrap();
        let mut x = Node::positional(&a, vec![Value::Int(1)]).unwrap();
        let mut y = Node::positional(&b, vec![Value::Int(1)]).unwrap();
        assert_ne!(x, y);
        x.finalize().unwrap();
        y.finalize().unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn test_arity_error_names_both_counts() {
        let schema = wide_schema();
        let err = Node::positional(&schema, vec![Value::Int(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Wide constructor takes either 0 or 4 positional arguments, got 1"
        );
    }

    #[test]
    fn test_positional_and_keyword_validate_alike() {
        let schema = basic_schema();
        let positional = Node::positional(&schema, vec![Value::from("x")]).unwrap_err();
        let keyword = Node::with_fields(&schema, [("n", Value::from("x"))]).unwrap_err();
        assert_eq!(positional, keyword);
    }

    #[test]
    fn test_unknown_field() {
        let mut node = Node::empty(&basic_schema());
        let err = node.set("nope", 1).unwrap_err();
        assert_eq!(
            err,
            NodeError::Field {
                kind: "BasicNode".to_string(),
                field: "nope".to_string()
            }
        );
        assert!(err.to_string().contains("nope"));
        assert!(err.to_string().contains("BasicNode"));
    }

    #[test]
    fn test_optional_accepts_none_as_explicit() {
        let mut node = Node::empty(&wide_schema());
        node.set("f2", Value::None).unwrap();
        assert_eq!(node.slot("f2"), Some(&Slot::ExplicitNone));
        assert!(node.is_set("f2"));
        assert!(node.get("f2").is_none());
    }

    #[test]
    fn test_required_rejects_none() {
        let mut node = Node::empty(&wide_schema());
        assert!(matches!(
            node.set("f1", Value::None),
            Err(NodeError::WrongType { .. })
        ));
    }

    #[test]
    fn test_sequence_validation() {
        let mut node = Node::empty(&wide_schema());
        assert!(node.set("f3", Value::Int(1)).is_err());
        assert!(node.set("f4", Value::List(vec![])).is_err());

        let err = node
            .set("f3", Value::List(vec![Value::Int(1), Value::from("x")]))
            .unwrap_err();
        assert!(matches!(err, NodeError::WrongType { index: Some(1), .. }));

        node.set("f3", Value::List(vec![Value::Int(1)])).unwrap();
        // Stored verbatim until finalize.
        assert_eq!(node.get("f3"), Some(&Value::List(vec![Value::Int(1)])));
    }

    #[test]
    fn test_identifier_field() {
        let schema =
            NodeSchema::root("Named", vec![FieldSpec::from_tags("id", "identifier", "required")])
                .unwrap();
        let mut node = Node::empty(&schema);
        node.set("id", "valid_name").unwrap();
        let err = node.set("id", "invalid name").unwrap_err();
        assert!(matches!(err, NodeError::WrongAttributeValue { .. }));
        let err = node.set("id", 3).unwrap_err();
        assert!(matches!(err, NodeError::WrongType { .. }));
    }

    #[test]
    fn test_finalize_fills_defaults() {
        let mut node = Node::with_fields(
            &wide_schema(),
            [("f1", Value::Int(1)), ("f4", Value::List(vec![Value::Int(2)]))],
        )
        .unwrap();
        node.finalize().unwrap();
        assert_eq!(node.get("f1"), Some(&Value::Int(1)));
        assert_eq!(node.slot("f2"), Some(&Slot::ExplicitNone));
        assert_eq!(node.get("f3"), Some(&Value::Tuple(vec![])));
        assert_eq!(node.get("f4"), Some(&Value::Tuple(vec![Value::Int(2)])));
    }

    #[test]
    fn test_finalize_names_only_mandatory_fields() {
        let mut node = Node::empty(&wide_schema());
        let err = node.finalize().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("f1"));
        assert!(message.contains("f4"));
        assert!(!message.contains("f2"));
        assert!(!message.contains("f3"));
        // Defaults were still applied.
        assert_eq!(node.slot("f2"), Some(&Slot::ExplicitNone));
    }

    #[test]
    fn test_finalize_unknown_modifier_only_when_unset() {
        let schema =
            NodeSchema::root("Odd", vec![FieldSpec::from_tags("x", "int", "sometimes")]).unwrap();

        let mut set = Node::with_fields(&schema, [("x", Value::Int(1))]).unwrap();
        set.finalize().unwrap();

        let mut unset = Node::empty(&schema);
        assert_eq!(
            unset.finalize().unwrap_err(),
            NodeError::UnknownModifier {
                kind: "Odd".to_string(),
                field: "x".to_string(),
                modifier: "sometimes".to_string(),
            }
        );
    }

    #[test]
    fn test_finalize_recurses_even_when_parent_fails() {
        let child_schema = wide_schema();
        let parent_schema = NodeSchema::root(
            "Parent",
            vec![
                FieldSpec::from_tags("child", "Wide", "required"),
                FieldSpec::from_tags("other", "int", "required"),
            ],
        )
        .unwrap();

        let child = Node::with_fields(
            &child_schema,
            [("f1", Value::Int(1)), ("f4", Value::List(vec![Value::Int(1)]))],
        )
        .unwrap();
        let mut parent = Node::with_fields(&parent_schema, [("child", Value::from(child))]).unwrap();

        let err = parent.finalize().unwrap_err();
        assert!(matches!(err, NodeError::Incomplete { ref missing, .. } if missing == &["other"]));
        let child = parent.get("child").and_then(Value::as_node).unwrap();
        assert_eq!(child.get("f3"), Some(&Value::Tuple(vec![])));
    }

    #[test]
    fn test_display() {
        let mut node = Node::empty(&wide_schema());
        assert_eq!(node.to_string(), "Wide()");
        node.set("f4", Value::List(vec![Value::Int(1)])).unwrap();
        node.set("f1", 7).unwrap();
        assert_eq!(node.to_string(), "Wide(f1=7, f4=[1])");
        node.set("f2", Value::None).unwrap();
        assert_eq!(node.to_string(), "Wide(f1=7, f2=None, f4=[1])");
    }

    #[test]
    fn test_remove_and_take() {
        let mut node = Node::with_fields(&basic_schema(), [("n", Value::Int(4))]).unwrap();
        assert_eq!(node.take("n").unwrap(), Some(Value::Int(4)));
        assert!(!node.is_set("n"));
        node.set("n", 5).unwrap();
        node.remove("n").unwrap();
        assert_eq!(node.to_string(), "BasicNode()");
        assert!(node.remove("zzz").is_err());
    }
}
