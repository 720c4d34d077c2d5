/*
 * schema.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Node schemas: ordered field lists with single inheritance.
 */

//! Node schemas.
//!
//! A [`NodeSchema`] describes one node kind as an ordered list of
//! [`FieldSpec`]s, optionally inheriting the fields of a parent kind. The
//! effective field list (parent fields first, then the kind's own fields) is
//! flattened once when the schema is built and drives positional
//! construction, `finalize`, display and traversal order.
//!
//! Schemas are immutable once built and shared through [`Arc`] by every node
//! of that kind. A [`SchemaRegistry`] holds the schemas of one language,
//! loaded from a [`SchemaTable`] produced by the grammar compiler.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::SchemaError;

/// How many values a field holds.
///
/// Tags outside the closed set are kept as [`Cardinality::Unknown`] and only
/// rejected when `finalize` reaches an unset field carrying one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Required,
    Optional,
    ZeroOrMore,
    OneOrMore,
    Unknown(String),
}

impl Cardinality {
    /// Parse a schema-table cardinality tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "required" => Cardinality::Required,
            "optional" => Cardinality::Optional,
            "zero_or_more" => Cardinality::ZeroOrMore,
            "one_or_more" => Cardinality::OneOrMore,
            other => Cardinality::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Cardinality::Required => "required",
            Cardinality::Optional => "optional",
            Cardinality::ZeroOrMore => "zero_or_more",
            Cardinality::OneOrMore => "one_or_more",
            Cardinality::Unknown(tag) => tag,
        }
    }

    /// True for the two repeated cardinalities.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Cardinality::ZeroOrMore | Cardinality::OneOrMore)
    }

    /// True for cardinalities that `finalize` reports when unset.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Cardinality::Required | Cardinality::OneOrMore)
    }

    fn suffix(&self) -> &str {
        match self {
            Cardinality::Required => "",
            Cardinality::Optional => "?",
            Cardinality::ZeroOrMore => "*",
            Cardinality::OneOrMore => "+",
            Cardinality::Unknown(_) => "!",
        }
    }
}

/// The type of a field's element(s).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// A string matching the identifier pattern.
    Identifier,
    String,
    Bytes,
    Int,
    Float,
    Complex,
    Bool,
    /// `True`, `False` or `None`.
    Singleton,
    /// Any primitive literal value.
    Constant,
    /// Anything at all.
    Object,
    /// A node of the named kind or of any kind inheriting from it.
    Kind(String),
}

impl ElementType {
    /// Parse a schema-table element type name.
    pub fn parse(name: &str) -> Self {
        match name {
            "identifier" => ElementType::Identifier,
            "string" => ElementType::String,
            "bytes" => ElementType::Bytes,
            "int" => ElementType::Int,
            "float" => ElementType::Float,
            "complex" => ElementType::Complex,
            "bool" => ElementType::Bool,
            "singleton" => ElementType::Singleton,
            "constant" => ElementType::Constant,
            "object" => ElementType::Object,
            kind => ElementType::Kind(kind.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ElementType::Identifier => "identifier",
            ElementType::String => "string",
            ElementType::Bytes => "bytes",
            ElementType::Int => "int",
            ElementType::Float => "float",
            ElementType::Complex => "complex",
            ElementType::Bool => "bool",
            ElementType::Singleton => "singleton",
            ElementType::Constant => "constant",
            ElementType::Object => "object",
            ElementType::Kind(kind) => kind,
        }
    }
}

/// One field of a node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub element_type: ElementType,
    pub cardinality: Cardinality,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        element_type: ElementType,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            element_type,
            cardinality,
        }
    }

    /// Build a field from the three strings used by schema tables.
    pub fn from_tags(name: &str, element_type: &str, cardinality: &str) -> Self {
        Self::new(
            name,
            ElementType::parse(element_type),
            Cardinality::from_tag(cardinality),
        )
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.element_type.name(),
            self.cardinality.suffix(),
            self.name
        )
    }
}

/// The schema of one node kind.
#[derive(Debug)]
pub struct NodeSchema {
    kind: String,
    parent: Option<Arc<NodeSchema>>,
    /// Effective fields: inherited fields first, then own fields.
    fields: Vec<FieldSpec>,
    /// Index of the first own field in `fields`.
    own_start: usize,
}

impl NodeSchema {
    /// Build a schema with no parent.
    pub fn root(
        kind: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Result<Arc<NodeSchema>, SchemaError> {
        Self::build(kind.into(), None, fields)
    }

    /// Build a schema inheriting every field of `parent`.
    pub fn derived(
        kind: impl Into<String>,
        parent: &Arc<NodeSchema>,
        fields: Vec<FieldSpec>,
    ) -> Result<Arc<NodeSchema>, SchemaError> {
        Self::build(kind.into(), Some(Arc::clone(parent)), fields)
    }

    fn build(
        kind: String,
        parent: Option<Arc<NodeSchema>>,
        own: Vec<FieldSpec>,
    ) -> Result<Arc<NodeSchema>, SchemaError> {
        let mut fields = parent
            .as_ref()
            .map(|p| p.fields.clone())
            .unwrap_or_default();
        let own_start = fields.len();

        for field in own {
            if let Some(existing) = fields.iter().position(|f| f.name == field.name) {
                let declared_by = match &parent {
                    Some(p) if existing < own_start => p.declaring_kind(existing).to_string(),
                    _ => kind.clone(),
                };
                return Err(SchemaError::DuplicateField {
                    kind,
                    field: field.name,
                    declared_by,
                });
            }
            fields.push(field);
        }

        Ok(Arc::new(NodeSchema {
            kind,
            parent,
            fields,
            own_start,
        }))
    }

    /// The kind in this schema's chain that declared the field at `index`.
    fn declaring_kind(&self, index: usize) -> &str {
        match &self.parent {
            Some(parent) if index < self.own_start => parent.declaring_kind(index),
            _ => &self.kind,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn parent(&self) -> Option<&Arc<NodeSchema>> {
        self.parent.as_ref()
    }

    /// Fields declared by this kind itself.
    pub fn own_fields(&self) -> &[FieldSpec] {
        &self.fields[self.own_start..]
    }

    /// All fields, parent fields first, in declaration order at each level.
    pub fn effective_fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field, searching this kind's own fields and then the
    /// inheritance chain outward.
    pub fn resolve_field(&self, name: &str) -> Option<&FieldSpec> {
        self.own_fields()
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.parent.as_ref()?.resolve_field(name))
    }

    /// Position of a field in the effective field list.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// True if this kind is `kind` or inherits from it.
    pub fn is_subkind_of(&self, kind: &str) -> bool {
        let mut current = Some(self);
        while let Some(schema) = current {
            if schema.kind == kind {
                return true;
            }
            current = schema.parent.as_deref();
        }
        false
    }
}

impl fmt::Display for NodeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(parent) = &self.parent {
            write!(f, " <: {}", parent.kind)?;
        }
        if !self.fields.is_empty() {
            let fields: Vec<String> = self.fields.iter().map(|f| f.to_string()).collect();
            write!(f, " ({})", fields.join(", "))?;
        }
        Ok(())
    }
}

/// A schema table as emitted by the grammar compiler.
///
/// Records are ordered and every parent must appear before its children:
///
/// ```json
/// { "kinds": [
///     { "kind": "stmt" },
///     { "kind": "Return", "parent": "stmt", "fields": [["value", "expr", "optional"]] }
/// ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaTable {
    pub kinds: Vec<KindRecord>,
}

impl SchemaTable {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KindRecord {
    pub kind: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
}

/// A `[name, element_type, cardinality]` triple.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct FieldRecord {
    pub name: String,
    pub element_type: String,
    pub cardinality: String,
}

impl From<(String, String, String)> for FieldRecord {
    fn from((name, element_type, cardinality): (String, String, String)) -> Self {
        Self {
            name,
            element_type,
            cardinality,
        }
    }
}

/// All node schemas of one language, keyed by kind name in table order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Arc<NodeSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every schema of a table.
    ///
    /// Fails on duplicate kinds, parents that have not been declared yet, and
    /// duplicate field names along an inheritance chain. Unknown cardinality
    /// tags are accepted here.
    pub fn from_table(table: &SchemaTable) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for record in &table.kinds {
            let fields = record
                .fields
                .iter()
                .map(|f| FieldSpec::from_tags(&f.name, &f.element_type, &f.cardinality))
                .collect();
            let schema = match &record.parent {
                Some(parent) => {
                    let parent_schema = registry.schemas.get(parent).ok_or_else(|| {
                        SchemaError::UnknownParent {
                            kind: record.kind.clone(),
                            parent: parent.clone(),
                        }
                    })?;
                    NodeSchema::derived(&record.kind, parent_schema, fields)?
                }
                None => NodeSchema::root(&record.kind, fields)?,
            };
            registry.insert(schema)?;
        }
        tracing::debug!(kinds = registry.len(), "Loaded schema table");
        Ok(registry)
    }

    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Self::from_table(&SchemaTable::from_json(text)?)
    }

    pub fn insert(&mut self, schema: Arc<NodeSchema>) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.kind()) {
            return Err(SchemaError::DuplicateKind(schema.kind().to_string()));
        }
        self.schemas.insert(schema.kind().to_string(), schema);
        Ok(())
    }

    pub fn get(&self, kind: &str) -> Result<&Arc<NodeSchema>, SchemaError> {
        self.schemas
            .get(kind)
            .ok_or_else(|| SchemaError::UnknownKind(kind.to_string()))
    }

    pub fn lookup(&self, kind: &str) -> Option<&Arc<NodeSchema>> {
        self.schemas.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.schemas.contains_key(kind)
    }

    /// Kind names in table order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<NodeSchema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: &str, card: &str) -> FieldSpec {
        FieldSpec::from_tags(name, ty, card)
    }

    #[test]
    fn test_effective_fields_parent_first() {
        let base = NodeSchema::root("Base", vec![field("a", "int", "required")]).unwrap();
        let mid = NodeSchema::derived("Mid", &base, vec![field("b", "int", "optional")]).unwrap();
        let leaf = NodeSchema::derived("Leaf", &mid, vec![field("c", "int", "zero_or_more")])
            .unwrap();

        let names: Vec<&str> = leaf
            .effective_fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(leaf.own_fields().len(), 1);
        assert_eq!(leaf.field_index("b"), Some(1));
    }

    #[test]
    fn test_resolve_field_walks_chain() {
        let base = NodeSchema::root("Base", vec![field("a", "int", "required")]).unwrap();
        let leaf = NodeSchema::derived("Leaf", &base, vec![field("b", "string", "required")])
            .unwrap();

        assert_eq!(leaf.resolve_field("a").unwrap().element_type, ElementType::Int);
        assert_eq!(
            leaf.resolve_field("b").unwrap().element_type,
            ElementType::String
        );
        assert!(leaf.resolve_field("missing").is_none());
    }

    #[test]
    fn test_duplicate_field_across_chain_fails() {
        let base = NodeSchema::root("Base", vec![field("a", "int", "required")]).unwrap();
        let mid = NodeSchema::derived("Mid", &base, vec![field("b", "int", "required")]).unwrap();
        let err = NodeSchema::derived("Leaf", &mid, vec![field("a", "int", "optional")])
            .unwrap_err();

        match err {
            SchemaError::DuplicateField {
                kind,
                field,
                declared_by,
            } => {
                assert_eq!(kind, "Leaf");
                assert_eq!(field, "a");
                assert_eq!(declared_by, "Base");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_own_field_fails() {
        let err = NodeSchema::root(
            "Twice",
            vec![field("x", "int", "required"), field("x", "int", "required")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_unknown_cardinality_is_accepted_at_build_time() {
        let schema = NodeSchema::root("Odd", vec![field("x", "int", "sometimes")]).unwrap();
        assert_eq!(
            schema.effective_fields()[0].cardinality,
            Cardinality::Unknown("sometimes".to_string())
        );
    }

    #[test]
    fn test_is_subkind_of() {
        let stmt = NodeSchema::root("stmt", vec![]).unwrap();
        let pass = NodeSchema::derived("Pass", &stmt, vec![]).unwrap();
        assert!(pass.is_subkind_of("Pass"));
        assert!(pass.is_subkind_of("stmt"));
        assert!(!stmt.is_subkind_of("Pass"));
        assert!(!pass.is_subkind_of("expr"));
    }

    #[test]
    fn test_registry_from_json() {
        let registry = SchemaRegistry::from_json(
            r#"{ "kinds": [
                { "kind": "stmt" },
                { "kind": "Return", "parent": "stmt", "fields": [["value", "expr", "optional"]] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["stmt", "Return"]);
        let ret = registry.get("Return").unwrap();
        assert_eq!(ret.parent().unwrap().kind(), "stmt");
        assert_eq!(ret.to_string(), "Return <: stmt (expr? value)");
    }

    #[test]
    fn test_registry_rejects_forward_parent() {
        let err = SchemaRegistry::from_json(
            r#"{ "kinds": [
                { "kind": "Return", "parent": "stmt" },
                { "kind": "stmt" }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownParent { .. }));
    }

    #[test]
    fn test_registry_rejects_duplicate_kind() {
        let err = SchemaRegistry::from_json(r#"{ "kinds": [{ "kind": "a" }, { "kind": "a" }] }"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKind(kind) if kind == "a"));
    }

    #[test]
    fn test_registry_unknown_kind() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            registry.get("Nope"),
            Err(SchemaError::UnknownKind(kind)) if kind == "Nope"
        ));
    }
}
