/*
 * translator.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Translation of native parse trees into schema-validated nodes.
 */

//! Source ingestion.
//!
//! [`Translator`] walks a [`NativeNode`] tree and builds the matching
//! pyfront [`Node`] for every native node. Most kinds map one-to-one through
//! the schema registry; a few native shapes get a dedicated handler.
//!
//! Problems are collected rather than raised. A native node that cannot be
//! translated is logged with its line and leaves its parent's field unset,
//! so a single pass reports every problem in the input. Translated nodes are
//! not finalized.

use std::collections::HashMap;

use pyfront_ast::{Node, SchemaRegistry, Value, python};

use crate::error::{Result, TranslationError};
use crate::error_log::TranslationErrorLog;
use crate::future::{FUTURE_MODULE, is_known_feature};
use crate::native::{NativeNode, NativeValue, read_json};

/// A conversion for one native kind. `None` means the failure was logged.
pub type Handler = for<'t, 'r> fn(&'t mut Translator<'r>, &NativeNode) -> Option<Node>;

pub struct Translator<'r> {
    registry: &'r SchemaRegistry,
    handlers: HashMap<&'static str, Handler>,
    log: TranslationErrorLog,
}

impl<'r> Translator<'r> {
    /// A translator for `registry` with the built-in Python handlers.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        let mut translator = Self {
            registry,
            handlers: HashMap::new(),
            log: TranslationErrorLog::new(),
        };
        translator.register("Name", convert_name);
        translator.register("Num", convert_num);
        translator.register("Constant", convert_constant);
        translator.register("ImportFrom", convert_import_from);
        translator.register("Index", convert_index);
        translator
    }

    /// Register (or replace) the handler for a native kind.
    pub fn register(&mut self, kind: &'static str, handler: Handler) {
        self.handlers.insert(kind, handler);
    }

    /// Translate a whole tree.
    ///
    /// Fails with every message logged during the walk, in order.
    pub fn convert(&mut self, tree: &NativeNode) -> Result<Node> {
        self.log = TranslationErrorLog::new();
        tracing::debug!(kind = %tree.kind, "Translating native tree");

        let node = self.convert_node(tree);
        std::mem::take(&mut self.log).into_result()?;
        node.ok_or_else(|| {
            TranslationError::new(Vec::new(), Some(format!("{} produced no node", tree.kind)))
        })
    }

    fn convert_node(&mut self, native: &NativeNode) -> Option<Node> {
        if let Some(handler) = self.handlers.get(native.kind.as_str()).copied() {
            return handler(self, native);
        }
        self.convert_generic(native)
    }

    /// Convert every field, then build the node of the same kind.
    fn convert_generic(&mut self, native: &NativeNode) -> Option<Node> {
        let mut fields: Vec<(&str, Value)> = Vec::with_capacity(native.fields.len());
        for (name, value) in &native.fields {
            if let Some(value) = self.convert_value(value, native.line) {
                fields.push((name.as_str(), value));
            }
        }
        self.build(&native.kind, fields, native.line)
    }

    /// Build a node, logging unknown kinds and construction errors.
    fn build(&mut self, kind: &str, fields: Vec<(&str, Value)>, line: Option<u32>) -> Option<Node> {
        let registry = self.registry;
        let Some(schema) = registry.lookup(kind) else {
            self.log.error_at(format!("unsupported syntax: {kind}"), line);
            return None;
        };

        // Fields this grammar does not model are tolerated while empty.
        let fields = fields.into_iter().filter(|(name, value)| {
            schema.resolve_field(name).is_some() || !is_empty_value(value)
        });

        match Node::new(schema, Vec::new(), fields) {
            Ok(node) => Some(node),
            Err(err) => {
                self.log.error_at(err.to_string(), line);
                None
            }
        }
    }

    /// Convert one field value. `None` means a failure was logged.
    fn convert_value(&mut self, value: &NativeValue, line: Option<u32>) -> Option<Value> {
        match value {
            NativeValue::Node(node) => self.convert_node(node).map(Value::from),
            NativeValue::List(items) => {
                let mut converted = Vec::with_capacity(items.len());
                let mut failed = false;
                for item in items {
                    match self.convert_value(item, line) {
                        Some(value) => converted.push(value),
                        None => failed = true,
                    }
                }
                (!failed).then_some(Value::List(converted))
            }
            NativeValue::Str(s) => Some(Value::Str(s.clone())),
            NativeValue::Bytes(b) => Some(Value::Bytes(b.clone())),
            NativeValue::Int(n) => Some(Value::Int(*n)),
            NativeValue::BigInt(text) => {
                self.log.error_at(out_of_range(text), line);
                None
            }
            NativeValue::Float(f) => Some(Value::Float(*f)),
            NativeValue::Complex(c) => Some(Value::Complex(*c)),
            NativeValue::Bool(b) => Some(Value::Bool(*b)),
            NativeValue::None => Some(Value::None),
            NativeValue::Opaque(text) => {
                self.log.error_at(format!("unsupported value {text}"), line);
                None
            }
        }
    }
}

fn out_of_range(text: &str) -> String {
    format!("integer literal {text} does not fit in 64 bits")
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::None => true,
        Value::List(items) | Value::Tuple(items) => items.is_empty(),
        _ => false,
    }
}

/// Translate a native tree given as JSON with the Python registry.
///
/// Unreadable input fails immediately with a single fixed message.
pub fn translate_json(text: &str) -> Result<Node> {
    let tree = read_json(text).map_err(|err| TranslationError::malformed(err.to_string()))?;
    Translator::new(python::registry()).convert(&tree)
}

/// `True`, `False` and `None` as names become `NameConstant`.
fn convert_name(t: &mut Translator<'_>, native: &NativeNode) -> Option<Node> {
    let singleton = match native.get("id") {
        Some(NativeValue::Str(id)) => match id.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::None),
            _ => None,
        },
        _ => None,
    };
    match singleton {
        Some(value) => t.build("NameConstant", vec![("value", value)], native.line),
        None => t.convert_generic(native),
    }
}

/// Numeric literals, split by the runtime type of `n`.
fn convert_num(t: &mut Translator<'_>, native: &NativeNode) -> Option<Node> {
    let (kind, value) = match native.get("n") {
        Some(NativeValue::Int(n)) => ("IntLiteral", Value::Int(*n)),
        Some(NativeValue::Float(f)) => ("FloatLiteral", Value::Float(*f)),
        Some(NativeValue::Complex(c)) => ("ComplexLiteral", Value::Complex(*c)),
        Some(NativeValue::BigInt(text)) => {
            t.log.error_at(out_of_range(text), native.line);
            return None;
        }
        other => {
            let type_name = other.map_or("nothing", NativeValue::type_name);
            t.log.error_at(
                format!("unrecognized numeric literal of type {type_name}"),
                native.line,
            );
            return None;
        }
    };
    t.build(kind, vec![("n", value)], native.line)
}

/// The single literal node of newer parsers.
fn convert_constant(t: &mut Translator<'_>, native: &NativeNode) -> Option<Node> {
    let (kind, field, value) = match native.get("value") {
        Some(NativeValue::Int(n)) => ("IntLiteral", "n", Value::Int(*n)),
        Some(NativeValue::Float(f)) => ("FloatLiteral", "n", Value::Float(*f)),
        Some(NativeValue::Complex(c)) => ("ComplexLiteral", "n", Value::Complex(*c)),
        Some(NativeValue::BigInt(text)) => {
            t.log.error_at(out_of_range(text), native.line);
            return None;
        }
        Some(NativeValue::Bool(b)) => ("NameConstant", "value", Value::Bool(*b)),
        Some(NativeValue::None) => ("NameConstant", "value", Value::None),
        Some(NativeValue::Str(s)) => ("Str", "s", Value::Str(s.clone())),
        Some(NativeValue::Bytes(b)) => ("Bytes", "s", Value::Bytes(b.clone())),
        other => {
            let type_name = other.map_or("nothing", NativeValue::type_name);
            t.log.error_at(
                format!("unsupported constant of type {type_name}"),
                native.line,
            );
            return None;
        }
    };
    t.build(kind, vec![(field, value)], native.line)
}

/// `from __future__ import ...` becomes `FutureImport`.
fn convert_import_from(t: &mut Translator<'_>, native: &NativeNode) -> Option<Node> {
    if !matches!(native.get("module"), Some(NativeValue::Str(m)) if m == FUTURE_MODULE) {
        return t.convert_generic(native);
    }

    let mut features = Vec::new();
    let aliases: &[NativeValue] = match native.get("names") {
        Some(NativeValue::List(items)) => items.as_slice(),
        _ => &[],
    };
    for alias in aliases {
        let name = match alias {
            NativeValue::Node(alias) => match alias.get("name") {
                Some(NativeValue::Str(name)) => name.as_str(),
                _ => continue,
            },
            _ => continue,
        };
        if is_known_feature(name) {
            features.push(Value::from(name));
        } else {
            t.log
                .error_at(format!("future feature {name} is not defined"), native.line);
        }
    }

    if features.is_empty() {
        return None;
    }
    t.build("FutureImport", vec![("features", Value::List(features))], native.line)
}

/// Subscript indices wrapped in `Index` are replaced by the wrapped value.
fn convert_index(t: &mut Translator<'_>, native: &NativeNode) -> Option<Node> {
    match native.get("value") {
        Some(NativeValue::Node(inner)) => t.convert_node(inner),
        _ => {
            t.log.error_at("Index without a value", native.line);
            None
        }
    }
}
