/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The native parse tree handed to the translator, and its JSON reader.
 */

//! Native parse trees.
//!
//! A native tree is the host parser's own syntax tree, before translation.
//! It is read from JSON where every node is an object carrying its kind in
//! `"_type"` and its fields as the remaining keys, in document order:
//!
//! ```json
//! {"_type": "Expr", "lineno": 1, "col_offset": 0,
//!  "value": {"_type": "Num", "n": 42}}
//! ```
//!
//! `lineno` becomes [`NativeNode::line`]; the other position keys are
//! dropped. Values JSON cannot express directly use tagged objects:
//! `{"_complex": [re, im]}` and `{"_bytes": [..]}`. Any other object is kept
//! as [`NativeValue::Opaque`].
//!
//! Numbers are classified by their literal text: one without `.`, `e` or
//! `E` is an integer, and an integer outside the `i64` range is kept as
//! [`NativeValue::BigInt`] rather than rounded to a float.

use pyfront_ast::Complex;
use serde_json::{Map, Number, Value};

use crate::error::NativeParseError;

type Result<T> = std::result::Result<T, NativeParseError>;

const POSITION_KEYS: &[&str] = &["col_offset", "end_lineno", "end_col_offset"];

#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Node(NativeNode),
    List(Vec<NativeValue>),
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    /// An integer literal outside the `i64` range, as written.
    BigInt(String),
    Float(f64),
    Complex(Complex),
    Bool(bool),
    None,
    /// A value with no pyfront counterpart, kept as its JSON text.
    Opaque(String),
}

impl NativeValue {
    /// Name of the value's runtime type, used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            NativeValue::Node(node) => &node.kind,
            NativeValue::List(_) => "list",
            NativeValue::Str(_) => "str",
            NativeValue::Bytes(_) => "bytes",
            NativeValue::Int(_) | NativeValue::BigInt(_) => "int",
            NativeValue::Float(_) => "float",
            NativeValue::Complex(_) => "complex",
            NativeValue::Bool(_) => "bool",
            NativeValue::None => "None",
            NativeValue::Opaque(_) => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeNode {
    pub kind: String,
    pub fields: Vec<(String, NativeValue)>,
    pub line: Option<u32>,
}

impl NativeNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: NativeValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&NativeValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// Read a native tree from JSON text. The root must be a node.
pub fn read_json(text: &str) -> Result<NativeNode> {
    let value: Value = serde_json::from_str(text)?;
    match &value {
        Value::Object(map) if map.contains_key("_type") => read_node(map),
        other => Err(NativeParseError::NotANode(summarize(other))),
    }
}

fn read_node(map: &Map<String, Value>) -> Result<NativeNode> {
    let kind = map
        .get("_type")
        .and_then(Value::as_str)
        .ok_or_else(|| NativeParseError::NotANode(summarize(&Value::Object(map.clone()))))?;

    let mut node = NativeNode::new(kind);
    for (key, value) in map {
        match key.as_str() {
            "_type" => {}
            "lineno" => node.line = value.as_u64().and_then(|n| u32::try_from(n).ok()),
            k if POSITION_KEYS.contains(&k) => {}
            _ => node.fields.push((key.clone(), read_value(value)?)),
        }
    }
    Ok(node)
}

fn read_value(value: &Value) -> Result<NativeValue> {
    Ok(match value {
        Value::Null => NativeValue::None,
        Value::Bool(b) => NativeValue::Bool(*b),
        Value::Number(n) => read_number(n),
        Value::String(s) => NativeValue::Str(s.clone()),
        Value::Array(items) => {
            NativeValue::List(items.iter().map(read_value).collect::<Result<_>>()?)
        }
        Value::Object(map) => {
            if map.contains_key("_type") {
                NativeValue::Node(read_node(map)?)
            } else if let Some(parts) = map.get("_complex") {
                read_complex(parts)?
            } else if let Some(bytes) = map.get("_bytes") {
                read_bytes(bytes)?
            } else {
                NativeValue::Opaque(value.to_string())
            }
        }
    })
}

fn read_number(n: &Number) -> NativeValue {
    if let Some(i) = n.as_i64() {
        return NativeValue::Int(i);
    }
    let text = n.to_string();
    if !text.contains(['.', 'e', 'E']) {
        return NativeValue::BigInt(text);
    }
    match n.as_f64() {
        Some(f) => NativeValue::Float(f),
        None => NativeValue::Opaque(text),
    }
}

fn read_complex(parts: &Value) -> Result<NativeValue> {
    let invalid = || NativeParseError::InvalidEncoding {
        key: "_complex".to_string(),
        detail: format!("expected [re, im], got {parts}"),
    };
    let items = parts.as_array().ok_or_else(invalid)?;
    match items.as_slice() {
        [re, im] => {
            let re = re.as_f64().ok_or_else(invalid)?;
            let im = im.as_f64().ok_or_else(invalid)?;
            Ok(NativeValue::Complex(Complex::new(re, im)))
        }
        _ => Err(invalid()),
    }
}

fn read_bytes(bytes: &Value) -> Result<NativeValue> {
    let invalid = || NativeParseError::InvalidEncoding {
        key: "_bytes".to_string(),
        detail: format!("expected an array of byte values, got {bytes}"),
    };
    let items = bytes.as_array().ok_or_else(invalid)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let byte = item
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(invalid)?;
        out.push(byte);
    }
    Ok(NativeValue::Bytes(out))
}

fn summarize(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object without a string '_type'".to_string(),
    }
}
