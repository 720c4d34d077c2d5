/*
 * python.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The built-in schema table for the Python input language.
 */

//! Python node kinds.
//!
//! The table in `resources/python_core.json` is generated from the Python
//! grammar description and embedded at compile time. Kinds follow the
//! standard library's `ast` module, with literal kinds split by runtime type
//! (`IntLiteral`, `FloatLiteral`, `ComplexLiteral`, `Str`, `Bytes`,
//! `NameConstant`) and `from __future__ import ...` given its own
//! `FutureImport` statement.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::SchemaError;
use crate::schema::{NodeSchema, SchemaRegistry};

/// The Python schema registry, loaded on first use.
pub static PYTHON_CORE: Lazy<SchemaRegistry> = Lazy::new(|| {
    let json_data = include_str!("../resources/python_core.json");
    SchemaRegistry::from_json(json_data)
        .expect("Invalid Python schema table - this is a bug in pyfront")
});

pub fn registry() -> &'static SchemaRegistry {
    &PYTHON_CORE
}

/// Look up one Python node kind.
pub fn schema(kind: &str) -> Result<&'static Arc<NodeSchema>, SchemaError> {
    PYTHON_CORE.get(kind)
}
