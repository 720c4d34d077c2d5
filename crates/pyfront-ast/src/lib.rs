//! Schema-driven syntax trees for the pyfront compiler
//!
//! Every syntax node is one generic [`Node`] record tagged with a shared
//! [`NodeSchema`]. Schemas come from a table produced by the grammar compiler
//! (the Python table is built in, see [`python`]), so adding a node kind is a
//! data change rather than a code change.
//!
//! # Architecture
//!
//! - [`schema`] - field specs, cardinalities, inheritance and the registry
//! - [`node`] - validated construction and assignment, equality, display and
//!   [`Node::finalize`]
//! - [`visit`] - the read-only [`Visitor`] and the rewriting [`Transformer`]
//!
//! # Example
//!
//! ```
//! use pyfront_ast::{Node, Value, python};
//!
//! let name = python::schema("Name").unwrap();
//! let load = Node::empty(python::schema("Load").unwrap());
//! let mut node = Node::with_fields(
//!     name,
//!     [("id", Value::from("x")), ("ctx", Value::from(load))],
//! )
//! .unwrap();
//! node.finalize().unwrap();
//! assert_eq!(node.to_string(), "Name(id='x', ctx=Load())");
//! ```

pub mod error;
pub mod node;
pub mod python;
pub mod scalar;
pub mod schema;
pub mod value;
pub mod visit;

pub use error::{NodeError, Result, SchemaError};
pub use node::Node;
pub use schema::{Cardinality, ElementType, FieldSpec, NodeSchema, SchemaRegistry, SchemaTable};
pub use value::{Complex, Slot, Value};
pub use visit::{Replacement, Transformer, Visitor, transform_children, walk_node};
