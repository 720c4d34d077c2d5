//! Pattern matching and desugaring for pyfront syntax trees
//!
//! This crate rewrites complex Python constructs into a smaller core before
//! code emission.
//!
//! - [`Matcher`] - structural predicates over nodes
//! - [`Modifier`] - a matcher paired with a rewrite function
//! - [`Desugarer`] - runs a set of rules bottom-up over a tree
//! - [`TempNames`] - per-run counters for generated variable names
//!
//! Every rule's output is guaranteed not to match the rule again, so a
//! single pass is enough and [`Desugarer::verify`] can check the result.

pub mod build;
pub mod error;
pub mod matcher;
pub mod modifier;
pub mod pass;
pub mod rules;
pub mod temp_names;

pub use build::TreeBuilder;
pub use error::{MatchError, Result, RewriteError};
pub use matcher::Matcher;
pub use modifier::{FnModifier, Modifier, RewriteContext, apply};
pub use pass::{Desugarer, ModifierPass};
pub use temp_names::TempNames;
