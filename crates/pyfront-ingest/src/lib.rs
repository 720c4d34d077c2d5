//! Source ingestion for pyfront
//!
//! Converts the host parser's native syntax tree into schema-validated
//! pyfront nodes.
//!
//! - [`native`] - the native tree model and its JSON reader
//! - [`Translator`] - the tree walk, with per-kind handlers
//! - [`TranslationErrorLog`] - problems collected during one pass
//!
//! ```no_run
//! let module = pyfront_ingest::translate_json(r#"{"_type": "Module", "body": []}"#)?;
//! # Ok::<(), pyfront_ingest::TranslationError>(())
//! ```

pub mod error;
pub mod error_log;
pub mod future;
pub mod native;
pub mod translator;

pub use error::{NativeParseError, Result, TranslationError, TranslationMessage};
pub use error_log::TranslationErrorLog;
pub use native::{NativeNode, NativeValue, read_json};
pub use translator::{Handler, Translator, translate_json};
