/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for source ingestion.
 */

use std::fmt;

use thiserror::Error;

/// Message used when the native tree itself cannot be read.
pub const MALFORMED_TREE_MESSAGE: &str = "source could not be parsed into a syntax tree";

/// A single problem found while translating a native tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationMessage {
    pub message: String,
    /// Source line of the offending native node, when known.
    pub line: Option<u32>,
}

impl TranslationMessage {
    pub fn new(message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for TranslationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Every problem found during one translation pass, in the order found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationError {
    pub messages: Vec<TranslationMessage>,
    pub summary: Option<String>,
}

impl TranslationError {
    pub fn new(messages: Vec<TranslationMessage>, summary: Option<String>) -> Self {
        Self { messages, summary }
    }

    /// The error raised when the native tree could not be read at all.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self {
            messages: vec![TranslationMessage::new(MALFORMED_TREE_MESSAGE, None)],
            summary: Some(detail.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.summary {
            Some(summary) => f.write_str(summary)?,
            None => write!(f, "translation failed")?,
        }
        for message in &self.messages {
            write!(f, "\n  {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for TranslationError {}

/// Errors reading a native tree from JSON.
#[derive(Debug, Error)]
pub enum NativeParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a node object with a '_type' key, got {0}")]
    NotANode(String),

    #[error("invalid '{key}' value: {detail}")]
    InvalidEncoding { key: String, detail: String },
}

pub type Result<T> = std::result::Result<T, TranslationError>;
