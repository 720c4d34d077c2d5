//! TranslationErrorLog - collects translation errors across one pass

use crate::error::{TranslationError, TranslationMessage};

/// Ordered collector for translation errors.
///
/// Messages are kept exactly as added: no deduplication, no sorting.
#[derive(Debug, Default)]
pub struct TranslationErrorLog {
    messages: Vec<TranslationMessage>,
}

impl TranslationErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error message
    pub fn add(&mut self, message: TranslationMessage) {
        tracing::warn!(line = ?message.line, "{}", message.message);
        self.messages.push(message);
    }

    /// Add an error message without a source line
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(TranslationMessage::new(message, None));
    }

    /// Add an error message attached to a source line
    pub fn error_at(&mut self, message: impl Into<String>, line: Option<u32>) {
        self.add(TranslationMessage::new(message, line));
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[TranslationMessage] {
        &self.messages
    }

    /// Consume the log, failing with every collected message if any.
    pub fn into_result(self) -> Result<(), TranslationError> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let count = self.messages.len();
        let summary = format!(
            "found {count} error{} while translating the syntax tree",
            if count == 1 { "" } else { "s" }
        );
        Err(TranslationError::new(self.messages, Some(summary)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log_is_ok() {
        let log = TranslationErrorLog::new();
        assert!(log.is_empty());
        assert!(log.into_result().is_ok());
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let mut log = TranslationErrorLog::new();
        log.error_at("b", Some(2));
        log.error_at("a", Some(1));
        log.error_at("b", Some(2));
        log.error("c");
        assert_eq!(log.len(), 4);

        let err = log.into_result().unwrap_err();
        let text: Vec<String> = err.messages.iter().map(|m| m.to_string()).collect();
        assert_eq!(text, vec!["line 2: b", "line 1: a", "line 2: b", "c"]);
        assert_eq!(
            err.summary.as_deref(),
            Some("found 4 errors while translating the syntax tree")
        );
    }
}
