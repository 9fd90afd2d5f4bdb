//! In-memory sink and activity log, for embedding and tests.

use std::sync::{Mutex, PoisonError};

use crate::ports::{Logger, ResultSink};

/// Keeps every published text.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent publication.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl ResultSink for MemorySink {
    fn publish(&self, text: &str) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

/// Severity of a recorded activity line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recorded through [`Logger::info`].
    Info,
    /// Recorded through [`Logger::error`].
    Error,
}

/// Keeps every activity line.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines with their severity.
    #[must_use]
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded lines of one severity.
    #[must_use]
    pub fn lines(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, line)| line)
            .collect()
    }

    fn record(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, message.to_string()));
    }
}

impl Logger for MemoryLog {
    fn info(&self, message: &str) {
        self.record(Severity::Info, message);
    }

    fn error(&self, message: &str) {
        self.record(Severity::Error, message);
    }
}
