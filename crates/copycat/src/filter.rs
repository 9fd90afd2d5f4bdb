//! Header filtering for raw HTTP messages.
//!
//! The filter keeps the start line, drops every header line whose name
//! matches an exclusion pattern, and keeps the separator and body verbatim.
//! Retained lines are joined with one canonical terminator.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::message::{Line, LineEnding, RawMessage};
use crate::patterns::ExclusionRules;

/// Removes excluded header lines from messages.
///
/// Holds an immutable snapshot of the compiled patterns, so it can be moved
/// to a worker thread and used there without locking.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    rules: Arc<ExclusionRules>,
    line_ending: LineEnding,
}

impl MessageFilter {
    /// Create a filter for the given compiled patterns.
    #[must_use]
    pub fn new(rules: Arc<ExclusionRules>) -> Self {
        Self {
            rules,
            line_ending: LineEnding::default(),
        }
    }

    /// Set the terminator used to reassemble messages.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// The compiled patterns this filter applies.
    #[must_use]
    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// The terminator used to reassemble messages.
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Filter one message.
    ///
    /// A terminator follows the last line only if the input's last line was
    /// terminated, which keeps the body intact and makes filtering
    /// idempotent. A message without a blank separator is treated as all
    /// headers.
    #[must_use]
    pub fn filter(&self, message: &RawMessage) -> String {
        let terminator = self.line_ending.as_str();
        let mut output = String::with_capacity(message.as_str().len());
        let mut retained = 0usize;
        let mut dropped = 0usize;

        for line in message.lines() {
            if let Line::Header(header) = line {
                if self.rules.is_excluded(header.name) {
                    trace!(header = %header.name, "Dropping excluded header");
                    dropped += 1;
                    continue;
                }
            }
            if retained > 0 {
                output.push_str(terminator);
            }
            output.push_str(line.text());
            retained += 1;
        }

        if retained > 0 && message.ends_with_line_break() {
            output.push_str(terminator);
        }

        debug!(retained, dropped, "Filtered message");
        output
    }

    /// Filter message text.
    #[must_use]
    pub fn filter_text(&self, text: &str) -> String {
        self.filter(&RawMessage::new(text))
    }

    /// Patterns that would exclude a header with this name.
    #[must_use]
    pub fn explain(&self, name: &str) -> Vec<String> {
        self.rules.matching(name.trim()).map(String::from).collect()
    }
}
