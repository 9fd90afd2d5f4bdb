//! Capabilities copycat consumes from its host.
//!
//! The host decides which message is "current", where filtered text ends up,
//! and where activity lines are shown. Implementations live in
//! [`crate::adapters`] or in the embedding application.
//!
//! None of the traits require `Send` or `Sync`: a copy acquires messages and
//! publishes results on the caller's thread, so implementations may be bound
//! to a UI thread.

use crate::message::{MessageKind, RawMessage};

/// Supplies the messages a copy operation works on.
///
/// Selection policy (selected item, focused editor, latest history entry)
/// belongs to the implementation. Calls are expected to be cheap.
pub trait MessageSource {
    /// The current request, if any.
    fn current_request(&self) -> Option<RawMessage>;

    /// The current response, if any.
    fn current_response(&self) -> Option<RawMessage>;

    /// The current message of a single kind.
    ///
    /// Returns `None` for [`MessageKind::Exchange`].
    fn current(&self, kind: MessageKind) -> Option<RawMessage> {
        match kind {
            MessageKind::Request => self.current_request(),
            MessageKind::Response => self.current_response(),
            MessageKind::Exchange => None,
        }
    }
}

/// Receives filtered text, e.g. the system clipboard.
///
/// Publishing is assumed to succeed; implementations log their own failures.
pub trait ResultSink {
    /// Hand over the filtered text.
    fn publish(&self, text: &str);
}

/// Records user-facing activity lines.
pub trait Logger {
    /// Record a normal outcome.
    fn info(&self, message: &str);

    /// Record a failure.
    fn error(&self, message: &str);
}
