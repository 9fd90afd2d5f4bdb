//! Error types for copycat.
//!
//! This module defines the error types used throughout the copycat crate.
//! Most of them never reach the caller of a copy operation: they are logged
//! and the operation degrades instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::message::MessageKind;

/// The main error type for copycat operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Pattern Errors ===
    /// A pattern is not a valid regular expression.
    ///
    /// The pattern is still used, as a literal header name.
    #[error("invalid regex '{pattern}', treated as literal: {source}")]
    InvalidPattern {
        /// The pattern as entered by the user.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    // === Message Errors ===
    /// No message of the requested kind was available.
    #[error("no {kind} available to copy")]
    NoMessage {
        /// Which side of the exchange was missing.
        kind: MessageKind,
    },

    /// Failed to read a message from disk.
    #[error("failed to read message from {path}: {source}")]
    MessageRead {
        /// Path of the message file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Sink Errors ===
    /// The system clipboard could not be written.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // === I/O Errors ===
    /// File system or stream operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for copycat operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a "nothing to copy" error for the given side.
    #[must_use]
    pub fn no_message(kind: MessageKind) -> Self {
        Self::NoMessage { kind }
    }

    /// Check if this error is a rejected regex.
    #[must_use]
    pub fn is_invalid_pattern(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. })
    }
}
