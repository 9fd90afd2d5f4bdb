//! Result sinks.

use std::io::Write;

use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::ports::ResultSink;

/// Writes filtered text to standard output, byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Write the text and flush.
    ///
    /// # Errors
    ///
    /// Returns an error if standard output is closed.
    pub fn try_publish(&self, text: &str) -> Result<()> {
        write_text(&mut std::io::stdout().lock(), text)
    }
}

fn write_text(writer: &mut impl Write, text: &str) -> Result<()> {
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

impl ResultSink for StdoutSink {
    fn publish(&self, text: &str) {
        if let Err(e) = self.try_publish(text) {
            error!(error = %e, "Failed to write filtered message to stdout");
        }
    }
}

/// Places filtered text on the system clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardSink;

impl ClipboardSink {
    /// Replace the clipboard contents with the text.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be opened or written.
    pub fn try_publish(&self, text: &str) -> Result<()> {
        let ctx = ClipboardContext::new().map_err(|e| Error::clipboard(e.to_string()))?;
        ctx.set_text(text.to_string())
            .map_err(|e| Error::clipboard(e.to_string()))?;
        debug!(len = text.len(), "Copied filtered message to clipboard");
        Ok(())
    }
}

impl ResultSink for ClipboardSink {
    fn publish(&self, text: &str) {
        if let Err(e) = self.try_publish(text) {
            error!(error = %e, "Failed to copy filtered message to clipboard");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_text_is_verbatim() {
        let mut out = Vec::new();
        write_text(&mut out, "HTTP/1.1 200 OK\r\n\r\nok").unwrap();
        assert_eq!(out, b"HTTP/1.1 200 OK\r\n\r\nok");

        let mut out = Vec::new();
        write_text(&mut out, "GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(out, b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn test_write_text_empty() {
        let mut out = Vec::new();
        write_text(&mut out, "").unwrap();
        assert!(out.is_empty());
    }
}
