//! Message sources.

use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::message::RawMessage;
use crate::ports::MessageSource;

/// A source holding fixed messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSource {
    request: Option<RawMessage>,
    response: Option<RawMessage>,
}

impl StaticSource {
    /// Create a source with the given messages.
    #[must_use]
    pub fn new(request: Option<RawMessage>, response: Option<RawMessage>) -> Self {
        Self { request, response }
    }

    /// A source with a request only.
    #[must_use]
    pub fn request(text: impl Into<String>) -> Self {
        Self::new(Some(RawMessage::new(text)), None)
    }

    /// A source with a response only.
    #[must_use]
    pub fn response(text: impl Into<String>) -> Self {
        Self::new(None, Some(RawMessage::new(text)))
    }

    /// A source with both sides of an exchange.
    #[must_use]
    pub fn exchange(request: impl Into<String>, response: impl Into<String>) -> Self {
        Self::new(
            Some(RawMessage::new(request)),
            Some(RawMessage::new(response)),
        )
    }

    /// Read messages from files. `-` reads standard input.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, or if both sides ask for
    /// standard input.
    pub fn from_files(request: Option<&Path>, response: Option<&Path>) -> Result<Self> {
        if request.is_some_and(is_stdin) && response.is_some_and(is_stdin) {
            return Err(Error::ConfigValidation {
                message: "request and response cannot both be read from stdin".to_string(),
            });
        }
        Ok(Self {
            request: request.map(read_message).transpose()?,
            response: response.map(read_message).transpose()?,
        })
    }
}

impl MessageSource for StaticSource {
    fn current_request(&self) -> Option<RawMessage> {
        self.request.clone()
    }

    fn current_response(&self) -> Option<RawMessage> {
        self.response.clone()
    }
}

/// Read one message from a file, or from standard input for `-`.
///
/// # Errors
///
/// Returns [`Error::MessageRead`] if the file cannot be read.
pub fn read_message(path: &Path) -> Result<RawMessage> {
    let mut text = String::new();
    if is_stdin(path) {
        debug!("Reading message from stdin");
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| Error::MessageRead {
                path: path.to_path_buf(),
                source,
            })?;
    } else {
        debug!(path = %path.display(), "Reading message");
        text = std::fs::read_to_string(path).map_err(|source| Error::MessageRead {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(RawMessage::new(text))
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Tries several sources in order, per side.
///
/// Mirrors a host that prefers the selected item, then the focused editor,
/// then the latest history entry.
#[derive(Default)]
pub struct ChainedSource {
    sources: Vec<Box<dyn MessageSource>>,
}

impl ChainedSource {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fallback source.
    #[must_use]
    pub fn then(mut self, source: impl MessageSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the chain has no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl MessageSource for ChainedSource {
    fn current_request(&self) -> Option<RawMessage> {
        self.sources.iter().enumerate().find_map(|(i, source)| {
            let message = source.current_request();
            trace!(index = i, found = message.is_some(), "Probed request source");
            message
        })
    }

    fn current_response(&self) -> Option<RawMessage> {
        self.sources.iter().enumerate().find_map(|(i, source)| {
            let message = source.current_response();
            trace!(index = i, found = message.is_some(), "Probed response source");
            message
        })
    }
}

impl std::fmt::Debug for ChainedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedSource")
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_static_source() {
        let source = StaticSource::exchange("GET / HTTP/1.1", "HTTP/1.1 200 OK");
        assert_eq!(
            source.current_request().unwrap().as_str(),
            "GET / HTTP/1.1"
        );
        assert_eq!(
            source.current_response().unwrap().as_str(),
            "HTTP/1.1 200 OK"
        );

        assert!(StaticSource::request("GET /").current_response().is_none());
        assert!(StaticSource::response("HTTP/1.1 200").current_request().is_none());
        assert!(StaticSource::default().current_request().is_none());
    }

    #[test]
    fn test_from_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "GET / HTTP/1.1\r\nHost: a\r\n\r\n").unwrap();

        let source = StaticSource::from_files(Some(file.path()), None).unwrap();
        assert_eq!(
            source.current_request().unwrap().as_str(),
            "GET / HTTP/1.1\r\nHost: a\r\n\r\n"
        );
        assert!(source.current_response().is_none());
    }

    #[test]
    fn test_from_missing_file() {
        let path = PathBuf::from("/nonexistent/request.txt");
        let err = StaticSource::from_files(Some(&path), None).unwrap_err();
        assert!(matches!(err, Error::MessageRead { .. }));
    }

    #[test]
    fn test_from_files_rejects_double_stdin() {
        let stdin = PathBuf::from("-");
        let err = StaticSource::from_files(Some(&stdin), Some(&stdin)).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_chain_prefers_first_source_per_side() {
        let chain = ChainedSource::new()
            .then(StaticSource::request("GET /selected HTTP/1.1"))
            .then(StaticSource::exchange(
                "GET /editor HTTP/1.1",
                "HTTP/1.1 200 OK",
            ));

        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.current_request().unwrap().as_str(),
            "GET /selected HTTP/1.1"
        );
        // The selection has no response, so the next source supplies one
        assert_eq!(
            chain.current_response().unwrap().as_str(),
            "HTTP/1.1 200 OK"
        );
    }

    #[test]
    fn test_empty_chain() {
        let chain = ChainedSource::new();
        assert!(chain.is_empty());
        assert!(chain.current_request().is_none());
        assert!(chain.current_response().is_none());
    }
}
