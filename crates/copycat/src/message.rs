//! Raw HTTP message text and line classification.
//!
//! A message is never parsed as HTTP. It is only cut into lines, and each
//! line is classified as the start line, a header line, the blank separator,
//! or body content.

use serde::{Deserialize, Serialize};

/// Which side of an HTTP exchange a copy operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// The request only.
    Request,
    /// The response only.
    Response,
    /// Request and response together.
    Exchange,
}

impl MessageKind {
    /// Capitalized label used in user-facing log lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Request => "Request",
            Self::Response => "Response",
            Self::Exchange => "Request+Response",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Response => write!(f, "response"),
            Self::Exchange => write!(f, "request/response"),
        }
    }
}

/// Line terminator used when a filtered message is reassembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`, as on the wire.
    #[default]
    Crlf,
    /// `\n`.
    Lf,
}

impl LineEnding {
    /// The terminator bytes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

/// One HTTP request or response exactly as captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    text: String,
}

impl RawMessage {
    /// Wrap captured message text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The full message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check if the message has no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if the last line of the message is terminated.
    #[must_use]
    pub fn ends_with_line_break(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Iterate over the classified lines of the message.
    #[must_use]
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            segments: self.text.split_inclusive('\n'),
            index: 0,
            in_body: false,
        }
    }

    /// The request line or status line.
    #[must_use]
    pub fn start_line(&self) -> Option<&str> {
        self.lines().next().map(|line| line.text())
    }

    /// Header lines in message order.
    #[must_use]
    pub fn headers(&self) -> Vec<HeaderLine<'_>> {
        self.lines()
            .filter_map(|line| match line {
                Line::Header(header) => Some(header),
                _ => None,
            })
            .collect()
    }

    /// Everything after the blank separator line, byte for byte.
    ///
    /// Returns `None` when the message has no separator.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        let mut offset = 0;
        for (index, segment) in self.text.split_inclusive('\n').enumerate() {
            offset += segment.len();
            if index > 0 && strip_terminator(segment).trim().is_empty() {
                return Some(&self.text[offset..]);
            }
        }
        None
    }
}

impl From<String> for RawMessage {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for RawMessage {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// A header line split into its name and the untouched line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLine<'a> {
    /// Text before the first `:`, trimmed. The whole line if there is no `:`.
    pub name: &'a str,
    /// The line as it appeared in the message, without terminator.
    pub line: &'a str,
}

impl<'a> HeaderLine<'a> {
    /// Split a header line.
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let name = line.split_once(':').map_or(line, |(name, _)| name).trim();
        Self { name, line }
    }
}

/// A classified message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Line 0: request line or status line.
    Start(&'a str),
    /// A line inside the header block.
    Header(HeaderLine<'a>),
    /// The first empty or whitespace-only line after the start line.
    Separator(&'a str),
    /// Any line after the separator, blank or not.
    Body(&'a str),
}

impl<'a> Line<'a> {
    /// The line text without its terminator.
    #[must_use]
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Start(text) | Self::Separator(text) | Self::Body(text) => text,
            Self::Header(header) => header.line,
        }
    }
}

/// Iterator over the classified lines of a [`RawMessage`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    segments: std::str::SplitInclusive<'a, char>,
    index: usize,
    in_body: bool,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = strip_terminator(self.segments.next()?);
        let line = if self.index == 0 {
            Line::Start(text)
        } else if self.in_body {
            Line::Body(text)
        } else if text.trim().is_empty() {
            self.in_body = true;
            Line::Separator(text)
        } else {
            Line::Header(HeaderLine::parse(text))
        };
        self.index += 1;
        Some(line)
    }
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_terminator(segment: &str) -> &str {
    match segment.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => segment,
    }
}
