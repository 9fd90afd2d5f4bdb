//! `copycat` - copy HTTP messages with noisy headers removed
//!
//! This library filters raw HTTP requests and responses against a set of
//! user-editable header exclusion patterns and hands the result to a sink
//! such as the clipboard. The host application supplies messages, sinks and
//! activity logging through the traits in [`ports`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//!
//! use copycat::adapters::{MemorySink, StaticSource};
//! use copycat::{CopyOrchestrator, Outcome, Settings};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let settings = Arc::new(Settings::default());
//! settings.add_pattern("x-.*");
//!
//! let sink = Rc::new(MemorySink::new());
//! let orchestrator = CopyOrchestrator::new(settings, sink.clone());
//!
//! let source = StaticSource::request("GET / HTTP/1.1\r\nHost: a\r\nX-Id: 1\r\nAccept: */*\r\n\r\n");
//! assert_eq!(orchestrator.copy_request(&source).await, Outcome::Published);
//! assert_eq!(
//!     sink.last().unwrap(),
//!     "GET / HTTP/1.1\r\nAccept: */*\r\n\r\n"
//! );
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod message;
pub mod orchestrator;
pub mod patterns;
pub mod ports;
pub mod settings;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::MessageFilter;
pub use logging::init_logging;
pub use message::{LineEnding, MessageKind, RawMessage};
pub use orchestrator::{CopyOrchestrator, Outcome};
pub use patterns::{ExclusionRules, PatternStore};
pub use settings::{AddOutcome, Settings};
