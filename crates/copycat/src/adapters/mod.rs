//! Ready-made implementations of the host ports.

pub mod memory;
pub mod sink;
pub mod source;

pub use memory::{MemoryLog, MemorySink, Severity};
pub use sink::{ClipboardSink, StdoutSink};
pub use source::{read_message, ChainedSource, StaticSource};
