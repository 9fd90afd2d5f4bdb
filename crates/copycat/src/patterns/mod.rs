//! Header exclusion patterns.
//!
//! This module holds the user-facing pattern set and its compiled form:
//!
//! - **Store**: a set of pattern strings with add, remove and reset. Every
//!   mutation rebuilds the compiled set before it returns.
//!
//! - **Compiler**: each pattern becomes a case-insensitive regex that is
//!   searched for anywhere in a header name. A pattern that is not a valid
//!   regex still works, as a literal header name.
//!
//! # Example
//!
//! ```
//! use copycat::patterns::PatternStore;
//!
//! let mut store = PatternStore::new();
//! store.add("x-.*");
//! store.add("x-("); // not a regex: matches the header named "x-(" only
//!
//! let rules = store.rules();
//! assert!(rules.is_excluded("X-Custom"));
//! assert!(rules.is_excluded("X-Forwarded-Host"));
//! assert!(!rules.is_excluded("Accept"));
//! ```

mod compiler;
mod store;

pub use compiler::{compile, CompiledPattern, ExclusionRules, Predicate};
pub use store::{default_patterns, PatternStore, DEFAULT_PATTERNS};
