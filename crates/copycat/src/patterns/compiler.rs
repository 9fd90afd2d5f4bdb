//! Compilation of header exclusion patterns.
//!
//! A pattern is compiled once into a [`Predicate`]: a case-insensitive regex
//! when it parses, otherwise a case-insensitive literal header name.

use regex::{Regex, RegexBuilder};
use tracing::{trace, warn};

use crate::error::{Error, Result};

/// A compiled header-name matcher.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Case-insensitive regex, matched anywhere in the name.
    Regex(Regex),
    /// Lowercased pattern text, matched against the whole name.
    Literal(String),
}

impl Predicate {
    /// Build a case-insensitive regex predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern is not a valid regex.
    pub fn regex(pattern: &str) -> Result<Self> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Regex)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Build a literal predicate.
    #[must_use]
    pub fn literal(pattern: &str) -> Self {
        Self::Literal(pattern.to_lowercase())
    }

    /// Check if the header name is matched.
    ///
    /// Regex predicates search: `host` matches `X-Forwarded-Host`.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(name),
            Self::Literal(text) => name.to_lowercase() == *text,
        }
    }

    /// Check if this predicate is the literal fallback.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Compile a pattern, falling back to a literal match.
///
/// Never fails. A rejected regex is logged as a warning.
#[must_use]
pub fn compile(pattern: &str) -> Predicate {
    match Predicate::regex(pattern) {
        Ok(predicate) => {
            trace!(pattern = %pattern, "Compiled header pattern");
            predicate
        }
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Invalid regex, treated as literal");
            Predicate::literal(pattern)
        }
    }
}

/// A pattern together with its compiled predicate.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    predicate: Predicate,
}

impl CompiledPattern {
    /// Compile a pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            predicate: compile(pattern),
        }
    }

    /// The pattern as entered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Check if the header name is matched.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.predicate.matches(name)
    }
}

/// An immutable compiled pattern set.
///
/// Entries are sorted by pattern text. Each rebuild gets a new generation.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    generation: u64,
    entries: Vec<CompiledPattern>,
}

impl ExclusionRules {
    /// Compile a set of patterns.
    #[must_use]
    pub fn compile<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<_> = patterns.into_iter().map(CompiledPattern::new).collect();
        entries.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        entries.dedup_by(|a, b| a.pattern == b.pattern);
        Self {
            generation: 0,
            entries,
        }
    }

    /// Assemble a rule set from entries that are already compiled.
    ///
    /// `entries` must be sorted by pattern and free of duplicates.
    pub(crate) fn from_entries(generation: u64, entries: Vec<CompiledPattern>) -> Self {
        Self {
            generation,
            entries,
        }
    }

    /// Rebuild counter. Starts at 0.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the compiled entry for a pattern.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&CompiledPattern> {
        self.entries
            .binary_search_by(|entry| entry.pattern.as_str().cmp(pattern))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// All compiled entries, sorted by pattern.
    #[must_use]
    pub fn entries(&self) -> &[CompiledPattern] {
        &self.entries
    }

    /// Check if any pattern matches the header name.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.matches(name))
    }

    /// Patterns that match the header name.
    pub fn matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.matches(name))
            .map(CompiledPattern::pattern)
    }
}
