//! The set of header exclusion patterns.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::compiler::{CompiledPattern, ExclusionRules};

/// Patterns excluded when no configuration overrides them.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "content-length",
    "transfer-encoding",
    "connection",
    "host",
    "accept-encoding",
    "user-agent",
    "sec-.*",
    "cookie",
    "authorization",
];

/// Get the default exclusion patterns.
#[must_use]
pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(ToString::to_string).collect()
}

/// Holds the exclusion patterns and their compiled form.
///
/// Patterns are unique by exact, case-sensitive text. Every mutation
/// recompiles before it returns, so [`PatternStore::rules`] always reflects
/// the current set.
#[derive(Debug)]
pub struct PatternStore {
    defaults: Vec<String>,
    patterns: BTreeSet<String>,
    rules: Arc<ExclusionRules>,
}

impl PatternStore {
    /// Create a store seeded with [`DEFAULT_PATTERNS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(default_patterns())
    }

    /// Create a store seeded with the given defaults.
    ///
    /// Empty entries are ignored.
    #[must_use]
    pub fn with_defaults(defaults: Vec<String>) -> Self {
        let defaults: Vec<String> = defaults.into_iter().filter(|p| !p.is_empty()).collect();
        let patterns: BTreeSet<String> = defaults.iter().cloned().collect();
        let rules = ExclusionRules::compile(patterns.iter().map(String::as_str));
        Self {
            defaults,
            patterns,
            rules: Arc::new(rules),
        }
    }

    /// Insert a pattern.
    ///
    /// Returns `false`, without touching the set, if the pattern is empty or
    /// already present.
    pub fn add(&mut self, pattern: &str) -> bool {
        if pattern.is_empty() || self.patterns.contains(pattern) {
            return false;
        }
        self.patterns.insert(pattern.to_string());
        self.recompile();
        true
    }

    /// Delete a pattern. Returns whether it was present.
    pub fn remove(&mut self, pattern: &str) -> bool {
        if !self.patterns.remove(pattern) {
            return false;
        }
        self.recompile();
        true
    }

    /// Replace the whole set with the defaults.
    pub fn reset_to_defaults(&mut self) {
        self.patterns = self.defaults.iter().cloned().collect();
        self.recompile();
    }

    /// Copy of the current patterns.
    #[must_use]
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.patterns.clone()
    }

    /// Check if a pattern is present.
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern)
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The seed list used by [`PatternStore::reset_to_defaults`].
    #[must_use]
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// The compiled form of the current set.
    #[must_use]
    pub fn rules(&self) -> Arc<ExclusionRules> {
        Arc::clone(&self.rules)
    }

    /// Rebuild the compiled set from the current patterns.
    ///
    /// Predicates for patterns that survived the mutation are reused, so a
    /// rejected regex is only reported once.
    fn recompile(&mut self) {
        let previous = &self.rules;
        let entries = self
            .patterns
            .iter()
            .map(|pattern| {
                previous
                    .get(pattern)
                    .cloned()
                    .unwrap_or_else(|| CompiledPattern::new(pattern))
            })
            .collect();
        let generation = previous.generation() + 1;
        self.rules = Arc::new(ExclusionRules::from_entries(generation, entries));
        debug!(
            generation,
            patterns = self.patterns.len(),
            "Recompiled header patterns"
        );
    }
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}
