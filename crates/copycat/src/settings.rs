//! The settings surface for header exclusion patterns.
//!
//! [`Settings`] is the only way to mutate the pattern store. Each mutation
//! recompiles the patterns under an exclusive lock and then publishes the new
//! compiled set, so filtering always sees either the old or the new set and
//! never a partial one.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;

use crate::config::Config;
use crate::logging::TracingLogger;
use crate::patterns::{ExclusionRules, PatternStore};
use crate::ports::Logger;

/// Result of adding a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The pattern was stored and compiled as a regex.
    Added,
    /// The pattern was stored, but it is not a valid regex and matches
    /// literally.
    AddedAsLiteral,
    /// The pattern was already present.
    Duplicate,
    /// The pattern was blank.
    Empty,
}

impl AddOutcome {
    /// Check if the pattern set changed.
    #[must_use]
    pub fn is_added(self) -> bool {
        matches!(self, Self::Added | Self::AddedAsLiteral)
    }
}

/// Shared, synchronized access to the exclusion patterns.
pub struct Settings {
    store: RwLock<PatternStore>,
    updates: watch::Sender<Arc<ExclusionRules>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Settings {
    /// Wrap a pattern store, logging activity through tracing.
    #[must_use]
    pub fn new(store: PatternStore) -> Self {
        Self::with_logger(store, Arc::new(TracingLogger))
    }

    /// Wrap a pattern store with a custom activity logger.
    #[must_use]
    pub fn with_logger(store: PatternStore, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let (updates, _) = watch::channel(store.rules());
        Self {
            store: RwLock::new(store),
            updates,
            logger,
        }
    }

    /// Build settings from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pattern_store())
    }

    /// Add a pattern. Surrounding whitespace is ignored.
    ///
    /// A pattern that is not a valid regex is still added; it then matches
    /// only a header whose name equals the pattern text.
    pub fn add_pattern(&self, pattern: &str) -> AddOutcome {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return AddOutcome::Empty;
        }

        let outcome = {
            let mut store = self.write();
            if !store.add(pattern) {
                return AddOutcome::Duplicate;
            }
            let rules = store.rules();
            let literal = rules
                .get(pattern)
                .is_some_and(|entry| entry.predicate().is_literal());
            self.updates.send_replace(rules);
            if literal {
                AddOutcome::AddedAsLiteral
            } else {
                AddOutcome::Added
            }
        };

        if outcome == AddOutcome::AddedAsLiteral {
            self.logger.info(&format!(
                "Added header pattern (invalid regex, treated as literal): {pattern}"
            ));
        } else {
            self.logger
                .info(&format!("Added excluded header pattern: {pattern}"));
        }
        outcome
    }

    /// Remove patterns. Returns how many were present.
    pub fn remove_patterns<I, S>(&self, patterns: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed: Vec<String> = {
            let mut store = self.write();
            let removed: Vec<String> = patterns
                .into_iter()
                .filter(|pattern| store.remove(pattern.as_ref()))
                .map(|pattern| pattern.as_ref().to_string())
                .collect();
            if !removed.is_empty() {
                self.updates.send_replace(store.rules());
            }
            removed
        };

        for pattern in &removed {
            self.logger
                .info(&format!("Removed excluded header pattern: {pattern}"));
        }
        removed.len()
    }

    /// Replace all patterns with the defaults.
    pub fn reset_defaults(&self) {
        {
            let mut store = self.write();
            store.reset_to_defaults();
            self.updates.send_replace(store.rules());
        }
        self.logger.info("Reset excluded header patterns to defaults");
    }

    /// Current patterns, sorted.
    #[must_use]
    pub fn list_patterns(&self) -> Vec<String> {
        self.read().snapshot().into_iter().collect()
    }

    /// The seed list restored by [`Settings::reset_defaults`].
    #[must_use]
    pub fn default_patterns(&self) -> Vec<String> {
        self.read().defaults().to_vec()
    }

    /// The current compiled patterns.
    ///
    /// The snapshot is immutable; fetch again after a mutation.
    #[must_use]
    pub fn rules(&self) -> Arc<ExclusionRules> {
        Arc::clone(&self.updates.borrow())
    }

    /// Get notified whenever the compiled patterns are rebuilt.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<ExclusionRules>> {
        self.updates.subscribe()
    }

    fn read(&self) -> RwLockReadGuard<'_, PatternStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PatternStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(PatternStore::new())
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
