//! Duel configuration.
//!
//! Hosts build a `DuelConfig` once per duel, either in code with the
//! `with_*` builder methods or by deserializing it from their own settings
//! file. Every field has a default, so a partial document is enough.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Life total both players start with unless configured otherwise.
pub const DEFAULT_LIFEPOINTS: i64 = 8000;

/// Complete duel configuration.
///
/// ```
/// use duel_field::core::DuelConfig;
///
/// let config = DuelConfig::new()
///     .with_starting_lifepoints(4000)
///     .with_seed(7)
///     .without_shuffle();
///
/// assert_eq!(config.starting_lifepoints, 4000);
/// assert!(!config.shuffle_on_start);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Life total for both players at duel start.
    pub starting_lifepoints: i64,

    /// Shuffle the main decks before creating the deck cards.
    pub shuffle_on_start: bool,

    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Only send cards that changed since the previous view notification.
    pub incremental_views: bool,

    /// How long a question may stay unanswered. `None` keeps questions
    /// pending until answered, replayed or cancelled.
    pub question_ttl: Option<Duration>,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            starting_lifepoints: DEFAULT_LIFEPOINTS,
            shuffle_on_start: true,
            seed: None,
            incremental_views: false,
            question_ttl: None,
        }
    }
}

impl DuelConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting life total.
    #[must_use]
    pub fn with_starting_lifepoints(mut self, lifepoints: i64) -> Self {
        self.starting_lifepoints = lifepoints;
        self
    }

    /// Keep decklists in the order given.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle_on_start = false;
        self
    }

    /// Seed the duel RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Send edited-only field views.
    #[must_use]
    pub fn incremental(mut self) -> Self {
        self.incremental_views = true;
        self
    }

    /// Expire questions that stay unanswered for longer than `ttl`.
    #[must_use]
    pub fn with_question_ttl(mut self, ttl: Duration) -> Self {
        self.question_ttl = Some(ttl);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DuelConfig::default();
        assert_eq!(config.starting_lifepoints, 8000);
        assert!(config.shuffle_on_start);
        assert!(config.seed.is_none());
        assert!(!config.incremental_views);
        assert!(config.question_ttl.is_none());
    }

    #[test]
    fn test_builder() {
        let config = DuelConfig::new()
            .with_starting_lifepoints(2000)
            .with_seed(99)
            .incremental()
            .with_question_ttl(Duration::from_secs(30));

        assert_eq!(config.starting_lifepoints, 2000);
        assert_eq!(config.seed, Some(99));
        assert!(config.incremental_views);
        assert_eq!(config.question_ttl, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: DuelConfig =
            serde_json::from_str(r#"{ "starting_lifepoints": 4000, "shuffle_on_start": false }"#)
                .unwrap();

        assert_eq!(config.starting_lifepoints, 4000);
        assert!(!config.shuffle_on_start);
        assert!(config.seed.is_none());
    }
}
