//! Card catalog lookup.
//!
//! The catalog is the one resource duels share. It is read-only once built,
//! so hosts wrap it in an `Arc` and hand the same instance to every duel.
//! `CardRegistry` is the in-memory implementation; anything else that can
//! answer "what is code X" can implement [`CardCatalog`].

use rustc_hash::FxHashMap;

use super::definition::{CardCode, CardDefinition};
use crate::core::DuelError;

/// Read-only code → definition lookup.
pub trait CardCatalog: Send + Sync {
    /// Look up a definition by code.
    fn lookup(&self, code: CardCode) -> Option<&CardDefinition>;
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use duel_field::cards::{CardCatalog, CardCode, CardDefinition, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(
///     CardDefinition::new(CardCode::new(1), "Dark Magician").with_attr("atk", 2500i32),
/// );
///
/// let found = registry.lookup(CardCode::new(1)).unwrap();
/// assert_eq!(found.name, "Dark Magician");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardCode, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of definitions.
    ///
    /// Later entries with a duplicate code replace earlier ones.
    pub fn from_json(json: &str) -> Result<Self, DuelError> {
        let definitions: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for definition in definitions {
            registry.cards.insert(definition.code, definition);
        }
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same code already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.code) {
            panic!("Card with code {:?} already registered", card.code);
        }
        self.cards.insert(card.code, card);
    }

    /// Check if a code is registered.
    #[must_use]
    pub fn contains(&self, code: CardCode) -> bool {
        self.cards.contains_key(&code)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardCatalog for CardRegistry {
    fn lookup(&self, code: CardCode) -> Option<&CardDefinition> {
        self.cards.get(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardCode::new(1), "Test Card"));

        assert_eq!(registry.lookup(CardCode::new(1)).map(|c| c.name.as_str()), Some("Test Card"));
        assert!(registry.lookup(CardCode::new(99)).is_none());
        assert!(registry.contains(CardCode::new(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_code_panics() {
        let mut registry = CardRegistry::new();

        registry.register(CardDefinition::new(CardCode::new(1), "A"));
        registry.register(CardDefinition::new(CardCode::new(1), "B"));
    }

    #[test]
    fn test_from_json() {
        let registry = CardRegistry::from_json(
            r#"[
                { "id": 46986414, "name": "Dark Magician", "atk": 2500, "def": 2100 },
                { "id": 89631139, "name": "Blue-Eyes White Dragon", "atk": 3000 }
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        let magician = registry.lookup(CardCode::new(46986414)).unwrap();
        assert_eq!(magician.get_int("def", 0), 2100);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = CardRegistry::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DuelError::Catalog(_)));
    }
}
