//! Catalog entries - static card data.
//!
//! A `CardDefinition` is what the catalog knows about a printed card: its
//! code (passcode), its name and any game attributes. Runtime state (zone,
//! position, counters) lives on [`Card`](super::Card).

use serde::{Deserialize, Serialize};

use super::attributes::{AttributeValue, Attributes};

/// Catalog code of a card. `0` is reserved for "identity hidden".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCode(pub u32);

impl CardCode {
    /// The code every masked card carries.
    pub const HIDDEN: CardCode = CardCode(0);

    /// Create a new card code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Get the raw code.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Is this the hidden placeholder code?
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for CardCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Code({})", self.0)
    }
}

/// Static card definition.
///
/// In JSON the attributes sit next to `id` and `name`:
///
/// ```
/// use duel_field::cards::{CardCode, CardDefinition};
///
/// let dragon: CardDefinition =
///     serde_json::from_str(r#"{ "id": 89631139, "name": "Blue-Eyes White Dragon", "atk": 3000 }"#)
///         .unwrap();
///
/// assert_eq!(dragon.code, CardCode::new(89631139));
/// assert_eq!(dragon.get_int("atk", 0), 3000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Catalog code.
    #[serde(rename = "id")]
    pub code: CardCode,

    /// Card name.
    #[serde(default)]
    pub name: String,

    /// Everything else the catalog says about the card.
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl CardDefinition {
    /// Create a new card definition.
    #[must_use]
    pub fn new(code: CardCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            attributes: Attributes::default(),
        }
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Integer attribute, or `default` when missing or not an integer.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.attr(key).and_then(AttributeValue::as_int).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_code() {
        let code = CardCode::new(42);
        assert_eq!(code.raw(), 42);
        assert_eq!(format!("{}", code), "Code(42)");
        assert!(!code.is_hidden());
        assert!(CardCode::HIDDEN.is_hidden());
        assert_eq!(CardCode::default(), CardCode::HIDDEN);
    }

    #[test]
    fn test_get_int_falls_back() {
        let card = CardDefinition::new(CardCode::new(40640057), "Kuriboh")
            .with_attr("atk", 300)
            .with_attr("attribute", "DARK");

        assert_eq!(card.get_int("attribute", -1), -1);
        assert_eq!(card.get_int("atk", 0), 300);
        assert_eq!(card.get_int("def", -1), -1);
    }

    #[test]
    fn test_attributes_flatten_next_to_id() {
        let token = CardDefinition::new(CardCode::new(7), "Token").with_attr("race", "Fiend");

        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(json, serde_json::json!({ "id": 7, "name": "Token", "race": "Fiend" }));
        assert_eq!(token.attr("race").and_then(AttributeValue::as_str), Some("Fiend"));
    }
}
