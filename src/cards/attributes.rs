//! Catalog attributes copied onto cards.
//!
//! The engine never interprets attributes (attack, level, race, ...). They
//! are copied from the catalog when a card is created and then only travel
//! with the card's code, e.g. when a deck shuffle permutes identities.
//!
//! Values are untagged so a catalog entry reads as plain JSON:
//! `{ "atk": 3000, "race": "Dragon", "monster": true, "links": [1, 2] }`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One catalog attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Bool(bool),
    Text(String),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }
}

macro_rules! attribute_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for AttributeValue {
            fn from(v: $ty) -> Self {
                AttributeValue::$variant(v.into())
            }
        })*
    };
}

attribute_from! {
    i64 => Int,
    i32 => Int,
    u32 => Int,
    bool => Bool,
    &str => Text,
    String => Text,
}

/// Attributes of one card, keyed by catalog field name.
pub type Attributes = FxHashMap<String, AttributeValue>;
