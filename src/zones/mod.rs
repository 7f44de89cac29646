//! Zones, positions, and the card stack.
//!
//! Unlike a general card engine, a duel field has a fixed set of zones per
//! seat. Pile zones (deck, hand, graveyard, ...) are kept densely indexed
//! `0..n`; the monster and spell/trap zones use their index as a physical
//! slot number and may have gaps.
//!
//! ## Key Types
//!
//! - `Zone`: Per-seat compartment
//! - `Position`: Orientation of a card
//! - `CardQuery`: Composable card selector
//! - `CardStack`: Append-only card store with a uid index

pub mod query;
pub mod stack;

pub use query::CardQuery;
pub use stack::CardStack;

use serde::{Deserialize, Serialize};

/// Per-seat compartment a card sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zone {
    Deck,
    Hand,
    Grave,
    Extra,
    Banished,
    SpellZone,
    MonsterZone,
    Excavated,
    /// Removed from the game entirely. Never displayed.
    Inmaterial,
}

impl Zone {
    /// Every zone, in display order.
    pub const ALL: [Zone; 9] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Grave,
        Zone::Extra,
        Zone::Banished,
        Zone::SpellZone,
        Zone::MonsterZone,
        Zone::Excavated,
        Zone::Inmaterial,
    ];

    /// Zones whose indices are renumbered `0..n` after every mutation.
    pub const PILES: [Zone; 6] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Grave,
        Zone::Extra,
        Zone::Banished,
        Zone::Excavated,
    ];

    /// Wire name of the zone.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Zone::Deck => "DECK",
            Zone::Hand => "HAND",
            Zone::Grave => "GRAVE",
            Zone::Extra => "EXTRA",
            Zone::Banished => "BANISHED",
            Zone::SpellZone => "SPELLZONE",
            Zone::MonsterZone => "MONSTERZONE",
            Zone::Excavated => "EXCAVATED",
            Zone::Inmaterial => "INMATERIAL",
        }
    }

    /// Is this zone densely re-indexed?
    #[must_use]
    pub fn is_pile(self) -> bool {
        Self::PILES.contains(&self)
    }

    /// Does this zone appear on the field at all?
    #[must_use]
    pub fn is_displayable(self) -> bool {
        self != Zone::Inmaterial
    }

    /// Moving into this zone hands the card back to its owner.
    #[must_use]
    pub fn returns_to_owner(self) -> bool {
        matches!(self, Zone::Grave | Zone::Banished)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Card orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    FaceUp,
    #[default]
    FaceDown,
    FaceUpAttack,
    FaceUpDefence,
    FaceDownDefence,
}

impl Position {
    #[must_use]
    pub const fn is_face_down(self) -> bool {
        matches!(self, Position::FaceDown | Position::FaceDownDefence)
    }

    /// Turn the card over: face-down becomes face-up, anything else becomes
    /// face-down.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Position::FaceDown => Position::FaceUp,
            _ => Position::FaceDown,
        }
    }
}
