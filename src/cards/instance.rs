//! Card instances - runtime card state.
//!
//! A `Card` is one physical card in one duel. Its `uid` is fixed at
//! creation; everything else except the owner may change as the card moves
//! around the field.

use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::definition::CardCode;
use crate::core::{PlayerId, Uid};
use crate::zones::{Position, Zone};

/// A card instance in a duel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique id for this instance.
    pub uid: Uid,

    /// Catalog code. `0` when the identity is unknown even to the server.
    pub code: CardCode,

    /// Seat that brought the card to the duel.
    pub owner: PlayerId,

    /// Seat whose side of the field the card is on.
    pub controller: PlayerId,

    /// Current zone.
    pub zone: Zone,

    /// Order within the zone.
    pub index: u32,

    /// Position in an overlay stack. `0` when not attached.
    pub overlay_index: u32,

    /// Orientation.
    pub position: Position,

    /// Counters on the card.
    pub counters: u32,

    /// Catalog attributes copied at creation. Not serialized: the catalog
    /// can always derive them from the code.
    #[serde(skip)]
    pub attributes: Attributes,
}

impl Card {
    /// Create a card owned and controlled by `owner`.
    #[must_use]
    pub fn new(uid: Uid, code: CardCode, owner: PlayerId, zone: Zone, index: u32) -> Self {
        Self {
            uid,
            code,
            owner,
            controller: owner,
            zone,
            index,
            overlay_index: 0,
            position: Position::FaceDown,
            counters: 0,
            attributes: Attributes::default(),
        }
    }

    /// Set the position (builder pattern).
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the catalog attributes (builder pattern).
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn is_face_down(&self) -> bool {
        self.position.is_face_down()
    }

    /// Is this card attached to another as overlay material?
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.overlay_index != 0
    }

    /// Compare the fields an observer can see.
    ///
    /// Attributes are excluded: they are fixed by the code.
    #[must_use]
    pub fn observably_equal(&self, other: &Card) -> bool {
        self.uid == other.uid
            && self.code == other.code
            && self.owner == other.owner
            && self.controller == other.controller
            && self.zone == other.zone
            && self.index == other.index
            && self.overlay_index == other.overlay_index
            && self.position == other.position
            && self.counters == other.counters
    }
}
