//! Composable card selectors.
//!
//! A `CardQuery` is a conjunction of optional filters. Unset fields match
//! anything, so `CardQuery::new()` matches every card and each builder call
//! narrows it. Queries never mutate; resolving them is
//! [`CardStack`](super::CardStack)'s job.

use serde::{Deserialize, Serialize};

use super::Zone;
use crate::cards::Card;
use crate::core::{PlayerId, Uid};

/// Card selector.
///
/// ```
/// use duel_field::core::PlayerId;
/// use duel_field::zones::{CardQuery, Zone};
///
/// let top_of_grave = CardQuery::new()
///     .player(PlayerId::new(0))
///     .zone(Zone::Grave)
///     .index(0)
///     .overlay(0);
/// assert_eq!(top_of_grave.to_string(), "player=0 zone=GRAVE index=0 overlay=0");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardQuery {
    /// Controller.
    pub player: Option<PlayerId>,
    pub zone: Option<Zone>,
    pub index: Option<u32>,
    pub overlay_index: Option<u32>,
    pub uid: Option<Uid>,
}

impl CardQuery {
    /// A query matching every card.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A query for one uid.
    #[must_use]
    pub fn by_uid(uid: Uid) -> Self {
        Self {
            uid: Some(uid),
            ..Self::default()
        }
    }

    /// A query for every card of one seat's zone.
    #[must_use]
    pub fn in_zone(player: PlayerId, zone: Zone) -> Self {
        Self::new().player(player).zone(zone)
    }

    #[must_use]
    pub fn player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    #[must_use]
    pub fn index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn overlay(mut self, overlay_index: u32) -> Self {
        self.overlay_index = Some(overlay_index);
        self
    }

    #[must_use]
    pub fn uid(mut self, uid: Uid) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Does the card pass every set filter?
    ///
    /// A set `uid` decides alone; coordinate fields are then ignored.
    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        if let Some(uid) = self.uid {
            return card.uid == uid;
        }
        self.player.map_or(true, |p| card.controller == p)
            && self.zone.map_or(true, |z| card.zone == z)
            && self.index.map_or(true, |i| card.index == i)
            && self.overlay_index.map_or(true, |o| card.overlay_index == o)
    }
}

impl std::fmt::Display for CardQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(uid) = self.uid {
            parts.push(format!("uid={}", uid.raw()));
        }
        if let Some(player) = self.player {
            parts.push(format!("player={}", player.0));
        }
        if let Some(zone) = self.zone {
            parts.push(format!("zone={zone}"));
        }
        if let Some(index) = self.index {
            parts.push(format!("index={index}"));
        }
        if let Some(overlay) = self.overlay_index {
            parts.push(format!("overlay={overlay}"));
        }
        if parts.is_empty() {
            f.write_str("any card")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}
