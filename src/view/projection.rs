//! Per-observer field projection.
//!
//! Every observer sees the same stack through a visibility policy. The
//! policy is a table keyed by zone and by whether the observer owns the
//! side being projected; one projection routine applies it to any zone.
//!
//! | zone        | owner          | opponent/spectator |
//! |-------------|----------------|--------------------|
//! | DECK        | mask face-down | mask face-down     |
//! | HAND        | open           | conceal            |
//! | GRAVE       | open           | mask face-down     |
//! | EXTRA       | mask face-down | mask face-down     |
//! | BANISHED    | open           | mask face-down     |
//! | SPELLZONE   | open           | mask face-down     |
//! | MONSTERZONE | open           | mask face-down     |
//! | EXCAVATED   | open           | mask face-down     |
//! | INMATERIAL  | open           | mask face-down     |

use std::collections::BTreeMap;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardCode};
use crate::core::{PlayerId, Slot, Uid};
use crate::zones::{CardStack, Position, Zone};

/// How the observer relates to the side being projected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Perspective {
    Owner,
    Opponent,
}

impl Perspective {
    /// Perspective of `slot` on `side`.
    #[must_use]
    pub fn of(slot: Slot, side: PlayerId) -> Self {
        match slot {
            Slot::Player(p) if p == side => Perspective::Owner,
            _ => Perspective::Opponent,
        }
    }
}

/// What an observer may learn about the cards of a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Everything.
    Open,
    /// Face-down cards lose code, counters and owner.
    MaskFaceDown,
    /// Every card is turned face-down, then masked.
    Conceal,
}

/// The visibility table.
#[must_use]
pub const fn zone_visibility(zone: Zone, perspective: Perspective) -> Visibility {
    use Visibility::*;
    match (zone, perspective) {
        (Zone::Deck | Zone::Extra, _) => MaskFaceDown,
        (Zone::Hand, Perspective::Owner) => Open,
        (Zone::Hand, Perspective::Opponent) => Conceal,
        (_, Perspective::Owner) => Open,
        (_, Perspective::Opponent) => MaskFaceDown,
    }
}

/// A card as one observer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub uid: Uid,
    pub code: CardCode,
    /// Stripped from masked cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<PlayerId>,
    pub controller: PlayerId,
    pub zone: Zone,
    pub index: u32,
    pub overlay_index: u32,
    pub position: Position,
    pub counters: u32,
}

impl CardView {
    /// Unmasked view of a card.
    #[must_use]
    pub fn open(card: &Card) -> Self {
        Self {
            uid: card.uid,
            code: card.code,
            owner: Some(card.owner),
            controller: card.controller,
            zone: card.zone,
            index: card.index,
            overlay_index: card.overlay_index,
            position: card.position,
            counters: card.counters,
        }
    }

    /// View of a card under a visibility rule.
    #[must_use]
    pub fn under(card: &Card, visibility: Visibility) -> Self {
        let mut view = Self::open(card);
        match visibility {
            Visibility::Open => {}
            Visibility::MaskFaceDown => {
                if card.is_face_down() {
                    view.mask();
                }
            }
            Visibility::Conceal => {
                view.position = Position::FaceDown;
                view.mask();
            }
        }
        view
    }

    /// The card turned face-up for a reveal.
    #[must_use]
    pub fn revealed(card: &Card) -> Self {
        let mut view = Self::open(card);
        view.position = Position::FaceUp;
        view
    }

    fn mask(&mut self) {
        self.code = CardCode::HIDDEN;
        self.counters = 0;
        self.owner = None;
    }

    #[must_use]
    pub fn is_masked(&self) -> bool {
        self.code.is_hidden() && self.owner.is_none()
    }
}

/// One side of the field: zone → cards sorted by index.
pub type PlayerField = BTreeMap<Zone, Vec<CardView>>;

/// Both sides as one observer sees them, seat 0 first.
pub type FieldView = [PlayerField; 2];

/// Zone cardinalities of one side.
pub type ZoneCounts = BTreeMap<Zone, usize>;

/// Projects a stack for observers.
///
/// With a baseline set, only cards whose observable fields differ from the
/// baseline are included.
#[derive(Clone, Copy, Debug)]
pub struct Projector<'a> {
    stack: &'a CardStack,
    baseline: Option<&'a Vector<Card>>,
}

impl<'a> Projector<'a> {
    #[must_use]
    pub fn new(stack: &'a CardStack) -> Self {
        Self { stack, baseline: None }
    }

    /// Only project cards changed since `baseline` (builder pattern).
    #[must_use]
    pub fn edited_since(mut self, baseline: &'a Vector<Card>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    fn changed(&self, card: &Card) -> bool {
        let Some(baseline) = self.baseline else {
            return true;
        };
        // uids are allocated densely from 0, so a uid is also its position
        match baseline.get(card.uid.raw() as usize) {
            Some(previous) if previous.uid == card.uid => !previous.observably_equal(card),
            _ => baseline
                .iter()
                .find(|c| c.uid == card.uid)
                .map_or(true, |previous| !previous.observably_equal(card)),
        }
    }

    /// One zone of one side, projected.
    #[must_use]
    pub fn zone(&self, side: PlayerId, zone: Zone, perspective: Perspective) -> Vec<CardView> {
        let visibility = zone_visibility(zone, perspective);
        self.stack
            .zone(side, zone)
            .into_iter()
            .filter(|c| zone != Zone::Extra || !c.is_attached())
            .filter(|c| self.changed(c))
            .map(|c| CardView::under(c, visibility))
            .collect()
    }

    /// Every zone of one side.
    #[must_use]
    pub fn side(&self, side: PlayerId, perspective: Perspective) -> PlayerField {
        Zone::ALL
            .iter()
            .map(|&zone| (zone, self.zone(side, zone, perspective)))
            .collect()
    }

    /// The whole field as `slot` sees it.
    #[must_use]
    pub fn field_for(&self, slot: Slot) -> FieldView {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        [
            self.side(p0, Perspective::of(slot, p0)),
            self.side(p1, Perspective::of(slot, p1)),
        ]
    }

    /// Cardinalities of every displayable zone. EXTRA counts unattached
    /// cards only.
    #[must_use]
    pub fn counts(&self, side: PlayerId) -> ZoneCounts {
        Zone::ALL
            .iter()
            .filter(|z| z.is_displayable())
            .map(|&zone| {
                let count = self
                    .stack
                    .zone(side, zone)
                    .iter()
                    .filter(|c| zone != Zone::Extra || !c.is_attached())
                    .count();
                (zone, count)
            })
            .collect()
    }

    /// Unmasked projection of every displayable zone, for server-side
    /// synchronisation. Ignores the baseline.
    #[must_use]
    pub fn update_view(&self, side: PlayerId) -> PlayerField {
        Zone::ALL
            .iter()
            .filter(|z| z.is_displayable())
            .map(|&zone| {
                let cards = self
                    .stack
                    .zone(side, zone)
                    .into_iter()
                    .filter(|c| zone != Zone::Extra || !c.is_attached())
                    .map(CardView::open)
                    .collect();
                (zone, cards)
            })
            .collect()
    }
}
