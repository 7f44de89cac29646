//! The card stack: every card of one duel in a single ordered collection.
//!
//! Cards are appended and never removed; "removal" relocates a card to
//! [`Zone::Inmaterial`]. A `uid → position` map is kept next to the
//! collection so uid lookups never scan. The backing store is an
//! `im::Vector`, which makes [`CardStack::snapshot`] a cheap structural
//! clone that the view layer keeps as its diff baseline.

use im::Vector;
use rustc_hash::FxHashMap;

use super::{CardQuery, Position, Zone};
use crate::cards::{Attributes, Card, CardCode};
use crate::core::{DuelError, PlayerId, Uid};

/// Ordered store of card instances.
///
/// ## Usage
///
/// ```
/// use duel_field::cards::CardCode;
/// use duel_field::core::PlayerId;
/// use duel_field::zones::{CardQuery, CardStack, Position, Zone};
///
/// let mut stack = CardStack::new();
/// let p0 = PlayerId::new(0);
///
/// stack.spawn(CardCode::new(1), p0, Zone::Deck, 0, Position::FaceDown);
/// let top = stack.spawn(CardCode::new(2), p0, Zone::Deck, 1, Position::FaceDown);
///
/// assert_eq!(stack.top_of_deck(p0, 1), vec![top]);
/// assert_eq!(stack.select(&CardQuery::in_zone(p0, Zone::Deck)).len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardStack {
    cards: Vector<Card>,

    /// uid -> position in `cards`
    positions: FxHashMap<Uid, usize>,

    next_uid: Uid,
}

impl CardStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new card and return its freshly allocated uid.
    pub fn spawn(
        &mut self,
        code: CardCode,
        owner: PlayerId,
        zone: Zone,
        index: u32,
        position: Position,
    ) -> Uid {
        self.spawn_with(code, owner, zone, index, position, Attributes::default())
    }

    /// Append a new card carrying catalog attributes.
    pub fn spawn_with(
        &mut self,
        code: CardCode,
        owner: PlayerId,
        zone: Zone,
        index: u32,
        position: Position,
        attributes: Attributes,
    ) -> Uid {
        let uid = self.next_uid;
        self.next_uid = uid.next();

        let card = Card::new(uid, code, owner, zone, index)
            .with_position(position)
            .with_attributes(attributes);
        self.positions.insert(uid, self.cards.len());
        self.cards.push_back(card);
        uid
    }

    #[must_use]
    pub fn get(&self, uid: Uid) -> Option<&Card> {
        let pos = *self.positions.get(&uid)?;
        self.cards.get(pos)
    }

    pub fn get_mut(&mut self, uid: Uid) -> Option<&mut Card> {
        let pos = *self.positions.get(&uid)?;
        self.cards.get_mut(pos)
    }

    /// Look up a card, failing with [`DuelError::UnknownCard`].
    pub fn card(&self, uid: Uid) -> Result<&Card, DuelError> {
        self.get(uid).ok_or(DuelError::UnknownCard(uid))
    }

    /// Iterate over every card in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Every card matching the query, sorted by zone index.
    #[must_use]
    pub fn select(&self, query: &CardQuery) -> Vec<&Card> {
        if let Some(uid) = query.uid {
            return self.get(uid).into_iter().collect();
        }
        let mut found: Vec<&Card> = self.cards.iter().filter(|c| query.matches(c)).collect();
        found.sort_by_key(|c| (c.index, c.overlay_index, c.uid));
        found
    }

    /// The single card matching the query.
    pub fn select_one(&self, query: &CardQuery) -> Result<&Card, DuelError> {
        let found = self.select(query);
        match found.as_slice() {
            [card] => Ok(*card),
            [] => Err(DuelError::NoMatch { query: *query }),
            _ => Err(DuelError::Ambiguous {
                query: *query,
                count: found.len(),
            }),
        }
    }

    /// Cards of one seat's zone, sorted by index.
    #[must_use]
    pub fn zone(&self, player: PlayerId, zone: Zone) -> Vec<&Card> {
        self.select(&CardQuery::in_zone(player, zone))
    }

    #[must_use]
    pub fn zone_len(&self, player: PlayerId, zone: Zone) -> usize {
        self.cards
            .iter()
            .filter(|c| c.controller == player && c.zone == zone)
            .count()
    }

    /// Uids of the top `count` deck cards, topmost (highest index) first.
    ///
    /// Returns fewer than `count` when the deck is short.
    #[must_use]
    pub fn top_of_deck(&self, player: PlayerId, count: usize) -> Vec<Uid> {
        self.zone(player, Zone::Deck)
            .into_iter()
            .rev()
            .take(count)
            .map(|c| c.uid)
            .collect()
    }

    /// Renumber a pile zone to `0..n`.
    ///
    /// Cards keep their relative order, except that in EXTRA face-down cards
    /// always come before face-up ones. A `pinned` card is placed at its
    /// requested index (clamped to the end) and the rest close up around it.
    /// Non-pile zones are left alone.
    pub fn reindex(&mut self, player: PlayerId, zone: Zone, pinned: Option<(Uid, u32)>) {
        if !zone.is_pile() {
            return;
        }

        let pinned_uid = pinned.map(|(uid, _)| uid);
        let mut members: Vec<(bool, u32, Uid)> = self
            .cards
            .iter()
            .filter(|c| c.controller == player && c.zone == zone && Some(c.uid) != pinned_uid)
            .map(|c| {
                let face_up_last = zone == Zone::Extra && !c.is_face_down();
                (face_up_last, c.index, c.uid)
            })
            .collect();
        members.sort();

        let mut order: Vec<Uid> = members.into_iter().map(|(_, _, uid)| uid).collect();
        if let Some((uid, requested)) = pinned {
            let belongs = self
                .get(uid)
                .is_some_and(|c| c.controller == player && c.zone == zone);
            if belongs {
                let at = (requested as usize).min(order.len());
                order.insert(at, uid);
            }
        }
        if zone == Zone::Extra {
            // stable, so a pinned card keeps its place among its own side
            let cards = &*self;
            order.sort_by_key(|uid| cards.get(*uid).is_some_and(|c| !c.is_face_down()));
        }

        for (index, uid) in order.into_iter().enumerate() {
            if let Some(card) = self.get_mut(uid) {
                card.index = index as u32;
            }
        }
    }

    /// Zero the counters of every face-down card.
    pub fn clean_counters(&mut self) {
        for card in self.cards.iter_mut() {
            if card.is_face_down() && card.counters != 0 {
                card.counters = 0;
            }
        }
    }

    /// Structural copy of the whole stack.
    #[must_use]
    pub fn snapshot(&self) -> Vector<Card> {
        self.cards.clone()
    }

    /// Deep copy as a plain `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().cloned().collect()
    }

    /// Drop every card and restart uid allocation.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.positions.clear();
        self.next_uid = Uid::default();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn stack_with_hand(n: u32) -> (CardStack, Vec<Uid>) {
        let mut stack = CardStack::new();
        let uids = (0..n)
            .map(|i| stack.spawn(CardCode::new(100 + i), P0, Zone::Hand, i, Position::FaceUp))
            .collect();
        (stack, uids)
    }

    fn indices(stack: &CardStack, player: PlayerId, zone: Zone) -> Vec<(Uid, u32)> {
        stack.zone(player, zone).iter().map(|c| (c.uid, c.index)).collect()
    }

    #[test]
    fn test_spawn_allocates_sequential_uids() {
        let (stack, uids) = stack_with_hand(3);

        assert_eq!(uids, vec![Uid(0), Uid(1), Uid(2)]);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.get(Uid(1)).map(|c| c.code), Some(CardCode::new(101)));
        assert!(stack.get(Uid(3)).is_none());
    }

    #[test]
    fn test_select_sorts_by_index() {
        let mut stack = CardStack::new();
        stack.spawn(CardCode::new(1), P0, Zone::Grave, 2, Position::FaceUp);
        stack.spawn(CardCode::new(2), P0, Zone::Grave, 0, Position::FaceUp);
        stack.spawn(CardCode::new(3), P0, Zone::Grave, 1, Position::FaceUp);

        let codes: Vec<u32> = stack.zone(P0, Zone::Grave).iter().map(|c| c.code.raw()).collect();
        assert_eq!(codes, vec![2, 3, 1]);
    }

    #[test]
    fn test_select_one_faults() {
        let (stack, _) = stack_with_hand(2);

        let err = stack.select_one(&CardQuery::in_zone(P0, Zone::Hand)).unwrap_err();
        assert!(matches!(err, DuelError::Ambiguous { count: 2, .. }));

        let err = stack.select_one(&CardQuery::in_zone(P1, Zone::Hand)).unwrap_err();
        assert!(matches!(err, DuelError::NoMatch { .. }));

        let card = stack.select_one(&CardQuery::in_zone(P0, Zone::Hand).index(1)).unwrap();
        assert_eq!(card.uid, Uid(1));
    }

    #[test]
    fn test_select_by_uid_ignores_coordinates() {
        let (stack, _) = stack_with_hand(2);

        let query = CardQuery::in_zone(P1, Zone::Deck).uid(Uid(1));
        assert_eq!(stack.select_one(&query).unwrap().uid, Uid(1));
    }

    #[test]
    fn test_top_of_deck_is_highest_index() {
        let mut stack = CardStack::new();
        for i in 0..5 {
            stack.spawn(CardCode::new(i), P0, Zone::Deck, i, Position::FaceDown);
        }

        assert_eq!(stack.top_of_deck(P0, 2), vec![Uid(4), Uid(3)]);
        assert_eq!(stack.top_of_deck(P0, 9).len(), 5);
        assert!(stack.top_of_deck(P1, 1).is_empty());
    }

    #[test]
    fn test_reindex_closes_gaps() {
        let (mut stack, _) = stack_with_hand(4);
        stack.get_mut(Uid(1)).unwrap().zone = Zone::Grave;

        stack.reindex(P0, Zone::Hand, None);

        assert_eq!(indices(&stack, P0, Zone::Hand), vec![(Uid(0), 0), (Uid(2), 1), (Uid(3), 2)]);
    }

    #[test]
    fn test_reindex_inserts_pinned_card() {
        let (mut stack, _) = stack_with_hand(3);
        let new = stack.spawn(CardCode::new(9), P0, Zone::Hand, 1, Position::FaceUp);

        stack.reindex(P0, Zone::Hand, Some((new, 1)));

        assert_eq!(
            indices(&stack, P0, Zone::Hand),
            vec![(Uid(0), 0), (new, 1), (Uid(1), 2), (Uid(2), 3)]
        );
    }

    #[test]
    fn test_reindex_clamps_pinned_index() {
        let (mut stack, _) = stack_with_hand(2);
        let new = stack.spawn(CardCode::new(9), P0, Zone::Hand, 40, Position::FaceUp);

        stack.reindex(P0, Zone::Hand, Some((new, 40)));

        assert_eq!(stack.get(new).unwrap().index, 2);
    }

    #[test]
    fn test_reindex_extra_groups_face_down_first() {
        let mut stack = CardStack::new();
        stack.spawn(CardCode::new(1), P0, Zone::Extra, 0, Position::FaceUp);
        stack.spawn(CardCode::new(2), P0, Zone::Extra, 1, Position::FaceDown);
        stack.spawn(CardCode::new(3), P0, Zone::Extra, 2, Position::FaceDown);

        stack.reindex(P0, Zone::Extra, None);

        assert_eq!(
            indices(&stack, P0, Zone::Extra),
            vec![(Uid(1), 0), (Uid(2), 1), (Uid(0), 2)]
        );
    }

    #[test]
    fn test_reindex_leaves_slot_zones_alone() {
        let mut stack = CardStack::new();
        stack.spawn(CardCode::new(1), P0, Zone::MonsterZone, 4, Position::FaceUpAttack);

        stack.reindex(P0, Zone::MonsterZone, None);

        assert_eq!(stack.get(Uid(0)).unwrap().index, 4);
    }

    #[test]
    fn test_clean_counters_only_touches_face_down() {
        let mut stack = CardStack::new();
        stack.spawn(CardCode::new(1), P0, Zone::SpellZone, 0, Position::FaceUp);
        stack.spawn(CardCode::new(2), P0, Zone::SpellZone, 1, Position::FaceDown);
        stack.get_mut(Uid(0)).unwrap().counters = 2;
        stack.get_mut(Uid(1)).unwrap().counters = 3;

        stack.clean_counters();

        assert_eq!(stack.get(Uid(0)).unwrap().counters, 2);
        assert_eq!(stack.get(Uid(1)).unwrap().counters, 0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let (mut stack, _) = stack_with_hand(2);
        let before = stack.snapshot();

        stack.get_mut(Uid(0)).unwrap().zone = Zone::Grave;

        assert_eq!(before[0].zone, Zone::Hand);
        assert_eq!(stack.get(Uid(0)).unwrap().zone, Zone::Grave);
    }

    #[test]
    fn test_clear_restarts_uids() {
        let (mut stack, _) = stack_with_hand(2);
        stack.clear();

        assert!(stack.is_empty());
        let uid = stack.spawn(CardCode::new(1), P1, Zone::Deck, 0, Position::FaceDown);
        assert_eq!(uid, Uid(0));
    }
}
