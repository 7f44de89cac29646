//! Reveals (everyone sees) and pile views (one slot looks).
//!
//! Neither changes the field, so neither sends a field view. Reveals turn
//! every card face-up for the audience; views follow the owner/opponent
//! visibility of the pile, except that a seat looking through its own deck
//! or extra deck sees everything.

use super::{seated, Duel};
use crate::cards::Card;
use crate::core::{Audience, DuelError, PlayerId, Slot};
use crate::view::{zone_visibility, CardView, Notification, Perspective, RevealReason, Visibility};
use crate::zones::Zone;

impl Duel {
    fn send_reveal(&mut self, player: PlayerId, reason: RevealReason, cards: Vec<CardView>) {
        self.notify(Notification::Reveal {
            audience: Audience::All,
            player,
            reason,
            cards,
        });
    }

    fn send_view(&mut self, requester: Slot, player: PlayerId, cards: Vec<CardView>) {
        self.notify(Notification::Reveal {
            audience: Audience::Slot(requester),
            player,
            reason: RevealReason::View,
            cards,
        });
    }

    fn revealed(cards: &[&Card]) -> Vec<CardView> {
        cards.iter().map(|c| CardView::revealed(c)).collect()
    }

    fn top_or_bottom(&mut self, player: PlayerId, reason: RevealReason) -> Result<(), DuelError> {
        let player = seated(player)?;
        let deck = self.stack.zone(player, Zone::Deck);
        let card = match reason {
            RevealReason::Bottom => deck.first(),
            _ => deck.last(),
        };
        let Some(card) = card else {
            return Err(DuelError::NotEnoughCards {
                player,
                zone: Zone::Deck,
                requested: 1,
                available: 0,
            });
        };
        let cards = vec![CardView::revealed(card)];
        self.send_reveal(player, reason, cards);
        Ok(())
    }

    /// Show everyone the top card of a deck.
    pub fn reveal_top(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.top_or_bottom(player, RevealReason::Top)
    }

    /// Show everyone the bottom card of a deck.
    pub fn reveal_bottom(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.top_or_bottom(player, RevealReason::Bottom)
    }

    /// Show everyone a whole deck, top card first.
    pub fn reveal_deck(&mut self, player: PlayerId) -> Result<(), DuelError> {
        let player = seated(player)?;
        let mut deck = self.stack.zone(player, Zone::Deck);
        deck.reverse();
        let cards = Self::revealed(&deck);
        self.send_reveal(player, RevealReason::Deck, cards);
        Ok(())
    }

    pub fn reveal_extra(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.reveal_zone(player, Zone::Extra, RevealReason::Extra)
    }

    pub fn reveal_excavated(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.reveal_zone(player, Zone::Excavated, RevealReason::Excavated)
    }

    pub fn reveal_hand(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.reveal_zone(player, Zone::Hand, RevealReason::Hand)
    }

    fn reveal_zone(
        &mut self,
        player: PlayerId,
        zone: Zone,
        reason: RevealReason,
    ) -> Result<(), DuelError> {
        let player = seated(player)?;
        let cards = Self::revealed(&self.stack.zone(player, zone));
        self.send_reveal(player, reason, cards);
        Ok(())
    }

    fn viewing_line(&mut self, requester: Slot, player: PlayerId, pile: &str) {
        let line = match requester {
            Slot::Player(p) if p == player => {
                format!("{} is viewing their {pile}.", self.display_name(player))
            }
            Slot::Player(p) => format!(
                "{} is viewing {}'s {pile}.",
                self.display_name(p),
                self.display_name(player)
            ),
            Slot::Spectator => {
                format!("A spectator is viewing {}'s {pile}.", self.display_name(player))
            }
        };
        self.server_say(line);
    }

    /// Look through a graveyard, top card first. Face-up cards are public;
    /// face-down ones stay hidden from anyone but the owner.
    pub fn view_graveyard(&mut self, player: PlayerId, requester: Slot) -> Result<(), DuelError> {
        let player = seated(player)?;
        self.viewing_line(requester, player, "graveyard");
        let visibility = zone_visibility(Zone::Grave, Perspective::of(requester, player));
        let cards = self
            .stack
            .zone(player, Zone::Grave)
            .into_iter()
            .rev()
            .map(|c| CardView::under(c, visibility))
            .collect();
        self.send_view(requester, player, cards);
        Ok(())
    }

    /// Look through a banished pile, top card first. Face-down cards stay
    /// hidden from anyone but the owner.
    pub fn view_banished(&mut self, player: PlayerId, requester: Slot) -> Result<(), DuelError> {
        let player = seated(player)?;
        self.viewing_line(requester, player, "banished pile");
        let visibility = zone_visibility(Zone::Banished, Perspective::of(requester, player));
        let cards = self
            .stack
            .zone(player, Zone::Banished)
            .into_iter()
            .rev()
            .map(|c| CardView::under(c, visibility))
            .collect();
        self.send_view(requester, player, cards);
        Ok(())
    }

    /// A seat looks through its own deck, top card first.
    pub fn view_deck(&mut self, player: PlayerId) -> Result<(), DuelError> {
        let player = seated(player)?;
        self.viewing_line(Slot::Player(player), player, "deck");
        let cards = self
            .stack
            .zone(player, Zone::Deck)
            .into_iter()
            .rev()
            .map(CardView::open)
            .collect();
        self.send_view(Slot::Player(player), player, cards);
        Ok(())
    }

    /// A seat looks through its own extra deck.
    pub fn view_extra(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.view_own(player, Zone::Extra, "extra deck")
    }

    /// A seat looks through its own excavated pile.
    pub fn view_excavated(&mut self, player: PlayerId) -> Result<(), DuelError> {
        self.view_own(player, Zone::Excavated, "excavated pile")
    }

    fn view_own(&mut self, player: PlayerId, zone: Zone, pile: &str) -> Result<(), DuelError> {
        let player = seated(player)?;
        self.viewing_line(Slot::Player(player), player, pile);
        let cards = self.stack.zone(player, zone).into_iter().map(CardView::open).collect();
        self.send_view(Slot::Player(player), player, cards);
        Ok(())
    }

    /// Look at a monster and the overlay materials attached to it.
    pub fn view_overlay(
        &mut self,
        requester: Slot,
        player: PlayerId,
        index: u32,
    ) -> Result<(), DuelError> {
        let player = seated(player)?;
        let visibility = match Perspective::of(requester, player) {
            Perspective::Owner => Visibility::Open,
            Perspective::Opponent => Visibility::MaskFaceDown,
        };
        let cards = self
            .stack
            .zone(player, Zone::MonsterZone)
            .into_iter()
            .filter(|c| c.index == index)
            .map(|c| CardView::under(c, visibility))
            .collect();
        self.send_view(requester, player, cards);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardCode, CardRegistry};
    use crate::core::DuelConfig;
    use crate::duel::Decklist;
    use crate::view::Recorder;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn duel() -> (Duel, Recorder) {
        let recorder = Recorder::new();
        let mut duel = Duel::new(DuelConfig::new().without_shuffle(), Arc::new(CardRegistry::new()))
            .with_sink(recorder.clone());
        let deck =
            Decklist::new((1..=5).map(CardCode::new).collect()).with_extra(vec![CardCode::new(50)]);
        duel.start_duel([deck.clone(), deck]).unwrap();
        recorder.take();
        (duel, recorder)
    }

    fn last_reveal(recorder: &Recorder) -> (Audience, RevealReason, Vec<u32>) {
        match recorder.last() {
            Some(Notification::Reveal {
                audience, reason, cards, ..
            }) => (audience, reason, cards.iter().map(|c| c.code.raw()).collect()),
            other => panic!("expected a reveal, got {other:?}"),
        }
    }

    #[test]
    fn test_reveal_top_and_bottom() {
        let (mut duel, recorder) = duel();

        duel.reveal_top(P0).unwrap();
        assert_eq!(last_reveal(&recorder), (Audience::All, RevealReason::Top, vec![5]));

        duel.reveal_bottom(P0).unwrap();
        assert_eq!(last_reveal(&recorder), (Audience::All, RevealReason::Bottom, vec![1]));
    }

    #[test]
    fn test_reveal_forces_face_up() {
        let (mut duel, recorder) = duel();

        duel.reveal_extra(P1).unwrap();

        match recorder.last() {
            Some(Notification::Reveal { cards, .. }) => {
                assert_eq!(cards.len(), 1);
                assert_eq!(cards[0].position, crate::zones::Position::FaceUp);
                assert_eq!(cards[0].code, CardCode::new(50));
            }
            other => panic!("expected a reveal, got {other:?}"),
        }
    }

    #[test]
    fn test_reveal_deck_top_first() {
        let (mut duel, recorder) = duel();
        duel.reveal_deck(P0).unwrap();
        assert_eq!(last_reveal(&recorder).2, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_reveal_empty_deck_fails() {
        let (mut duel, recorder) = duel();
        duel.mill(P0, 5).unwrap();
        recorder.take();

        assert!(matches!(duel.reveal_top(P0), Err(DuelError::NotEnoughCards { .. })));
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_view_deck_goes_to_owner_only() {
        let (mut duel, recorder) = duel();

        duel.view_deck(P1).unwrap();

        let (audience, reason, codes) = last_reveal(&recorder);
        assert_eq!(audience, Audience::seat(P1));
        assert_eq!(reason, RevealReason::View);
        assert_eq!(codes, vec![5, 4, 3, 2, 1]);
        assert!(duel
            .state()
            .duelist_chat
            .iter()
            .any(|l| l.message == "Player 1 is viewing their deck."));
    }

    #[test]
    fn test_opponent_view_of_banished_masks_face_down() {
        let (mut duel, recorder) = duel();
        duel.banish_from_deck(P0, 1).unwrap();
        duel.banish_from_deck_face_down(P0, 1).unwrap();

        duel.view_banished(P0, Slot::Player(P1)).unwrap();
        let (_, _, codes) = last_reveal(&recorder);
        assert_eq!(codes, vec![0, 5]);

        duel.view_banished(P0, Slot::Player(P0)).unwrap();
        let (_, _, codes) = last_reveal(&recorder);
        assert_eq!(codes, vec![4, 5]);
    }
}
