//! Duel lifecycle: starting a round, side decking, rematches.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{Duel, SERVER};
use crate::cards::{Attributes, CardCode};
use crate::core::{ChatLine, DuelError, GameState, PlayerId, Slot};
use crate::view::DuelAction;
use crate::zones::{Position, Zone};

/// The cards a seat brings to a round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decklist {
    pub main: Vec<CardCode>,
    pub extra: Vec<CardCode>,
    pub side: Vec<CardCode>,
}

impl Decklist {
    /// A decklist with only a main deck.
    #[must_use]
    pub fn new(main: Vec<CardCode>) -> Self {
        Self {
            main,
            ..Self::default()
        }
    }

    /// Set the extra deck (builder pattern).
    #[must_use]
    pub fn with_extra(mut self, extra: Vec<CardCode>) -> Self {
        self.extra = extra;
        self
    }

    /// Set the side deck (builder pattern).
    #[must_use]
    pub fn with_side(mut self, side: Vec<CardCode>) -> Self {
        self.side = side;
        self
    }

    /// Every code across main, extra and side, sorted.
    #[must_use]
    pub fn all_codes(&self) -> Vec<CardCode> {
        let mut codes: Vec<CardCode> = self
            .main
            .iter()
            .chain(&self.extra)
            .chain(&self.side)
            .copied()
            .collect();
        codes.sort_unstable();
        codes
    }

    /// Could this decklist have been made by siding `previous`?
    #[must_use]
    pub fn is_sided_from(&self, previous: &Decklist) -> bool {
        self.all_codes() == previous.all_codes()
    }
}

impl Duel {
    /// Start a round.
    ///
    /// Resets the state and stack, shuffles the main decks unless configured
    /// otherwise, lays out DECK and EXTRA face-down, tells each seat which
    /// side it sits on and sends the `start` view. After side decking, each
    /// decklist must hold the same cards as in the previous round.
    pub fn start_duel(&mut self, decks: [Decklist; 2]) -> Result<(), DuelError> {
        if let Some(previous) = &self.siding_from {
            for (seat, (deck, prev)) in decks.iter().zip(previous.iter()).enumerate() {
                if !deck.is_sided_from(prev) {
                    return Err(DuelError::SideDeckMismatch {
                        player: PlayerId::new(seat as u8),
                    });
                }
            }
        }
        self.siding_from = None;

        // chat survives rounds
        let duelist_chat = std::mem::take(&mut self.state.duelist_chat);
        let spectator_chat = std::mem::take(&mut self.state.spectator_chat);
        self.state = GameState::new(self.config.starting_lifepoints);
        self.state.duelist_chat = duelist_chat;
        self.state.spectator_chat = spectator_chat;
        self.stack.clear();
        self.questions.clear();
        self.rps = None;
        self.baseline = None;

        for (seat, deck) in decks.iter().enumerate() {
            let player = PlayerId::new(seat as u8);
            let mut main = deck.main.clone();
            if self.config.shuffle_on_start {
                self.rng.shuffle(&mut main);
            }
            for (index, &code) in main.iter().enumerate() {
                self.spawn_face_down(player, code, Zone::Deck, index as u32);
            }
            for (index, &code) in deck.extra.iter().enumerate() {
                self.spawn_face_down(player, code, Zone::Extra, index as u32);
            }
        }

        info!(
            duel = %self.id,
            main = ?decks.iter().map(|d| d.main.len()).collect::<Vec<_>>(),
            extra = ?decks.iter().map(|d| d.extra.len()).collect::<Vec<_>>(),
            "duel started"
        );
        self.round = Some(decks);

        for player in PlayerId::all() {
            self.announce(
                Slot::Player(player),
                json!({ "command": "MSG_ORIENTATION", "slot": player.0 }),
            );
        }
        self.emit_view(DuelAction::Start);
        Ok(())
    }

    fn spawn_face_down(&mut self, player: PlayerId, code: CardCode, zone: Zone, index: u32) {
        let attributes = self
            .catalog
            .lookup(code)
            .map(|d| d.attributes.clone())
            .unwrap_or_else(Attributes::default);
        self.stack
            .spawn_with(code, player, zone, index, Position::FaceDown, attributes);
    }

    /// Put the round away so both seats can side deck.
    ///
    /// The next [`start_duel`](Self::start_duel) must present decklists with
    /// the same cards as this round.
    pub fn start_side_decking(&mut self) -> Result<(), DuelError> {
        let round = self.round.take().ok_or(DuelError::NoPreviousRound)?;
        self.siding_from = Some(round);
        self.stack.clear();
        self.questions.clear();
        self.rps = None;
        self.baseline = None;
        info!(duel = %self.id, "side decking started");
        Ok(())
    }

    /// Start again with the previous round's decklists.
    pub fn rematch(&mut self) -> Result<(), DuelError> {
        let decks = self
            .round
            .clone()
            .or_else(|| self.siding_from.clone())
            .ok_or(DuelError::NoPreviousRound)?;
        self.siding_from = None;
        self.state
            .record_duelist_chat(ChatLine::new(SERVER, "Rematch started"));
        info!(duel = %self.id, "rematch");
        self.start_duel(decks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(raw: &[u32]) -> Vec<CardCode> {
        raw.iter().copied().map(CardCode::new).collect()
    }

    #[test]
    fn test_sided_decklist() {
        let previous = Decklist::new(codes(&[1, 2, 3])).with_side(codes(&[4]));

        let sided = Decklist::new(codes(&[1, 4, 3])).with_side(codes(&[2]));
        assert!(sided.is_sided_from(&previous));

        let cheated = Decklist::new(codes(&[1, 4, 3])).with_side(codes(&[5]));
        assert!(!cheated.is_sided_from(&previous));
    }

    #[test]
    fn test_moving_between_main_and_extra_counts_as_siding() {
        let previous = Decklist::new(codes(&[1, 2])).with_extra(codes(&[9]));
        let sided = Decklist::new(codes(&[1])).with_extra(codes(&[9])).with_side(codes(&[2]));
        assert!(sided.is_sided_from(&previous));
    }

    #[test]
    fn test_decklist_json_defaults() {
        let deck: Decklist = serde_json::from_str(r#"{ "main": [1, 2] }"#).unwrap();
        assert_eq!(deck.main, codes(&[1, 2]));
        assert!(deck.extra.is_empty());
        assert!(deck.side.is_empty());
    }
}
