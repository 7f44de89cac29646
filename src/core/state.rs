//! Turn, phase and life totals.
//!
//! `GameState` is the public, non-card half of a duel. Every view
//! notification carries a copy of it, so chat logs use `im` vectors to
//! keep that copy O(1).
//!
//! The engine never enforces rules on these values: phases are whatever
//! integers the caller advances to, and life totals may go negative without
//! ending the duel.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};

/// Opaque phase number. The caller decides what each value means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseId(pub i32);

impl PhaseId {
    /// Create a new phase ID.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }
}

/// One line of chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub speaker: String,
    pub message: String,
}

impl ChatLine {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
        }
    }
}

/// Public game progression state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Total turns taken so far (starts at 0).
    pub turn: u32,

    /// Seat whose turn it is.
    pub active_player: PlayerId,

    /// Current phase.
    pub phase: PhaseId,

    /// Life totals.
    pub lifepoints: PlayerMap<i64>,

    /// Chat between the duelists, including server messages.
    pub duelist_chat: Vector<ChatLine>,

    /// Chat between spectators.
    pub spectator_chat: Vector<ChatLine>,
}

impl GameState {
    /// Fresh state with both life totals at `starting_lifepoints`.
    #[must_use]
    pub fn new(starting_lifepoints: i64) -> Self {
        Self {
            turn: 0,
            active_player: PlayerId::new(0),
            phase: PhaseId::default(),
            lifepoints: PlayerMap::with_value(starting_lifepoints),
            duelist_chat: Vector::new(),
            spectator_chat: Vector::new(),
        }
    }

    /// Set the phase.
    pub fn set_phase(&mut self, phase: PhaseId) {
        self.phase = phase;
    }

    /// Start the next turn: bump the counter, reset the phase and hand the
    /// turn to the other seat.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
        self.phase = PhaseId::default();
        self.flip_active_player();
    }

    /// Hand the turn to the other seat without starting a new turn.
    pub fn flip_active_player(&mut self) {
        self.active_player = self.active_player.opponent();
    }

    /// Apply a signed lifepoint delta. Returns the new total.
    pub fn change_lifepoints(&mut self, player: PlayerId, delta: i64) -> i64 {
        let total = &mut self.lifepoints[player];
        *total += delta;
        *total
    }

    /// Append a line to the duelist chat.
    pub fn record_duelist_chat(&mut self, line: ChatLine) {
        self.duelist_chat.push_back(line);
    }

    /// Append a line to the spectator chat.
    pub fn record_spectator_chat(&mut self, line: ChatLine) {
        self.spectator_chat.push_back(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(8000);

        assert_eq!(state.turn, 0);
        assert_eq!(state.active_player, PlayerId::new(0));
        assert_eq!(state.phase, PhaseId::new(0));
        assert_eq!(state.lifepoints[PlayerId::new(0)], 8000);
        assert_eq!(state.lifepoints[PlayerId::new(1)], 8000);
    }

    #[test]
    fn test_advance_turn() {
        let mut state = GameState::new(8000);
        state.set_phase(PhaseId::new(3));

        state.advance_turn();

        assert_eq!(state.turn, 1);
        assert_eq!(state.phase, PhaseId::new(0));
        assert_eq!(state.active_player, PlayerId::new(1));

        state.advance_turn();
        assert_eq!(state.turn, 2);
        assert_eq!(state.active_player, PlayerId::new(0));
    }

    #[test]
    fn test_flip_active_player_keeps_turn() {
        let mut state = GameState::new(8000);
        state.flip_active_player();
        assert_eq!(state.turn, 0);
        assert_eq!(state.active_player, PlayerId::new(1));
    }

    #[test]
    fn test_lifepoints_have_no_floor() {
        let mut state = GameState::new(1000);

        assert_eq!(state.change_lifepoints(PlayerId::new(0), -3000), -2000);
        assert_eq!(state.change_lifepoints(PlayerId::new(1), 500), 1500);
    }

    #[test]
    fn test_phase_is_unchecked() {
        let mut state = GameState::new(8000);
        state.set_phase(PhaseId::new(-4));
        assert_eq!(state.phase, PhaseId::new(-4));
    }

    #[test]
    fn test_chat_is_append_only() {
        let mut state = GameState::new(8000);
        state.record_duelist_chat(ChatLine::new("Server", "a"));
        state.record_duelist_chat(ChatLine::new("Yugi", "b"));
        state.record_spectator_chat(ChatLine::new("Joey", "c"));

        assert_eq!(state.duelist_chat.len(), 2);
        assert_eq!(state.duelist_chat[1].speaker, "Yugi");
        assert_eq!(state.spectator_chat.len(), 1);
    }
}
