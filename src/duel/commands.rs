//! Client commands as data.
//!
//! Hosts that speak JSON decode a [`DuelCommand`] and hand it to
//! [`Duel::apply`]; every variant maps onto one public method.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnswerOutcome, CoinFace, Decklist, Duel};
use crate::cards::CardCode;
use crate::core::{DuelError, PhaseId, PlayerId, Slot, Uid};
use crate::questions::{Prompt, QuestionToken};
use crate::rules::MoveRequest;
use crate::view::DuelAction;
use crate::zones::{Position, Zone};

/// One request from a client.
///
/// ```
/// use duel_field::duel::DuelCommand;
///
/// let json = r#"{ "command": "draw", "player": 0, "count": 2 }"#;
/// let cmd: DuelCommand = serde_json::from_str(json).unwrap();
/// assert!(matches!(cmd, DuelCommand::Draw { count: 2, .. }));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DuelCommand {
    Start { decks: [Decklist; 2] },
    SetName { player: PlayerId, name: String },
    Move { request: MoveRequest },
    Draw { player: PlayerId, count: usize },
    Mill { player: PlayerId, count: usize },
    Banish { player: PlayerId, count: usize },
    BanishFaceDown { player: PlayerId, count: usize },
    Excavate { player: PlayerId, count: usize },
    CreateCard {
        player: PlayerId,
        code: CardCode,
        zone: Zone,
        index: u32,
        #[serde(default)]
        position: Position,
    },
    RemoveCard { uid: Uid },
    AddCounter { uid: Uid },
    RemoveCounter { uid: Uid },
    ChangeLifepoints { player: PlayerId, amount: i64 },
    AdvancePhase { phase: PhaseId },
    AdvanceTurn,
    SetTurnPlayer,
    Chat { speaker: String, message: String },
    SpectatorChat { speaker: String, message: String },
    ShuffleDeck { player: PlayerId },
    ShuffleHand { player: PlayerId },
    FlipDeck { player: PlayerId },
    RollDie { player: PlayerId },
    FlipCoin { player: PlayerId },
    Surrender { player: PlayerId },
    RevealTop { player: PlayerId },
    RevealBottom { player: PlayerId },
    RevealDeck { player: PlayerId },
    RevealExtra { player: PlayerId },
    RevealExcavated { player: PlayerId },
    RevealHand { player: PlayerId },
    ViewGraveyard { player: PlayerId, requester: Slot },
    ViewBanished { player: PlayerId, requester: Slot },
    ViewDeck { player: PlayerId },
    ViewExtra { player: PlayerId },
    ViewExcavated { player: PlayerId },
    ViewOverlay { requester: Slot, player: PlayerId, index: u32 },
    Ask { prompt: Prompt },
    Answer { token: QuestionToken, answer: Vec<i64> },
    ReplayQuestion,
    CancelQuestion { token: QuestionToken },
    /// Decide who goes first. The winner becomes the turn player.
    RockPaperScissors,
    StartSideDecking,
    Rematch,
    Announce { slot: Slot, message: serde_json::Value },
}

impl DuelCommand {
    /// Snake-case name, as it appears in the `command` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DuelCommand::Start { .. } => "start",
            DuelCommand::SetName { .. } => "set_name",
            DuelCommand::Move { .. } => "move",
            DuelCommand::Draw { .. } => "draw",
            DuelCommand::Mill { .. } => "mill",
            DuelCommand::Banish { .. } => "banish",
            DuelCommand::BanishFaceDown { .. } => "banish_face_down",
            DuelCommand::Excavate { .. } => "excavate",
            DuelCommand::CreateCard { .. } => "create_card",
            DuelCommand::RemoveCard { .. } => "remove_card",
            DuelCommand::AddCounter { .. } => "add_counter",
            DuelCommand::RemoveCounter { .. } => "remove_counter",
            DuelCommand::ChangeLifepoints { .. } => "change_lifepoints",
            DuelCommand::AdvancePhase { .. } => "advance_phase",
            DuelCommand::AdvanceTurn => "advance_turn",
            DuelCommand::SetTurnPlayer => "set_turn_player",
            DuelCommand::Chat { .. } => "chat",
            DuelCommand::SpectatorChat { .. } => "spectator_chat",
            DuelCommand::ShuffleDeck { .. } => "shuffle_deck",
            DuelCommand::ShuffleHand { .. } => "shuffle_hand",
            DuelCommand::FlipDeck { .. } => "flip_deck",
            DuelCommand::RollDie { .. } => "roll_die",
            DuelCommand::FlipCoin { .. } => "flip_coin",
            DuelCommand::Surrender { .. } => "surrender",
            DuelCommand::RevealTop { .. } => "reveal_top",
            DuelCommand::RevealBottom { .. } => "reveal_bottom",
            DuelCommand::RevealDeck { .. } => "reveal_deck",
            DuelCommand::RevealExtra { .. } => "reveal_extra",
            DuelCommand::RevealExcavated { .. } => "reveal_excavated",
            DuelCommand::RevealHand { .. } => "reveal_hand",
            DuelCommand::ViewGraveyard { .. } => "view_graveyard",
            DuelCommand::ViewBanished { .. } => "view_banished",
            DuelCommand::ViewDeck { .. } => "view_deck",
            DuelCommand::ViewExtra { .. } => "view_extra",
            DuelCommand::ViewExcavated { .. } => "view_excavated",
            DuelCommand::ViewOverlay { .. } => "view_overlay",
            DuelCommand::Ask { .. } => "ask",
            DuelCommand::Answer { .. } => "answer",
            DuelCommand::ReplayQuestion => "replay_question",
            DuelCommand::CancelQuestion { .. } => "cancel_question",
            DuelCommand::RockPaperScissors => "rock_paper_scissors",
            DuelCommand::StartSideDecking => "start_side_decking",
            DuelCommand::Rematch => "rematch",
            DuelCommand::Announce { .. } => "announce",
        }
    }
}

/// What a command produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum CommandOutcome {
    Done,
    Card(Uid),
    Cards(Vec<Uid>),
    Counters(u32),
    Lifepoints(i64),
    Rolled(u8),
    Flipped(CoinFace),
    Asked(QuestionToken),
    Answered(AnswerOutcome),
    Cancelled(bool),
}

impl Duel {
    /// Run one command.
    pub fn apply(&mut self, command: DuelCommand) -> Result<CommandOutcome, DuelError> {
        debug!(duel = %self.id, command = command.name(), "applying command");
        use CommandOutcome::{Card, Cards, Done};
        let outcome = match command {
            DuelCommand::Start { decks } => {
                self.start_duel(decks)?;
                Done
            }
            DuelCommand::SetName { player, name } => {
                self.set_name(player, name)?;
                Done
            }
            DuelCommand::Move { request } => Card(self.submit_move(&request)?),
            DuelCommand::Draw { player, count } => Cards(self.draw(player, count)?),
            DuelCommand::Mill { player, count } => Cards(self.mill(player, count)?),
            DuelCommand::Banish { player, count } => Cards(self.banish_from_deck(player, count)?),
            DuelCommand::BanishFaceDown { player, count } => {
                Cards(self.banish_from_deck_face_down(player, count)?)
            }
            DuelCommand::Excavate { player, count } => Cards(self.excavate(player, count)?),
            DuelCommand::CreateCard {
                player,
                code,
                zone,
                index,
                position,
            } => Card(self.create_card(player, code, zone, index, position)?),
            DuelCommand::RemoveCard { uid } => {
                self.remove_card(uid)?;
                Done
            }
            DuelCommand::AddCounter { uid } => CommandOutcome::Counters(self.add_counter(uid)?),
            DuelCommand::RemoveCounter { uid } => {
                CommandOutcome::Counters(self.remove_counter(uid)?)
            }
            DuelCommand::ChangeLifepoints { player, amount } => {
                CommandOutcome::Lifepoints(self.change_lifepoints(player, amount)?)
            }
            DuelCommand::AdvancePhase { phase } => {
                self.advance_phase(phase);
                Done
            }
            DuelCommand::AdvanceTurn => {
                self.advance_turn();
                Done
            }
            DuelCommand::SetTurnPlayer => {
                self.set_turn_player();
                Done
            }
            DuelCommand::Chat { speaker, message } => {
                self.duelist_chat(speaker, message);
                Done
            }
            DuelCommand::SpectatorChat { speaker, message } => {
                self.spectator_chat(speaker, message);
                Done
            }
            DuelCommand::ShuffleDeck { player } => {
                self.shuffle_deck(player)?;
                Done
            }
            DuelCommand::ShuffleHand { player } => {
                self.shuffle_hand(player)?;
                Done
            }
            DuelCommand::FlipDeck { player } => {
                self.flip_deck(player)?;
                Done
            }
            DuelCommand::RollDie { player } => CommandOutcome::Rolled(self.roll_die(player)?),
            DuelCommand::FlipCoin { player } => CommandOutcome::Flipped(self.flip_coin(player)?),
            DuelCommand::Surrender { player } => {
                self.surrender(player)?;
                Done
            }
            DuelCommand::RevealTop { player } => self.reveal_top(player).map(|()| Done)?,
            DuelCommand::RevealBottom { player } => self.reveal_bottom(player).map(|()| Done)?,
            DuelCommand::RevealDeck { player } => self.reveal_deck(player).map(|()| Done)?,
            DuelCommand::RevealExtra { player } => self.reveal_extra(player).map(|()| Done)?,
            DuelCommand::RevealExcavated { player } => {
                self.reveal_excavated(player).map(|()| Done)?
            }
            DuelCommand::RevealHand { player } => self.reveal_hand(player).map(|()| Done)?,
            DuelCommand::ViewGraveyard { player, requester } => {
                self.view_graveyard(player, requester).map(|()| Done)?
            }
            DuelCommand::ViewBanished { player, requester } => {
                self.view_banished(player, requester).map(|()| Done)?
            }
            DuelCommand::ViewDeck { player } => self.view_deck(player).map(|()| Done)?,
            DuelCommand::ViewExtra { player } => self.view_extra(player).map(|()| Done)?,
            DuelCommand::ViewExcavated { player } => self.view_excavated(player).map(|()| Done)?,
            DuelCommand::ViewOverlay {
                requester,
                player,
                index,
            } => self.view_overlay(requester, player, index).map(|()| Done)?,
            DuelCommand::Ask { prompt } => CommandOutcome::Asked(self.ask_question(prompt)),
            DuelCommand::Answer { token, answer } => {
                CommandOutcome::Answered(self.submit_answer(token, &answer)?)
            }
            DuelCommand::ReplayQuestion => CommandOutcome::Asked(self.replay_last_question()?),
            DuelCommand::CancelQuestion { token } => {
                CommandOutcome::Cancelled(self.cancel_question(token))
            }
            DuelCommand::RockPaperScissors => {
                self.rock_paper_scissors(|duel, winner| {
                    duel.state.active_player = winner;
                    let line = format!("{} won rock-paper-scissors.", duel.display_name(winner));
                    duel.server_line(line);
                    duel.emit_view(DuelAction::Duel);
                    Ok(())
                });
                Done
            }
            DuelCommand::StartSideDecking => {
                self.start_side_decking()?;
                Done
            }
            DuelCommand::Rematch => {
                self.rematch()?;
                Done
            }
            DuelCommand::Announce { slot, message } => {
                self.announce(slot, message);
                Done
            }
        };
        Ok(outcome)
    }
}
