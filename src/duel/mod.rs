//! The duel: one field, two seats, any number of spectators.
//!
//! `Duel` owns the card stack, the game state and the pending questions,
//! and is the only way to mutate them. Every public mutation validates,
//! applies in full, then emits exactly one notification batch to the sink.
//! Operations take `&mut self`, so a duel is serialised by construction;
//! hosts run many duels side by side, sharing only the catalog.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use duel_field::cards::{CardCode, CardRegistry};
//! use duel_field::core::{DuelConfig, PlayerId};
//! use duel_field::duel::{Decklist, Duel};
//! use duel_field::zones::Zone;
//!
//! let deck = Decklist::new((1..=40).map(CardCode::new).collect());
//! let mut duel = Duel::new(DuelConfig::new().with_seed(1), Arc::new(CardRegistry::new()));
//! duel.start_duel([deck.clone(), deck]).unwrap();
//!
//! duel.draw(PlayerId::new(0), 5).unwrap();
//! assert_eq!(duel.stack().zone_len(PlayerId::new(0), Zone::Hand), 5);
//! ```

mod commands;
mod negotiation;
mod reveal;
mod round;

pub use commands::{CommandOutcome, DuelCommand};
pub use negotiation::{AnswerOutcome, RpsResolver};
pub use round::Decklist;

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cards::{Card, CardCatalog, CardCode};
use crate::core::{
    ChatLine, DuelConfig, DuelError, GameRng, GameState, PhaseId, PlayerId, PlayerMap, Slot, Uid,
};
use crate::questions::QuestionCoordinator;
use crate::rules::{self, MoveRequest};
use crate::view::{
    ChatChannel, DuelAction, FieldView, Notification, NotificationSink, NullSink, PlayerField,
    Projector, ViewPayload, ZoneCounts,
};
use crate::zones::{CardStack, Position, Zone};

use negotiation::RpsSession;

/// Speaker name for lines the engine posts itself.
pub const SERVER: &str = "Server";

/// Result of a coin flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinFace {
    Heads,
    Tails,
}

impl std::fmt::Display for CoinFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinFace::Heads => f.write_str("Heads"),
            CoinFace::Tails => f.write_str("Tails"),
        }
    }
}

pub(crate) fn seated(player: PlayerId) -> Result<PlayerId, DuelError> {
    if player.is_seated() {
        Ok(player)
    } else {
        Err(DuelError::UnknownPlayer(player))
    }
}

/// A single duel.
pub struct Duel {
    id: Uuid,
    config: DuelConfig,
    catalog: Arc<dyn CardCatalog>,
    sink: Box<dyn NotificationSink + Send>,
    stack: CardStack,
    state: GameState,
    names: PlayerMap<String>,
    rng: GameRng,
    questions: QuestionCoordinator<Duel>,
    rps: Option<RpsSession>,
    /// Stack as of the last emitted view.
    baseline: Option<Vector<Card>>,
    round: Option<[Decklist; 2]>,
    /// Set between `start_side_decking` and the next `start_duel`.
    siding_from: Option<[Decklist; 2]>,
}

impl Duel {
    /// Create an empty duel that discards its notifications.
    #[must_use]
    pub fn new(config: DuelConfig, catalog: Arc<dyn CardCatalog>) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            id: Uuid::new_v4(),
            state: GameState::new(config.starting_lifepoints),
            questions: QuestionCoordinator::new(config.question_ttl),
            config,
            catalog,
            sink: Box::new(NullSink),
            stack: CardStack::new(),
            names: PlayerMap::with_default(),
            rng,
            rps: None,
            baseline: None,
            round: None,
            siding_from: None,
        }
    }

    /// Deliver notifications to `sink` (builder pattern).
    #[must_use]
    pub fn with_sink(mut self, sink: impl NotificationSink + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    // === Accessors ===

    /// Identifier used in log lines.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn stack(&self) -> &CardStack {
        &self.stack
    }

    #[must_use]
    pub fn names(&self) -> &PlayerMap<String> {
        &self.names
    }

    #[must_use]
    pub fn card(&self, uid: Uid) -> Option<&Card> {
        self.stack.get(uid)
    }

    /// Number of questions waiting for an answer.
    #[must_use]
    pub fn pending_questions(&self) -> usize {
        self.questions.pending_count()
    }

    /// Name shown in server chat lines, falling back to the seat.
    #[must_use]
    pub fn display_name(&self, player: PlayerId) -> String {
        match self.names.iter().find(|(p, _)| *p == player) {
            Some((_, name)) if !name.is_empty() => name.clone(),
            _ => player.to_string(),
        }
    }

    pub fn set_name(&mut self, player: PlayerId, name: impl Into<String>) -> Result<(), DuelError> {
        self.names[seated(player)?] = name.into();
        Ok(())
    }

    // === Emission ===

    fn payload(&self, projector: &Projector<'_>, action: DuelAction, slot: Slot) -> ViewPayload {
        ViewPayload {
            action,
            state: self.state.clone(),
            field: projector.field_for(slot),
            slot,
        }
    }

    /// Project the field for every observer and send it.
    pub(crate) fn emit_view(&mut self, action: DuelAction) {
        let mut projector = Projector::new(&self.stack);
        if self.config.incremental_views && action != DuelAction::Start {
            if let Some(baseline) = &self.baseline {
                projector = projector.edited_since(baseline);
            }
        }
        let notification = Notification::ViewChanged {
            names: self.names.clone(),
            p0: self.payload(&projector, action, Slot::Player(PlayerId::new(0))),
            p1: self.payload(&projector, action, Slot::Player(PlayerId::new(1))),
            spectator: self.payload(&projector, action, Slot::Spectator),
        };
        self.baseline = Some(self.stack.snapshot());
        self.sink.notify(&notification);
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.sink.notify(&notification);
    }

    /// Append a server line to the duelist chat without notifying.
    pub(crate) fn server_line(&mut self, message: String) {
        self.state.record_duelist_chat(ChatLine::new(SERVER, message));
    }

    /// Append a server line and send it as a chat notification.
    pub(crate) fn server_say(&mut self, message: String) {
        self.server_line(message.clone());
        self.notify(Notification::Chat {
            channel: ChatChannel::Duelists,
            speaker: SERVER.to_string(),
            message,
        });
    }

    /// Send a free-form message to one slot.
    pub fn announce(&mut self, slot: Slot, message: serde_json::Value) {
        self.notify(Notification::Announcement { slot, message });
    }

    // === Field mutations ===

    /// Move one card. See [`rules::apply_move`].
    pub fn submit_move(&mut self, request: &MoveRequest) -> Result<Uid, DuelError> {
        let uid = rules::apply_move(&mut self.stack, request)?;
        self.emit_view(DuelAction::Duel);
        Ok(uid)
    }

    fn from_deck(
        &mut self,
        player: PlayerId,
        count: usize,
        zone: Zone,
        position: Position,
    ) -> Result<Vec<Uid>, DuelError> {
        let moved =
            rules::move_from_deck(&mut self.stack, seated(player)?, count, zone, position)?;
        debug!(duel = %self.id, player = player.0, count, to = %zone, "cards moved from deck");
        Ok(moved)
    }

    /// Draw `count` cards, face-up into the hand.
    pub fn draw(&mut self, player: PlayerId, count: usize) -> Result<Vec<Uid>, DuelError> {
        let drawn = self.from_deck(player, count, Zone::Hand, Position::FaceUp)?;
        let noun = if count == 1 { "a card" } else { "cards" };
        let line = if count == 1 {
            format!("{} drew {noun}.", self.display_name(player))
        } else {
            format!("{} drew {count} {noun}.", self.display_name(player))
        };
        self.server_line(line);
        self.emit_view(DuelAction::Duel);
        Ok(drawn)
    }

    /// Send the top `count` cards to the graveyard.
    pub fn mill(&mut self, player: PlayerId, count: usize) -> Result<Vec<Uid>, DuelError> {
        let milled = self.from_deck(player, count, Zone::Grave, Position::FaceUp)?;
        self.emit_view(DuelAction::Duel);
        Ok(milled)
    }

    /// Banish the top `count` cards face-up.
    pub fn banish_from_deck(
        &mut self,
        player: PlayerId,
        count: usize,
    ) -> Result<Vec<Uid>, DuelError> {
        let banished = self.from_deck(player, count, Zone::Banished, Position::FaceUp)?;
        self.emit_view(DuelAction::Duel);
        Ok(banished)
    }

    /// Banish the top `count` cards face-down.
    pub fn banish_from_deck_face_down(
        &mut self,
        player: PlayerId,
        count: usize,
    ) -> Result<Vec<Uid>, DuelError> {
        let banished = self.from_deck(player, count, Zone::Banished, Position::FaceDown)?;
        self.emit_view(DuelAction::Duel);
        Ok(banished)
    }

    /// Excavate the top `count` cards.
    pub fn excavate(&mut self, player: PlayerId, count: usize) -> Result<Vec<Uid>, DuelError> {
        let excavated = self.from_deck(player, count, Zone::Excavated, Position::FaceDown)?;
        self.emit_view(DuelAction::Duel);
        Ok(excavated)
    }

    /// Bring a new card into the duel, e.g. a token.
    pub fn create_card(
        &mut self,
        player: PlayerId,
        code: CardCode,
        zone: Zone,
        index: u32,
        position: Position,
    ) -> Result<Uid, DuelError> {
        let catalog = self.catalog.as_ref();
        let uid =
            rules::create_card(&mut self.stack, catalog, player, code, zone, index, position)?;
        self.emit_view(DuelAction::NewCard);
        Ok(uid)
    }

    /// Take a card out of the duel for good.
    pub fn remove_card(&mut self, uid: Uid) -> Result<(), DuelError> {
        rules::remove_card(&mut self.stack, uid)?;
        self.emit_view(DuelAction::Duel);
        Ok(())
    }

    pub fn add_counter(&mut self, uid: Uid) -> Result<u32, DuelError> {
        let counters = rules::add_counter(&mut self.stack, uid)?;
        self.emit_view(DuelAction::Duel);
        Ok(counters)
    }

    pub fn remove_counter(&mut self, uid: Uid) -> Result<u32, DuelError> {
        let counters = rules::remove_counter(&mut self.stack, uid)?;
        self.emit_view(DuelAction::Duel);
        Ok(counters)
    }

    /// Shuffle the deck by permuting identities across its uids.
    pub fn shuffle_deck(&mut self, player: PlayerId) -> Result<(), DuelError> {
        let player = seated(player)?;
        rules::shuffle_zone(&mut self.stack, &mut self.rng, player, Zone::Deck);
        self.server_line(format!("{} shuffled their deck.", self.display_name(player)));
        self.emit_view(DuelAction::ShuffleDeck(player));
        Ok(())
    }

    pub fn shuffle_hand(&mut self, player: PlayerId) -> Result<(), DuelError> {
        let player = seated(player)?;
        rules::shuffle_zone(&mut self.stack, &mut self.rng, player, Zone::Hand);
        self.emit_view(DuelAction::ShuffleHand(player));
        Ok(())
    }

    /// Turn the whole deck upside down.
    pub fn flip_deck(&mut self, player: PlayerId) -> Result<(), DuelError> {
        rules::flip_deck(&mut self.stack, seated(player)?);
        self.emit_view(DuelAction::Duel);
        Ok(())
    }

    // === Turn, phase, life ===

    pub fn advance_phase(&mut self, phase: PhaseId) {
        self.state.set_phase(phase);
        self.emit_view(DuelAction::Duel);
    }

    pub fn advance_turn(&mut self) {
        self.state.advance_turn();
        self.emit_view(DuelAction::Duel);
    }

    /// Hand the turn to the other seat without advancing the turn counter.
    pub fn set_turn_player(&mut self) {
        self.state.flip_active_player();
        self.emit_view(DuelAction::Duel);
    }

    /// Apply a signed lifepoint change. Returns the new total.
    pub fn change_lifepoints(&mut self, player: PlayerId, amount: i64) -> Result<i64, DuelError> {
        let player = seated(player)?;
        let name = self.display_name(player);
        let line = if amount > 0 {
            format!("{name} gained {amount} Lifepoints.")
        } else {
            format!("{name} lost {} Lifepoints.", amount.unsigned_abs())
        };
        self.server_line(line);
        let total = self.state.change_lifepoints(player, amount);
        self.emit_view(DuelAction::Duel);
        Ok(total)
    }

    // === Chat and randomness ===

    pub fn duelist_chat(&mut self, speaker: impl Into<String>, message: impl Into<String>) {
        self.state.record_duelist_chat(ChatLine::new(speaker, message));
        self.emit_view(DuelAction::Chat);
    }

    pub fn spectator_chat(&mut self, speaker: impl Into<String>, message: impl Into<String>) {
        self.state.record_spectator_chat(ChatLine::new(speaker, message));
        self.emit_view(DuelAction::Chat);
    }

    /// Roll a six-sided die for `player`.
    pub fn roll_die(&mut self, player: PlayerId) -> Result<u8, DuelError> {
        let player = seated(player)?;
        let result = self.rng.roll_die();
        self.server_say(format!("{} rolled a {result}", self.display_name(player)));
        Ok(result)
    }

    pub fn flip_coin(&mut self, player: PlayerId) -> Result<CoinFace, DuelError> {
        let player = seated(player)?;
        let face = if self.rng.flip_coin() {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        };
        self.server_say(format!("{} flipped {face}", self.display_name(player)));
        Ok(face)
    }

    /// Concede. The engine only records it; ending the duel is up to the host.
    pub fn surrender(&mut self, player: PlayerId) -> Result<(), DuelError> {
        let player = seated(player)?;
        self.server_say(format!("{} surrendered.", self.display_name(player)));
        Ok(())
    }

    // === Views ===

    /// The complete field as `slot` sees it, ignoring the edited-only
    /// baseline.
    #[must_use]
    pub fn field_view(&self, slot: Slot) -> FieldView {
        Projector::new(&self.stack).field_for(slot)
    }

    pub fn count_view(&self, player: PlayerId) -> Result<ZoneCounts, DuelError> {
        Ok(Projector::new(&self.stack).counts(seated(player)?))
    }

    /// Unmasked cards of one side, for server-side synchronisation.
    pub fn update_view(&self, player: PlayerId) -> Result<PlayerField, DuelError> {
        Ok(Projector::new(&self.stack).update_view(seated(player)?))
    }

    /// Deep copy of every card.
    #[must_use]
    pub fn stack_snapshot(&self) -> Vec<Card> {
        self.stack.to_vec()
    }

    /// The stack encoded with bincode.
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, DuelError> {
        Ok(bincode::serialize(&self.stack_snapshot())?)
    }
}

impl std::fmt::Debug for Duel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Duel")
            .field("id", &self.id)
            .field("turn", &self.state.turn)
            .field("cards", &self.stack.len())
            .field("questions", &self.questions)
            .finish()
    }
}
