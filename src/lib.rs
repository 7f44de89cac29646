//! # duel-field
//!
//! State engine for a manually played, two-seat dueling card game.
//!
//! Players move cards by hand; the engine does not enforce card rules. It
//! keeps the field consistent, decides who may see what, and tells every
//! observer about each change.
//!
//! ## Design Principles
//!
//! 1. **One Source of Truth**: Every card lives in a single [`CardStack`].
//!    Zones are a property of the card, not containers.
//!
//! 2. **Views Are Projections**: Observers never see the stack. Each
//!    mutation projects it once per slot, masking what that slot may not
//!    know.
//!
//! 3. **Answers Come Later**: Questions are keyed by token and resolved
//!    whenever the answer arrives; nothing blocks.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The stack is an `im::Vector`, so the
//!   baseline for edited-only views is an O(1) snapshot.
//!
//! - **Deterministic RNG**: Shuffles, dice and coins draw from a seedable
//!   ChaCha8 stream.
//!
//! ## Modules
//!
//! - `core`: Uids, seats, game state, RNG, configuration, errors
//! - `cards`: Card definitions, instances and the catalog
//! - `zones`: Zones, positions, queries and the card stack
//! - `rules`: Moves and the mutations built on them
//! - `view`: Per-observer projection and notifications
//! - `questions`: Pending questions and rock-paper-scissors
//! - `duel`: The duel itself, and its command set

pub mod core;
pub mod zones;
pub mod cards;
pub mod rules;
pub mod view;
pub mod questions;
pub mod duel;

// Re-export commonly used types
pub use crate::core::{
    Audience, ChatLine, DuelConfig, DuelError, GameRng, GameState, PhaseId, PlayerId, PlayerMap,
    Slot, Uid,
};

pub use crate::zones::{CardQuery, CardStack, Position, Zone};

pub use crate::cards::{
    AttributeValue, Attributes, Card, CardCatalog, CardCode, CardDefinition, CardRegistry,
};

pub use crate::rules::{Destination, MoveRequest};

pub use crate::view::{CardView, Notification, NotificationSink, Projector, Recorder, RevealReason};

pub use crate::questions::{Answer, AnswerLength, Prompt, QuestionToken, Throw};

pub use crate::duel::{AnswerOutcome, CoinFace, CommandOutcome, Decklist, Duel, DuelCommand};
