//! Core engine types: uids, seats, game state, RNG, configuration, errors.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod state;
pub mod error;

pub use entity::Uid;
pub use player::{Audience, PlayerId, PlayerMap, Slot, SEATS};
pub use rng::GameRng;
pub use config::{DuelConfig, DEFAULT_LIFEPOINTS};
pub use state::{ChatLine, GameState, PhaseId};
pub use error::DuelError;
