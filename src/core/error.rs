//! Error type shared by every duel operation.
//!
//! Faults are raised before anything is mutated, so an `Err` always means
//! the duel is exactly as it was before the call.

use thiserror::Error;

use super::entity::Uid;
use super::player::PlayerId;
use crate::zones::{CardQuery, Zone};

#[derive(Debug, Error)]
pub enum DuelError {
    #[error("no card matches {query}")]
    NoMatch { query: CardQuery },

    #[error("{count} cards match {query}, expected exactly one")]
    Ambiguous { query: CardQuery, count: usize },

    #[error("no card with {0} in this duel")]
    UnknownCard(Uid),

    #[error("{0} is not seated in this duel")]
    UnknownPlayer(PlayerId),

    #[error("{player} has {available} cards in {zone}, {requested} requested")]
    NotEnoughCards {
        player: PlayerId,
        zone: Zone,
        requested: usize,
        available: usize,
    },

    #[error("{0} is face-down and cannot hold counters")]
    FaceDownCounters(Uid),

    #[error("{0} has no counters to remove")]
    NoCounters(Uid),

    #[error("answer has {len} values, expected between {min} and {max}")]
    AnswerLength { len: usize, min: usize, max: usize },

    #[error("answer value {0} is not one of the offered options")]
    UnknownOption(i64),

    #[error("no pending question to replay")]
    NothingToReplay,

    #[error("no previous round to restart")]
    NoPreviousRound,

    #[error("decklist for {player} does not match the previous round")]
    SideDeckMismatch { player: PlayerId },

    #[error("catalog could not be parsed: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("snapshot could not be encoded: {0}")]
    Snapshot(#[from] bincode::Error),
}
