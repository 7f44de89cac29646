//! Field mutations.
//!
//! `movement` is the single relocation primitive; `lifecycle` builds the
//! other card mutations (draw, mill, tokens, counters, shuffles) on top of
//! it. Both operate on a bare [`CardStack`](crate::zones::CardStack) and
//! never notify; the [`Duel`](crate::duel::Duel) emits one view per call.

pub mod lifecycle;
pub mod movement;

pub use lifecycle::{
    add_counter, create_card, flip_deck, move_from_deck, remove_card, remove_counter, shuffle_zone,
};
pub use movement::{apply_move, settle, Destination, MoveRequest};
