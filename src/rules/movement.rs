//! Card relocation: the one primitive every field mutation goes through.
//!
//! A move picks exactly one card with a [`CardQuery`], rewrites its
//! controller, zone, index, position and overlay index, then renumbers the
//! pile zones of both the seat it left and the seat it joined. Nothing is
//! touched until the source has resolved to a single card.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::CardCode;
use crate::core::{DuelError, PlayerId, Uid};
use crate::zones::{CardQuery, CardStack, Position, Zone};

/// Where a moved card ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Requested controller. Ignored for GRAVE and BANISHED, which always
    /// belong to the owner.
    pub player: PlayerId,
    pub zone: Zone,
    pub index: u32,
    pub position: Position,
    #[serde(default)]
    pub overlay_index: u32,
    /// Replace the card's code, e.g. once a hidden card becomes known.
    #[serde(default)]
    pub code: Option<CardCode>,
}

impl Destination {
    #[must_use]
    pub fn new(player: PlayerId, zone: Zone, index: u32, position: Position) -> Self {
        Self {
            player,
            zone,
            index,
            position,
            overlay_index: 0,
            code: None,
        }
    }

    /// Attach under the card at the same index (builder pattern).
    #[must_use]
    pub fn with_overlay(mut self, overlay_index: u32) -> Self {
        self.overlay_index = overlay_index;
        self
    }

    /// Overwrite the code on arrival (builder pattern).
    #[must_use]
    pub fn with_code(mut self, code: CardCode) -> Self {
        self.code = Some(code);
        self
    }
}

/// A single card relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub source: CardQuery,
    pub destination: Destination,
}

impl MoveRequest {
    #[must_use]
    pub fn new(source: CardQuery, destination: Destination) -> Self {
        Self { source, destination }
    }
}

/// Resolve the source, relocate it and re-index the affected piles.
///
/// Returns the uid of the moved card.
pub fn apply_move(stack: &mut CardStack, request: &MoveRequest) -> Result<Uid, DuelError> {
    let dest = &request.destination;
    if !dest.player.is_seated() {
        return Err(DuelError::UnknownPlayer(dest.player));
    }

    let (uid, owner, from_player, from_zone) = {
        let card = stack.select_one(&request.source)?;
        (card.uid, card.owner, card.controller, card.zone)
    };

    let to_player = if dest.zone.returns_to_owner() { owner } else { dest.player };
    let position = if dest.zone == Zone::Hand {
        Position::FaceUp
    } else {
        dest.position
    };

    let card = stack.get_mut(uid).ok_or(DuelError::UnknownCard(uid))?;
    card.controller = to_player;
    card.zone = dest.zone;
    card.index = dest.index;
    card.position = position;
    card.overlay_index = dest.overlay_index;
    if let Some(code) = dest.code {
        card.code = code;
    }

    debug!(
        uid = uid.raw(),
        from = %from_zone,
        to = %dest.zone,
        index = dest.index,
        controller = to_player.0,
        "card moved"
    );

    settle(stack, &[from_player, to_player], Some((uid, to_player, dest.zone, dest.index)));
    Ok(uid)
}

/// Re-index every pile of the given seats and clear stale counters.
///
/// `pinned` keeps a just-placed card at its requested index.
pub fn settle(
    stack: &mut CardStack,
    players: &[PlayerId],
    pinned: Option<(Uid, PlayerId, Zone, u32)>,
) {
    let mut seen: Vec<PlayerId> = Vec::with_capacity(players.len());
    for &player in players {
        if seen.contains(&player) {
            continue;
        }
        seen.push(player);

        for zone in Zone::PILES {
            let pin = pinned
                .filter(|&(_, p, z, _)| p == player && z == zone)
                .map(|(uid, _, _, index)| (uid, index));
            stack.reindex(player, zone, pin);
        }
    }
    stack.clean_counters();
}
