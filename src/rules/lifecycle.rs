//! Card lifecycle: deck-top movers, tokens, removal, counters, shuffles.
//!
//! Each function validates first and leaves the stack untouched on error.
//! None of them emit notifications; the duel does that once per call.

use tracing::{debug, warn};

use super::movement::{apply_move, settle, Destination, MoveRequest};
use crate::cards::{CardCatalog, CardCode};
use crate::core::{DuelError, GameRng, PlayerId, Uid};
use crate::zones::{CardQuery, CardStack, Position, Zone};

/// Move `count` cards from the top of `player`'s deck to the end of `zone`.
///
/// Drawing, milling, banishing and excavating are all this operation with a
/// different destination. Fails without moving anything when the deck holds
/// fewer than `count` cards.
pub fn move_from_deck(
    stack: &mut CardStack,
    player: PlayerId,
    count: usize,
    zone: Zone,
    position: Position,
) -> Result<Vec<Uid>, DuelError> {
    if !player.is_seated() {
        return Err(DuelError::UnknownPlayer(player));
    }
    let available = stack.zone_len(player, Zone::Deck);
    if count > available {
        return Err(DuelError::NotEnoughCards {
            player,
            zone: Zone::Deck,
            requested: count,
            available,
        });
    }

    let top = stack.top_of_deck(player, count);
    for &uid in &top {
        let end = stack.zone_len(player, zone) as u32;
        let request = MoveRequest::new(
            CardQuery::by_uid(uid),
            Destination::new(player, zone, end, position),
        );
        apply_move(stack, &request)?;
    }
    Ok(top)
}

/// Create a card mid-duel (tokens, cards summoned from outside the duel).
///
/// Attributes come from the catalog; an unknown code still creates the card
/// with no attributes.
pub fn create_card(
    stack: &mut CardStack,
    catalog: &dyn CardCatalog,
    player: PlayerId,
    code: CardCode,
    zone: Zone,
    index: u32,
    position: Position,
) -> Result<Uid, DuelError> {
    if !player.is_seated() {
        return Err(DuelError::UnknownPlayer(player));
    }
    let attributes = match catalog.lookup(code) {
        Some(definition) => definition.attributes.clone(),
        None => {
            warn!(code = code.raw(), "creating card with unknown code");
            Default::default()
        }
    };

    let uid = stack.spawn_with(code, player, zone, index, position, attributes);
    debug!(uid = uid.raw(), code = code.raw(), zone = %zone, "card created");
    settle(stack, &[player], Some((uid, player, zone, index)));
    Ok(uid)
}

/// Take a card out of the game. It stays in the stack, in INMATERIAL.
pub fn remove_card(stack: &mut CardStack, uid: Uid) -> Result<(), DuelError> {
    let card = stack.get_mut(uid).ok_or(DuelError::UnknownCard(uid))?;
    let player = card.controller;
    card.zone = Zone::Inmaterial;
    card.overlay_index = 0;
    debug!(uid = uid.raw(), "card removed from play");
    settle(stack, &[player], None);
    Ok(())
}

/// Put one counter on a face-up card. Returns the new count.
pub fn add_counter(stack: &mut CardStack, uid: Uid) -> Result<u32, DuelError> {
    let card = stack.get_mut(uid).ok_or(DuelError::UnknownCard(uid))?;
    if card.is_face_down() {
        return Err(DuelError::FaceDownCounters(uid));
    }
    card.counters += 1;
    Ok(card.counters)
}

/// Take one counter off a card. Returns the new count.
pub fn remove_counter(stack: &mut CardStack, uid: Uid) -> Result<u32, DuelError> {
    let card = stack.get_mut(uid).ok_or(DuelError::UnknownCard(uid))?;
    if card.counters == 0 {
        return Err(DuelError::NoCounters(uid));
    }
    card.counters -= 1;
    Ok(card.counters)
}

/// Shuffle a pile by permuting card identities across its uids.
///
/// Uids and indices stay put; codes and attributes move. A client that
/// memorised which uid held which code learns nothing from the new order.
pub fn shuffle_zone(stack: &mut CardStack, rng: &mut GameRng, player: PlayerId, zone: Zone) {
    let uids: Vec<Uid> = stack.zone(player, zone).iter().map(|c| c.uid).collect();
    let mut identities: Vec<_> = uids
        .iter()
        .filter_map(|&uid| stack.get(uid))
        .map(|c| (c.code, c.attributes.clone()))
        .collect();

    rng.shuffle(&mut identities);

    for (uid, (code, attributes)) in uids.into_iter().zip(identities) {
        if let Some(card) = stack.get_mut(uid) {
            card.code = code;
            card.attributes = attributes;
        }
    }
    debug!(player = player.0, zone = %zone, "zone shuffled");
}

/// Turn the whole deck over: reverse the code order and flip every card.
pub fn flip_deck(stack: &mut CardStack, player: PlayerId) {
    let uids: Vec<Uid> = stack.zone(player, Zone::Deck).iter().map(|c| c.uid).collect();
    let mut identities: Vec<_> = uids
        .iter()
        .filter_map(|&uid| stack.get(uid))
        .map(|c| (c.code, c.attributes.clone()))
        .collect();
    identities.reverse();

    for (uid, (code, attributes)) in uids.into_iter().zip(identities) {
        if let Some(card) = stack.get_mut(uid) {
            card.code = code;
            card.attributes = attributes;
            card.position = card.position.flipped();
        }
    }
    stack.clean_counters();
}
