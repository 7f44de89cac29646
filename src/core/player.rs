//! Seats and per-seat data storage.
//!
//! ## PlayerId
//!
//! A duel is always played between exactly two seats, `PlayerId(0)` and
//! `PlayerId(1)`. Everything else that watches the duel is a spectator, see
//! [`Slot`].
//!
//! ## PlayerMap
//!
//! Per-seat data storage backed by a `Vec` for O(1) access.
//! Supports iteration and indexing by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of seats in a duel.
pub const SEATS: usize = 2;

/// Seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    ///
    /// ```
    /// use duel_field::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).opponent(), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).opponent(), PlayerId::new(0));
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        if self.0 == 0 {
            Self(1)
        } else {
            Self(0)
        }
    }

    /// Check that this ID names one of the duel's seats.
    #[must_use]
    pub const fn is_seated(self) -> bool {
        (self.0 as usize) < SEATS
    }

    /// Iterate over both seats.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..SEATS as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Who a notification is delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// One of the two duelists.
    Player(PlayerId),
    /// Anyone watching without a seat.
    Spectator,
}

impl Slot {
    /// The seat behind this slot, if any.
    #[must_use]
    pub fn seat(self) -> Option<PlayerId> {
        match self {
            Slot::Player(p) => Some(p),
            Slot::Spectator => None,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Player(p) => write!(f, "p{}", p.0),
            Slot::Spectator => f.write_str("spectator"),
        }
    }
}

/// Addressing for prompts and reveals: one slot, or everybody.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    All,
    Slot(Slot),
}

impl Audience {
    /// Audience of a single seat.
    #[must_use]
    pub const fn seat(player: PlayerId) -> Self {
        Audience::Slot(Slot::Player(player))
    }

    /// Does this audience include the given slot?
    #[must_use]
    pub fn includes(self, slot: Slot) -> bool {
        match self {
            Audience::All => true,
            Audience::Slot(s) => s == slot,
        }
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use duel_field::core::{PlayerId, PlayerMap};
///
/// let mut life: PlayerMap<i64> = PlayerMap::with_value(8000);
/// life[PlayerId::new(1)] -= 1000;
/// assert_eq!(life[PlayerId::new(0)], 8000);
/// assert_eq!(life[PlayerId::new(1)], 7000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::all().map(factory).collect(),
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
        assert!(p1.is_seated());
        assert!(!PlayerId::new(2).is_seated());
    }

    #[test]
    fn test_opponent_is_involution() {
        for p in PlayerId::all() {
            assert_ne!(p.opponent(), p);
            assert_eq!(p.opponent().opponent(), p);
        }
    }

    #[test]
    fn test_audience_includes() {
        let p0 = Slot::Player(PlayerId::new(0));
        assert!(Audience::All.includes(Slot::Spectator));
        assert!(Audience::seat(PlayerId::new(0)).includes(p0));
        assert!(!Audience::seat(PlayerId::new(1)).includes(p0));
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::Player(PlayerId::new(1)).to_string(), "p1");
        assert_eq!(Slot::Spectator.to_string(), "spectator");
        assert_eq!(Slot::Player(PlayerId::new(1)).seat(), Some(PlayerId::new(1)));
        assert_eq!(Slot::Spectator.seat(), None);
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(1)], 10);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &0), (PlayerId::new(1), &1)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i64> = PlayerMap::with_value(8000);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "[8000,8000]");
        let deserialized: PlayerMap<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
