//! Per-duel randomness.
//!
//! Deck shuffles, hand shuffles, die rolls and coin flips all draw from one
//! ChaCha8 stream. A seeded duel replays identically.
//!
//! ```
//! use duel_field::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll_die(), b.roll_die());
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed, for logging a duel so it can be replayed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A six-sided die.
    pub fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    /// `true` for heads.
    pub fn flip_coin(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);

        let rolls_a: Vec<u8> = (0..50).map(|_| a.roll_die()).collect();
        let rolls_b: Vec<u8> = (0..50).map(|_| b.roll_die()).collect();

        assert_eq!(rolls_a, rolls_b);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_die_faces() {
        let mut rng = GameRng::new(7);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let roll = rng.roll_die();
            assert!((1..=6).contains(&roll));
            seen[usize::from(roll - 1)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_coin_lands_both_ways() {
        let mut rng = GameRng::new(3);
        let heads = (0..200).filter(|_| rng.flip_coin()).count();
        assert!(heads > 0 && heads < 200);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = GameRng::new(42);
        let mut deck: Vec<u32> = (1..=40).collect();

        rng.shuffle(&mut deck);

        assert_ne!(deck, (1..=40).collect::<Vec<_>>());
        deck.sort_unstable();
        assert_eq!(deck, (1..=40).collect::<Vec<_>>());
    }
}
