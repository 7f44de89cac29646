//! Card identification.
//!
//! Every card created in a duel gets a `Uid`. Uids are allocated in
//! creation order, starting at 0, and are never reused or changed while the
//! duel's card stack lives. Removing a card from play relocates it to a
//! terminal zone instead of deleting it, so a uid stays addressable for
//! diffing views.
//!
//! ```
//! use duel_field::core::Uid;
//!
//! let first = Uid::new(0);
//! assert_eq!(first.next(), Uid::new(1));
//! assert_eq!(format!("{}", first), "Uid(0)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one duel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(pub u32);

impl Uid {
    /// Create a uid from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw uid value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The uid allocated right after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for Uid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Uid({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_sequential() {
        let uid = Uid::new(41);
        assert_eq!(uid.next(), Uid::new(42));
        assert_eq!(uid.next().raw(), 42);
    }

    #[test]
    fn test_ordering() {
        assert!(Uid(1) < Uid(2));
        assert_eq!(Uid::from(7), Uid(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Uid(42)), "Uid(42)");
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Uid(123)).unwrap();
        assert_eq!(json, "123");
        let back: Uid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Uid(123));
    }
}
