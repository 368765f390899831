//! Stable ID newtype for links.
//!
//! Every addressable thing in the store -- values' nodes, type nodes,
//! containment edges -- is a link with a `LinkId`. The newtype keeps raw
//! integers from being passed where a link identifier is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable link identifier handed out by the store.
///
/// Ids are globally unique and never reused; the store allocates them on
/// `insert` or in bulk via `reserve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prints_inner_value() {
        assert_eq!(format!("{}", LinkId(42)), "42");
    }

    #[test]
    fn serde_roundtrip() {
        let id = LinkId(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: LinkId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
