//! Pre-reserved link-id bookkeeping.
//!
//! A conversion pass reserves every id it could possibly need up front (one
//! `reserve` round trip), then draws ids from the local [`IdPool`] while it
//! queues operations. The pre-pass count is an upper bound: update passes
//! consume fewer ids than they reserved, and over-reserved ids are simply
//! never used (the store never reissues them).

use objgraph_core::{LinkId, Value};

use crate::error::ConvertError;

/// Ids consumed per newly materialized value node: the node link itself plus
/// the containment link naming it under its parent.
pub const SLOTS_PER_NODE: usize = 2;

/// Stack of pre-reserved link ids, drawn from the end of the reservation.
#[derive(Debug, Clone)]
pub struct IdPool {
    ids: Vec<LinkId>,
}

impl IdPool {
    pub fn new(ids: Vec<LinkId>) -> Self {
        IdPool { ids }
    }

    /// Draws the next reserved id.
    pub fn pop(&mut self) -> Result<LinkId, ConvertError> {
        self.ids.pop().ok_or(ConvertError::PoolExhausted)
    }

    /// Ids still available.
    pub fn remaining(&self) -> usize {
        self.ids.len()
    }
}

/// Number of link ids needed to materialize `value` and everything nested
/// inside it from scratch: every value (scalar, object, array container, and
/// array element) costs [`SLOTS_PER_NODE`].
pub fn links_to_reserve(value: &Value) -> usize {
    SLOTS_PER_NODE
        + match value {
            Value::Obj(map) => map.values().map(links_to_reserve).sum(),
            Value::Arr(items) => items.iter().map(links_to_reserve).sum(),
            Value::Str(_) | Value::Num(_) | Value::Bool(_) => 0,
        }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count(json: serde_json::Value) -> usize {
        links_to_reserve(&Value::from_json(&json).unwrap())
    }

    #[test]
    fn scalars_cost_two_slots() {
        assert_eq!(count(json!("s")), 2);
        assert_eq!(count(json!(1.5)), 2);
        assert_eq!(count(json!(true)), 2);
    }

    #[test]
    fn containers_cost_their_own_slots_plus_children() {
        assert_eq!(count(json!({})), 2);
        assert_eq!(count(json!({ "a": "x", "b": 2.0 })), 6);
        assert_eq!(count(json!(["x", "y"])), 6);
        assert_eq!(count(json!({ "a": { "b": ["x"] } })), 8);
    }

    #[test]
    fn pool_hands_out_ids_from_the_end() {
        let mut pool = IdPool::new(vec![LinkId(5), LinkId(6), LinkId(7)]);
        assert_eq!(pool.remaining(), 3);
        assert_eq!(pool.pop().unwrap(), LinkId(7));
        assert_eq!(pool.pop().unwrap(), LinkId(6));
        assert_eq!(pool.pop().unwrap(), LinkId(5));
        assert!(matches!(pool.pop(), Err(ConvertError::PoolExhausted)));
    }
}
