//! Minilinks: the client-side link cache.
//!
//! A pure optimization layer: links fetched from the store are merged in via
//! [`Minilinks::apply`], and the conversion hot path answers its lookups with
//! [`Minilinks::query`] using the same [`Selector`] language as the store --
//! no I/O, no fallibility. The cache is append/merge-only for the life of a
//! process run; entries are never evicted, and staleness after external
//! concurrent modification is an accepted risk.

use indexmap::IndexMap;

use objgraph_core::{Link, LinkId, Selector};

use crate::query::eval_selector;

/// Outcome of one [`Minilinks::apply`] merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinilinksApplyResult {
    /// Records not previously cached.
    pub inserted: usize,
    /// Records that replaced an existing cache entry.
    pub updated: usize,
}

/// In-memory index of previously fetched links.
#[derive(Debug, Clone, Default)]
pub struct Minilinks {
    links: IndexMap<LinkId, Link>,
}

impl Minilinks {
    pub fn new() -> Self {
        Minilinks::default()
    }

    /// Merges a batch of fetched records into the cache. A record with a
    /// cached id replaces the cached entry wholesale (the store always
    /// returns full rows).
    pub fn apply(&mut self, links: Vec<Link>) -> MinilinksApplyResult {
        let mut result = MinilinksApplyResult::default();
        for link in links {
            if self.links.insert(link.id, link).is_some() {
                result.updated += 1;
            } else {
                result.inserted += 1;
            }
        }
        result
    }

    /// Evaluates a selector purely in memory.
    pub fn query(&self, selector: &Selector) -> Vec<Link> {
        eval_selector(&self.links, selector)
    }

    /// Single-link lookup by id.
    pub fn get(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
