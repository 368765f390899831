//! The [`LinkStore`] trait defining the storage contract for link graphs.
//!
//! The conversion core consumes the store exclusively through this trait:
//! point/pattern selects, single-row mutations, bulk id reservation, and the
//! atomic multi-operation `serial` apply. Backends are fully swappable; the
//! bundled [`InMemoryStore`](crate::memory::InMemoryStore) has the same
//! semantics a remote service is expected to provide.
//!
//! The trait is synchronous. Suspension, timeouts, and retries are the
//! caller's concern at this boundary; the core performs none of them.

use objgraph_core::{Link, LinkId, LinkInsert, LinkUpdate, Selector, SerialOperation, SerialOutcome};

use crate::error::StoreError;

/// The storage contract for link graphs.
pub trait LinkStore {
    /// Returns all links matching the selector.
    fn select(&self, selector: &Selector) -> Result<Vec<Link>, StoreError>;

    /// Inserts a single link row, returning the created record.
    ///
    /// When `insert.id` is `None` the store allocates a fresh id; an explicit
    /// id must have been handed out by [`reserve`](LinkStore::reserve).
    fn insert(&mut self, insert: LinkInsert) -> Result<Link, StoreError>;

    /// Patches fields of an existing link row, returning the updated record.
    fn update(&mut self, id: LinkId, fields: LinkUpdate) -> Result<Link, StoreError>;

    /// Deletes a link row together with its value row.
    fn delete(&mut self, id: LinkId) -> Result<(), StoreError>;

    /// Hands out `count` fresh, never-reused link ids.
    fn reserve(&mut self, count: usize) -> Result<Vec<LinkId>, StoreError>;

    /// Applies a batch of operations atomically: either every operation
    /// lands, or the store is left untouched and the error is returned.
    fn serial(&mut self, operations: &[SerialOperation]) -> Result<SerialOutcome, StoreError>;
}
