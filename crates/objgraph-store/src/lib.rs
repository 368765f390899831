//! Storage abstraction for objgraph link graphs.
//!
//! Provides the [`LinkStore`] trait defining the storage contract the
//! conversion core consumes, the [`InMemoryStore`] first-class backend, and
//! the [`Minilinks`] client-side cache.
//!
//! # Architecture
//!
//! The store is a black-box service from the converter's point of view: it
//! offers pattern selects over `(id, type, from, to, value)` tuples, single
//! row mutations, bulk id reservation, and an atomic `serial` batch apply.
//! [`InMemoryStore`] implements exactly that contract in memory and doubles
//! as the reference for what a remote backend must guarantee. [`Minilinks`]
//! answers the same [`Selector`](objgraph_core::Selector) queries from cached
//! rows so the conversion hot path never waits on I/O.
//!
//! # Modules
//!
//! - [`error`]: StoreError enum with all failure modes
//! - [`traits`]: LinkStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`cache`]: Minilinks cache (apply/query)

pub mod cache;
pub mod error;
pub mod memory;
mod query;
pub mod traits;

// Re-export key types for ergonomic use.
pub use cache::{Minilinks, MinilinksApplyResult};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use traits::LinkStore;
