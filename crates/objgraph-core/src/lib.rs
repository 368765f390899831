//! Core data model for the objgraph link store and converter.
//!
//! Everything the store holds is a [`Link`]: a typed, directed triple of
//! integer-identified nodes with an optional value facet. This crate defines
//! that record shape, the JSON-like input [`Value`] model, the [`Selector`]
//! pattern language shared by the remote store and the local cache, and the
//! [`SerialOperation`] vocabulary for atomic multi-operation batches.

pub mod error;
pub mod id;
pub mod link;
pub mod ops;
pub mod selector;
pub mod value;

// Re-export commonly used types
pub use error::CoreError;
pub use id::LinkId;
pub use link::{Link, StoredValue, ValueTable};
pub use ops::{LinkInsert, LinkUpdate, SerialOperation, SerialOutcome};
pub use selector::{LinkPattern, Selector};
pub use value::{Value, ValueKind};
