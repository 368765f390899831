//! Storage error types for objgraph-store.
//!
//! [`StoreError`] covers the anticipated failure modes of the link-store
//! contract: missing rows, id allocation violations, and rejected batch
//! operations.

use objgraph_core::{LinkId, ValueTable};
use thiserror::Error;

/// Errors produced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A link with the given id was not found.
    #[error("link not found: {0}")]
    LinkNotFound(LinkId),

    /// A value row was expected for the link but none exists.
    #[error("no {table} value for link {link}")]
    ValueNotFound { link: LinkId, table: ValueTable },

    /// Inserting with an explicit id that is already occupied.
    #[error("link id already in use: {0}")]
    DuplicateId(LinkId),

    /// Inserting a value row for a link that already has one.
    #[error("link {0} already has a value row")]
    DuplicateValue(LinkId),

    /// Inserting with an explicit id that was never handed out by `reserve`.
    #[error("link id was never reserved: {0}")]
    IdNotReserved(LinkId),

    /// An edge operation referenced a nonexistent endpoint.
    #[error("missing endpoint {endpoint} for link {link}")]
    MissingEndpoint { link: LinkId, endpoint: LinkId },

    /// A batch operation the store cannot apply.
    #[error("invalid operation: {reason}")]
    InvalidOperation { reason: String },
}
