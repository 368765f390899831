//! Conversion error types.
//!
//! Fatal conditions abort the whole pass before anything is submitted to the
//! store; because the batch is applied in one `serial` call, an aborted pass
//! leaves the graph untouched. Recoverable conditions (an unsupported value
//! under a property key) are reported through
//! [`Diagnostics`](crate::diag::Diagnostics) instead and never surface here
//! unless strict mode is enabled.

use thiserror::Error;

use objgraph_core::{CoreError, LinkId, ValueKind};
use objgraph_store::StoreError;

use crate::diag::Diagnostics;

/// Errors produced by a conversion or propagation pass.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The reserved id pool ran dry mid-pass. The pre-pass sizes the pool as
    /// an upper bound, so this indicates a bookkeeping bug.
    #[error("reserved id pool exhausted")]
    PoolExhausted,

    /// A canonical node (type, containment, or boolean singleton) could not
    /// be resolved by name under its package.
    #[error("could not resolve canonical node {name:?} under its package")]
    TypeResolution { name: String },

    /// A link referenced by id does not exist.
    #[error("link {0} not found")]
    LinkNotFound(LinkId),

    /// An existing property link's type edge does not point at any of the
    /// canonical value-shape nodes, so its recorded shape cannot be read.
    #[error("link {link} has type {type_id}, which is not a canonical value shape")]
    UnknownShape { link: LinkId, type_id: LinkId },

    /// An incoming property value has a different shape than the one its
    /// existing link was recorded with. Shape migration is not performed;
    /// the pass fails before submitting anything.
    #[error("property {key:?} changed shape: recorded as {recorded}, incoming value is {incoming}")]
    ShapeChanged {
        key: String,
        recorded: ValueKind,
        incoming: ValueKind,
    },

    /// A containment name could not be resolved while walking up from a
    /// changed property link.
    #[error("could not resolve a containment name for link {0}")]
    AncestryNameResolution(LinkId),

    /// A link that should carry a value row has none.
    #[error("link {0} has no stored value")]
    MissingValue(LinkId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A failed pass: the error plus everything logged up to the failure, so a
/// rejected call can be audited the same way a successful one is.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ConvertFailure {
    pub error: ConvertError,
    pub diagnostics: Diagnostics,
}

impl ConvertFailure {
    pub(crate) fn new(error: impl Into<ConvertError>, diagnostics: Diagnostics) -> Self {
        ConvertFailure {
            error: error.into(),
            diagnostics,
        }
    }
}
