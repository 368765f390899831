//! Object-to-links conversion for objgraph link graphs.
//!
//! Maps JSON-like objects onto typed links: every property becomes a link
//! whose type edge records its value shape, named under its parent by a
//! containment link carrying the property key. Re-converting over an
//! existing tree is idempotent; properties are matched by containment name,
//! scalars are updated in place, objects are merged recursively, and arrays
//! are rebuilt wholesale.
//!
//! # Architecture
//!
//! A pass runs cold-then-hot: initialization resolves the canonical schema
//! nodes, primes a [`Minilinks`](objgraph_store::Minilinks) cache with the
//! containment tree below the root, and reserves every link id the pass
//! could need. The recursive walk then runs entirely against the cache,
//! queuing operations, and the queue is applied in one atomic `serial`
//! batch. Either the whole conversion lands or none of it does.
//!
//! # Modules
//!
//! - [`schema`]: canonical-node bootstrap ([`ensure_schema`])
//! - [`resolver`]: canonical-node resolution ([`WellKnownIds`])
//! - [`converter`]: the conversion pass ([`convert`])
//! - [`propagate`]: ancestor-mirror propagation ([`on_property_changed`])
//! - [`pool`]: reserved-id bookkeeping
//! - [`names`]: property-name normalization
//! - [`options`], [`diag`], [`error`]: pass configuration, log, and errors

pub mod converter;
pub mod diag;
pub mod error;
pub mod names;
pub mod options;
pub mod pool;
pub mod propagate;
pub mod resolver;
pub mod schema;

// Re-export key types for ergonomic use.
pub use converter::{
    convert, Conversion, ConvertOutcome, ConvertRequest, ConvertStart, ObjectToLinksConverter,
};
pub use diag::{DiagLevel, Diagnostic, Diagnostics};
pub use error::{ConvertError, ConvertFailure};
pub use options::ConverterOptions;
pub use pool::{links_to_reserve, IdPool};
pub use propagate::{on_property_changed, PropagateOutcome, PropertyChange};
pub use resolver::WellKnownIds;
pub use schema::{ensure_schema, SchemaHandles};
