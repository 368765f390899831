//! The selector language shared by the remote store and the local cache.
//!
//! Both `select` on the store and `query` on the cache evaluate the same
//! [`Selector`] forms, so code can probe the cache on the hot path and fall
//! back to the store with the identical expression.
//!
//! Three addressing modes:
//! - point/pattern lookup over `(id, type, from, to)` ([`LinkPattern`]),
//! - name-under-parent ("containment path") addressing ([`Selector::NamedChild`]),
//! - transitive closure down containment ([`Selector::ContainTreeDown`]).

use serde::{Deserialize, Serialize};

use crate::id::LinkId;
use crate::link::Link;

/// A conjunctive field pattern over link records. `None` fields match
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPattern {
    pub id: Option<LinkId>,
    pub type_id: Option<LinkId>,
    pub from_id: Option<LinkId>,
    pub to_id: Option<LinkId>,
}

impl LinkPattern {
    /// Point lookup by id.
    pub fn by_id(id: LinkId) -> Self {
        LinkPattern {
            id: Some(id),
            ..Default::default()
        }
    }

    /// All links of a given type.
    pub fn by_type(type_id: LinkId) -> Self {
        LinkPattern {
            type_id: Some(type_id),
            ..Default::default()
        }
    }

    /// All links of a given type leaving a given node.
    pub fn by_type_from(type_id: LinkId, from_id: LinkId) -> Self {
        LinkPattern {
            type_id: Some(type_id),
            from_id: Some(from_id),
            ..Default::default()
        }
    }

    /// All links of a given type arriving at a given node.
    pub fn by_type_to(type_id: LinkId, to_id: LinkId) -> Self {
        LinkPattern {
            type_id: Some(type_id),
            to_id: Some(to_id),
            ..Default::default()
        }
    }

    /// Whether `link` satisfies every set field of the pattern.
    pub fn matches(&self, link: &Link) -> bool {
        if let Some(id) = self.id {
            if link.id != id {
                return false;
            }
        }
        if let Some(type_id) = self.type_id {
            if link.type_id != type_id {
                return false;
            }
        }
        if let Some(from_id) = self.from_id {
            if link.from_id != Some(from_id) {
                return false;
            }
        }
        if let Some(to_id) = self.to_id {
            if link.to_id != Some(to_id) {
                return false;
            }
        }
        true
    }
}

/// A query against the link space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    /// Field-wise pattern match.
    Pattern(LinkPattern),
    /// Containment-path addressing: the child reached from `parent` through
    /// a `contain_type` link whose string payload equals `name`. Resolves to
    /// the child link, not the containment link.
    NamedChild {
        parent: LinkId,
        contain_type: LinkId,
        name: String,
    },
    /// Everything reachable by containment below `root`: the root link
    /// itself, every containment link of type `contain_type`, and every
    /// contained link, transitively.
    ContainTreeDown { contain_type: LinkId, root: LinkId },
}

impl Selector {
    /// Point lookup by id.
    pub fn by_id(id: LinkId) -> Self {
        Selector::Pattern(LinkPattern::by_id(id))
    }
}
