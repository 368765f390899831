//! Resolution of the canonical nodes a conversion pass depends on.
//!
//! All lookups happen once at pass initialization; afterwards the converter
//! carries the resolved [`WellKnownIds`] and never touches the store for
//! schema questions again.
//!
//! Resolution is anchored on the containment type itself: among the links
//! leaving the package node, the one whose string payload is `"Contain"` and
//! whose target equals its own type is the canonical containment link. Every
//! other canonical node is then addressed as a named child of its package.

use objgraph_core::{Link, LinkId, LinkPattern, Selector, ValueKind};
use objgraph_store::LinkStore;

use crate::error::ConvertError;

/// The resolved ids of every canonical node the converter references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownIds {
    pub package: LinkId,
    pub boolean_package: LinkId,
    pub contain_type: LinkId,
    pub root_type: LinkId,
    pub string_type: LinkId,
    pub number_type: LinkId,
    pub boolean_type: LinkId,
    pub object_type: LinkId,
    pub array_type: LinkId,
    /// Singleton node boolean-valued links point at when true.
    pub true_id: LinkId,
    /// Singleton node boolean-valued links point at when false.
    pub false_id: LinkId,
}

impl WellKnownIds {
    /// Resolves every canonical node by name under the two packages.
    pub fn resolve<S: LinkStore>(
        store: &S,
        package: LinkId,
        boolean_package: LinkId,
    ) -> Result<Self, ConvertError> {
        let out_of_package = store.select(&Selector::Pattern(LinkPattern {
            from_id: Some(package),
            ..Default::default()
        }))?;
        let contain_type = out_of_package
            .iter()
            .find(|link| is_contain_anchor(link))
            .and_then(|link| link.to_id)
            .ok_or_else(|| ConvertError::TypeResolution {
                name: "Contain".into(),
            })?;

        let fetch = |parent: LinkId, name: &str| -> Result<LinkId, ConvertError> {
            store
                .select(&Selector::NamedChild {
                    parent,
                    contain_type,
                    name: name.to_string(),
                })?
                .first()
                .map(|link| link.id)
                .ok_or_else(|| ConvertError::TypeResolution {
                    name: name.to_string(),
                })
        };

        Ok(WellKnownIds {
            package,
            boolean_package,
            contain_type,
            root_type: fetch(package, "Root")?,
            string_type: fetch(package, ValueKind::Str.type_name())?,
            number_type: fetch(package, ValueKind::Num.type_name())?,
            boolean_type: fetch(package, ValueKind::Bool.type_name())?,
            object_type: fetch(package, ValueKind::Obj.type_name())?,
            array_type: fetch(package, ValueKind::Arr.type_name())?,
            true_id: fetch(boolean_package, "True")?,
            false_id: fetch(boolean_package, "False")?,
        })
    }

    /// The canonical type node for a value shape.
    pub fn type_for_kind(&self, kind: ValueKind) -> LinkId {
        match kind {
            ValueKind::Str => self.string_type,
            ValueKind::Num => self.number_type,
            ValueKind::Bool => self.boolean_type,
            ValueKind::Obj => self.object_type,
            ValueKind::Arr => self.array_type,
        }
    }

    /// Reads the recorded shape back from a type edge, or `None` if the type
    /// is not one of the canonical value shapes.
    pub fn kind_of_type(&self, type_id: LinkId) -> Option<ValueKind> {
        if type_id == self.string_type {
            Some(ValueKind::Str)
        } else if type_id == self.number_type {
            Some(ValueKind::Num)
        } else if type_id == self.boolean_type {
            Some(ValueKind::Bool)
        } else if type_id == self.object_type {
            Some(ValueKind::Obj)
        } else if type_id == self.array_type {
            Some(ValueKind::Arr)
        } else {
            None
        }
    }

    /// The truth singleton a boolean-valued link should point at.
    pub fn truth(&self, value: bool) -> LinkId {
        if value {
            self.true_id
        } else {
            self.false_id
        }
    }
}

/// Whether a link is the self-describing containment anchor: a containment
/// link naming the containment type itself.
fn is_contain_anchor(link: &Link) -> bool {
    link.name_payload() == Some("Contain") && link.to_id == Some(link.type_id)
}
