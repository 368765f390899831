//! The link record: a typed, directed triple plus an optional value facet.
//!
//! A [`Link`] is the only record shape the store knows. Three type roles
//! drive the conversion algorithm:
//! - **Containment link**: `from` parent, `to` child, string payload holding
//!   the property key it was created for.
//! - **Type edge**: the `type_id` field of an instance link, pointing at the
//!   canonical node for its shape (String/Number/Boolean/Object/Array).
//! - **Boolean truth edge**: a boolean-valued link carries no payload row;
//!   its `to_id` points at the canonical True or False singleton instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::LinkId;

/// A scalar or structured payload stored in one of the value tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    /// Row in the `strings` table.
    String(String),
    /// Row in the `numbers` table.
    Number(f64),
    /// Row in the `objects` table: a free-form structured blob, used to
    /// mirror whole objects for fast denormalized reads.
    Object(serde_json::Value),
}

impl StoredValue {
    /// The value table this payload belongs to.
    pub fn table(&self) -> ValueTable {
        match self {
            StoredValue::String(_) => ValueTable::Strings,
            StoredValue::Number(_) => ValueTable::Numbers,
            StoredValue::Object(_) => ValueTable::Objects,
        }
    }

    /// Borrow the string payload, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copy out the number payload, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StoredValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the structured payload, if this is one.
    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            StoredValue::Object(v) => Some(v),
            _ => None,
        }
    }
}

/// The named value tables of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueTable {
    Strings,
    Numbers,
    Objects,
}

impl fmt::Display for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueTable::Strings => "strings",
            ValueTable::Numbers => "numbers",
            ValueTable::Objects => "objects",
        };
        write!(f, "{name}")
    }
}

/// One record in the links table, joined with its value row (if any).
///
/// `from_id`/`to_id` are `None` for pure nodes (e.g. a freshly created root);
/// edges carry both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    /// Type edge: the link naming this link's type/shape.
    pub type_id: LinkId,
    pub from_id: Option<LinkId>,
    pub to_id: Option<LinkId>,
    /// Value facet, joined from the value table keyed by this link's id.
    pub value: Option<StoredValue>,
}

impl Link {
    /// A node with no endpoints and no value.
    pub fn node(id: LinkId, type_id: LinkId) -> Self {
        Link {
            id,
            type_id,
            from_id: None,
            to_id: None,
            value: None,
        }
    }

    /// The string payload of this link, if it has one.
    pub fn name_payload(&self) -> Option<&str> {
        self.value.as_ref().and_then(StoredValue::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_value_tables() {
        assert_eq!(StoredValue::String("x".into()).table(), ValueTable::Strings);
        assert_eq!(StoredValue::Number(1.0).table(), ValueTable::Numbers);
        assert_eq!(
            StoredValue::Object(serde_json::json!({})).table(),
            ValueTable::Objects
        );
    }

    #[test]
    fn value_table_display() {
        assert_eq!(ValueTable::Strings.to_string(), "strings");
        assert_eq!(ValueTable::Numbers.to_string(), "numbers");
        assert_eq!(ValueTable::Objects.to_string(), "objects");
    }

    #[test]
    fn link_serde_roundtrip() {
        let link = Link {
            id: LinkId(5),
            type_id: LinkId(2),
            from_id: Some(LinkId(1)),
            to_id: Some(LinkId(1)),
            value: Some(StoredValue::String("myStringValue".into())),
        };
        let json = serde_json::to_string(&link).unwrap();
        let back: Link = serde_json::from_str(&json).unwrap();
        assert_eq!(link, back);
    }

    #[test]
    fn name_payload_reads_string_values_only() {
        let mut link = Link::node(LinkId(1), LinkId(2));
        assert_eq!(link.name_payload(), None);
        link.value = Some(StoredValue::Number(3.0));
        assert_eq!(link.name_payload(), None);
        link.value = Some(StoredValue::String("myKey".into()));
        assert_eq!(link.name_payload(), Some("myKey"));
    }
}
