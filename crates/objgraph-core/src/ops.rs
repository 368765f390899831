//! The serial-operation vocabulary for atomic multi-operation batches.
//!
//! A conversion pass queues [`SerialOperation`]s while walking the value and
//! submits them in one `serial` call; the store applies the whole batch or
//! none of it. Every operation names the storage table it targets (the links
//! table or one of the value tables), an id/match target, and a payload.

use serde::{Deserialize, Serialize};

use crate::id::LinkId;
use crate::link::{StoredValue, ValueTable};

/// Fields for inserting a links-table row.
///
/// `id` is `None` when the store should allocate one, or a reserved id when
/// the caller pre-allocated it (the converter always pre-allocates so child
/// operations can reference the id before the batch is applied).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInsert {
    pub id: Option<LinkId>,
    pub type_id: LinkId,
    pub from_id: Option<LinkId>,
    pub to_id: Option<LinkId>,
}

impl LinkInsert {
    /// A node row with no endpoints.
    pub fn node(id: LinkId, type_id: LinkId) -> Self {
        LinkInsert {
            id: Some(id),
            type_id,
            from_id: None,
            to_id: None,
        }
    }

    /// An edge row with both endpoints.
    pub fn edge(id: Option<LinkId>, type_id: LinkId, from_id: LinkId, to_id: LinkId) -> Self {
        LinkInsert {
            id,
            type_id,
            from_id: Some(from_id),
            to_id: Some(to_id),
        }
    }
}

/// Field-wise patch of a links-table row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkUpdate {
    pub type_id: Option<LinkId>,
    pub from_id: Option<LinkId>,
    pub to_id: Option<LinkId>,
}

impl LinkUpdate {
    /// Patch that redirects only the `to` endpoint (boolean truth edges).
    pub fn redirect_to(to_id: LinkId) -> Self {
        LinkUpdate {
            to_id: Some(to_id),
            ..Default::default()
        }
    }
}

/// One mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SerialOperation {
    /// Insert a links-table row.
    InsertLink(LinkInsert),
    /// Patch fields of an existing links-table row.
    UpdateLink { id: LinkId, fields: LinkUpdate },
    /// Delete a links-table row together with its value row.
    DeleteLink { id: LinkId },
    /// Insert a value row for a link; the table is implied by the payload.
    InsertValue { link_id: LinkId, value: StoredValue },
    /// Overwrite the value row of a link.
    UpdateValue { link_id: LinkId, value: StoredValue },
    /// Delete the value row of a link from a specific table.
    DeleteValue { table: ValueTable, link_id: LinkId },
}

impl SerialOperation {
    /// The storage table this operation targets, for diagnostics.
    pub fn table_name(&self) -> &'static str {
        match self {
            SerialOperation::InsertLink(_)
            | SerialOperation::UpdateLink { .. }
            | SerialOperation::DeleteLink { .. } => "links",
            SerialOperation::InsertValue { value, .. }
            | SerialOperation::UpdateValue { value, .. } => match value.table() {
                ValueTable::Strings => "strings",
                ValueTable::Numbers => "numbers",
                ValueTable::Objects => "objects",
            },
            SerialOperation::DeleteValue { table, .. } => match table {
                ValueTable::Strings => "strings",
                ValueTable::Numbers => "numbers",
                ValueTable::Objects => "objects",
            },
        }
    }

    /// True for the insert variants.
    pub fn is_insert(&self) -> bool {
        matches!(
            self,
            SerialOperation::InsertLink(_) | SerialOperation::InsertValue { .. }
        )
    }
}

/// Result of an atomic batch apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialOutcome {
    /// Number of operations applied (equals the batch length on success).
    pub applied: usize,
}
