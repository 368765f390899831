//! In-memory implementation of [`LinkStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. Its semantics are the contract a remote store is expected to
//! honor: insertion-ordered rows, a monotonic id allocator shared by
//! `insert` and `reserve`, and an all-or-nothing `serial` apply (the batch
//! is staged against a copy of the state and committed only if every
//! operation succeeds).

use indexmap::IndexMap;
use std::collections::HashSet;

use objgraph_core::{
    Link, LinkId, LinkInsert, LinkUpdate, Selector, SerialOperation, SerialOutcome,
};

use crate::error::StoreError;
use crate::query::eval_selector;
use crate::traits::LinkStore;

/// The complete mutable state of the backend. Cloned to stage a batch.
#[derive(Debug, Clone)]
struct State {
    /// All rows, keyed by id, in insertion order.
    rows: IndexMap<LinkId, Link>,
    /// Ids handed out by `reserve` but not yet inserted.
    reserved: HashSet<LinkId>,
    /// Next id to allocate. Ids are never reused.
    next_id: u64,
}

impl State {
    fn new() -> Self {
        State {
            rows: IndexMap::new(),
            reserved: HashSet::new(),
            next_id: 1,
        }
    }

    fn alloc(&mut self) -> LinkId {
        let id = LinkId(self.next_id);
        self.next_id += 1;
        id
    }

    fn require(&self, id: LinkId) -> Result<&Link, StoreError> {
        self.rows.get(&id).ok_or(StoreError::LinkNotFound(id))
    }

    fn require_endpoint(&self, link: LinkId, endpoint: LinkId) -> Result<(), StoreError> {
        if self.rows.contains_key(&endpoint) {
            Ok(())
        } else {
            Err(StoreError::MissingEndpoint { link, endpoint })
        }
    }

    fn insert_link(&mut self, insert: LinkInsert) -> Result<Link, StoreError> {
        let id = match insert.id {
            Some(id) => {
                if self.rows.contains_key(&id) {
                    return Err(StoreError::DuplicateId(id));
                }
                if !self.reserved.remove(&id) {
                    return Err(StoreError::IdNotReserved(id));
                }
                id
            }
            None => self.alloc(),
        };
        if let Some(from) = insert.from_id {
            self.require_endpoint(id, from)?;
        }
        if let Some(to) = insert.to_id {
            self.require_endpoint(id, to)?;
        }
        let link = Link {
            id,
            type_id: insert.type_id,
            from_id: insert.from_id,
            to_id: insert.to_id,
            value: None,
        };
        self.rows.insert(id, link.clone());
        Ok(link)
    }

    fn update_link(&mut self, id: LinkId, fields: LinkUpdate) -> Result<Link, StoreError> {
        if let Some(from) = fields.from_id {
            self.require_endpoint(id, from)?;
        }
        if let Some(to) = fields.to_id {
            self.require_endpoint(id, to)?;
        }
        let link = self.rows.get_mut(&id).ok_or(StoreError::LinkNotFound(id))?;
        if let Some(type_id) = fields.type_id {
            link.type_id = type_id;
        }
        if let Some(from) = fields.from_id {
            link.from_id = Some(from);
        }
        if let Some(to) = fields.to_id {
            link.to_id = Some(to);
        }
        Ok(link.clone())
    }

    fn delete_link(&mut self, id: LinkId) -> Result<(), StoreError> {
        // shift_remove keeps the remaining rows in insertion order.
        self.rows
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(StoreError::LinkNotFound(id))
    }

    fn insert_value(
        &mut self,
        link_id: LinkId,
        value: objgraph_core::StoredValue,
    ) -> Result<(), StoreError> {
        let link = self
            .rows
            .get_mut(&link_id)
            .ok_or(StoreError::LinkNotFound(link_id))?;
        if link.value.is_some() {
            return Err(StoreError::DuplicateValue(link_id));
        }
        link.value = Some(value);
        Ok(())
    }

    fn update_value(
        &mut self,
        link_id: LinkId,
        value: objgraph_core::StoredValue,
    ) -> Result<(), StoreError> {
        let link = self
            .rows
            .get_mut(&link_id)
            .ok_or(StoreError::LinkNotFound(link_id))?;
        match &link.value {
            Some(existing) if existing.table() == value.table() => {
                link.value = Some(value);
                Ok(())
            }
            Some(existing) => Err(StoreError::InvalidOperation {
                reason: format!(
                    "value table mismatch on link {link_id}: stored {}, update targets {}",
                    existing.table(),
                    value.table()
                ),
            }),
            None => Err(StoreError::ValueNotFound {
                link: link_id,
                table: value.table(),
            }),
        }
    }

    fn delete_value(
        &mut self,
        table: objgraph_core::ValueTable,
        link_id: LinkId,
    ) -> Result<(), StoreError> {
        let link = self
            .rows
            .get_mut(&link_id)
            .ok_or(StoreError::LinkNotFound(link_id))?;
        match &link.value {
            Some(existing) if existing.table() == table => {
                link.value = None;
                Ok(())
            }
            _ => Err(StoreError::ValueNotFound {
                link: link_id,
                table,
            }),
        }
    }

    fn apply(&mut self, op: &SerialOperation) -> Result<(), StoreError> {
        match op {
            SerialOperation::InsertLink(insert) => self.insert_link(insert.clone()).map(|_| ()),
            SerialOperation::UpdateLink { id, fields } => {
                self.update_link(*id, fields.clone()).map(|_| ())
            }
            SerialOperation::DeleteLink { id } => self.delete_link(*id),
            SerialOperation::InsertValue { link_id, value } => {
                self.insert_value(*link_id, value.clone())
            }
            SerialOperation::UpdateValue { link_id, value } => {
                self.update_value(*link_id, value.clone())
            }
            SerialOperation::DeleteValue { table, link_id } => self.delete_value(*table, *link_id),
        }
    }
}

/// HashMap-backed store with remote-store semantics.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: State,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            state: State::new(),
        }
    }

    /// Number of link rows currently stored.
    pub fn len(&self) -> usize {
        self.state.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.rows.is_empty()
    }

    /// Fetches a single link by id.
    pub fn get(&self, id: LinkId) -> Result<Link, StoreError> {
        self.state.require(id).cloned()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkStore for InMemoryStore {
    fn select(&self, selector: &Selector) -> Result<Vec<Link>, StoreError> {
        Ok(eval_selector(&self.state.rows, selector))
    }

    fn insert(&mut self, insert: LinkInsert) -> Result<Link, StoreError> {
        self.state.insert_link(insert)
    }

    fn update(&mut self, id: LinkId, fields: LinkUpdate) -> Result<Link, StoreError> {
        self.state.update_link(id, fields)
    }

    fn delete(&mut self, id: LinkId) -> Result<(), StoreError> {
        self.state.delete_link(id)
    }

    fn reserve(&mut self, count: usize) -> Result<Vec<LinkId>, StoreError> {
        let ids: Vec<LinkId> = (0..count).map(|_| self.state.alloc()).collect();
        self.state.reserved.extend(ids.iter().copied());
        Ok(ids)
    }

    fn serial(&mut self, operations: &[SerialOperation]) -> Result<SerialOutcome, StoreError> {
        // Stage against a copy; commit only if the whole batch applies.
        let mut staged = self.state.clone();
        for op in operations {
            staged.apply(op)?;
        }
        self.state = staged;
        Ok(SerialOutcome {
            applied: operations.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objgraph_core::{LinkPattern, StoredValue, ValueTable};

    fn store_with_type() -> (InMemoryStore, LinkId) {
        let mut store = InMemoryStore::new();
        // A self-describing type node to hang everything else off.
        let ids = store.reserve(1).unwrap();
        let type_id = ids[0];
        store
            .insert(LinkInsert {
                id: Some(type_id),
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();
        (store, type_id)
    }

    #[test]
    fn insert_allocates_monotonic_ids() {
        let (mut store, type_id) = store_with_type();
        let a = store
            .insert(LinkInsert {
                id: None,
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();
        let b = store
            .insert(LinkInsert {
                id: None,
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();
        assert!(b.id.0 > a.id.0);
    }

    #[test]
    fn explicit_id_must_come_from_reserve() {
        let (mut store, type_id) = store_with_type();
        let err = store
            .insert(LinkInsert {
                id: Some(LinkId(999)),
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::IdNotReserved(LinkId(999))));

        let reserved = store.reserve(1).unwrap();
        let link = store
            .insert(LinkInsert {
                id: Some(reserved[0]),
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();
        assert_eq!(link.id, reserved[0]);
    }

    #[test]
    fn reserved_ids_are_never_reissued() {
        let (mut store, type_id) = store_with_type();
        let reserved = store.reserve(3).unwrap();
        let fresh = store
            .insert(LinkInsert {
                id: None,
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();
        assert!(reserved.iter().all(|id| *id != fresh.id));
    }

    #[test]
    fn edges_require_existing_endpoints() {
        let (mut store, type_id) = store_with_type();
        let err = store
            .insert(LinkInsert::edge(None, type_id, LinkId(404), LinkId(404)))
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingEndpoint { .. }));
    }

    #[test]
    fn value_rows_insert_update_delete() {
        let (mut store, type_id) = store_with_type();
        let link = store
            .insert(LinkInsert {
                id: None,
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();

        store
            .serial(&[SerialOperation::InsertValue {
                link_id: link.id,
                value: StoredValue::String("v1".into()),
            }])
            .unwrap();
        assert_eq!(store.get(link.id).unwrap().name_payload(), Some("v1"));

        // Double insert is rejected.
        let err = store
            .serial(&[SerialOperation::InsertValue {
                link_id: link.id,
                value: StoredValue::String("v2".into()),
            }])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateValue(_)));

        // Cross-table update is rejected.
        let err = store
            .serial(&[SerialOperation::UpdateValue {
                link_id: link.id,
                value: StoredValue::Number(1.0),
            }])
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidOperation { .. }));

        store
            .serial(&[SerialOperation::DeleteValue {
                table: ValueTable::Strings,
                link_id: link.id,
            }])
            .unwrap();
        assert_eq!(store.get(link.id).unwrap().value, None);
    }

    #[test]
    fn serial_is_all_or_nothing() {
        let (mut store, type_id) = store_with_type();
        let before = store.len();
        let reserved = store.reserve(1).unwrap();

        let err = store
            .serial(&[
                SerialOperation::InsertLink(LinkInsert::node(reserved[0], type_id)),
                // Invalid: the referenced link does not exist.
                SerialOperation::DeleteLink { id: LinkId(404) },
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::LinkNotFound(LinkId(404))));
        assert_eq!(store.len(), before, "failed batch must leave no trace");

        // The reserved id is still usable after the failed batch.
        store
            .serial(&[SerialOperation::InsertLink(LinkInsert::node(
                reserved[0],
                type_id,
            ))])
            .unwrap();
        assert_eq!(store.len(), before + 1);
    }

    #[test]
    fn batch_can_reference_rows_created_earlier_in_the_batch() {
        let (mut store, type_id) = store_with_type();
        let ids = store.reserve(2).unwrap();
        store
            .serial(&[
                SerialOperation::InsertLink(LinkInsert::node(ids[0], type_id)),
                SerialOperation::InsertLink(LinkInsert::edge(
                    Some(ids[1]),
                    type_id,
                    ids[0],
                    ids[0],
                )),
                SerialOperation::InsertValue {
                    link_id: ids[1],
                    value: StoredValue::String("k".into()),
                },
            ])
            .unwrap();
        assert_eq!(store.get(ids[1]).unwrap().from_id, Some(ids[0]));
    }

    #[test]
    fn select_by_pattern() {
        let (mut store, type_id) = store_with_type();
        let a = store
            .insert(LinkInsert {
                id: None,
                type_id,
                from_id: None,
                to_id: None,
            })
            .unwrap();
        let hits = store
            .select(&Selector::Pattern(LinkPattern::by_id(a.id)))
            .unwrap();
        assert_eq!(hits, vec![a]);
    }
}
