//! Canonical schema bootstrap.
//!
//! Materializes the package of canonical nodes the converter depends on: the
//! containment type, the Root type, one type node per value shape, and the
//! boolean True/False singletons (kept under their own package). The whole
//! graph is written in one atomic batch; calling [`ensure_schema`] on a store
//! that already carries the schema returns the existing handles untouched.

use objgraph_core::{LinkId, LinkInsert, LinkPattern, Selector, SerialOperation, StoredValue};
use objgraph_store::LinkStore;

use crate::error::ConvertError;

/// Entry points into an installed schema, as passed along in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaHandles {
    pub package: LinkId,
    pub boolean_package: LinkId,
}

/// Installs the canonical schema if the store does not already carry one,
/// returning the package handles either way.
pub fn ensure_schema<S: LinkStore>(store: &mut S) -> Result<SchemaHandles, ConvertError> {
    // An installed schema is recognizable by its self-describing containment
    // anchor: a link named "Contain" whose target is its own type.
    let all = store.select(&Selector::Pattern(LinkPattern::default()))?;
    if let Some(anchor) = all
        .iter()
        .find(|link| link.name_payload() == Some("Contain") && link.to_id == Some(link.type_id))
    {
        let package = anchor
            .from_id
            .ok_or(ConvertError::AncestryNameResolution(anchor.id))?;
        let boolean_package = store
            .select(&Selector::NamedChild {
                parent: package,
                contain_type: anchor.type_id,
                name: "boolean".to_string(),
            })?
            .first()
            .map(|link| link.id)
            .ok_or_else(|| ConvertError::TypeResolution {
                name: "boolean".into(),
            })?;
        return Ok(SchemaHandles {
            package,
            boolean_package,
        });
    }

    // 12 nodes plus 11 named containment links.
    let ids = store.reserve(23)?;
    let ty = ids[0];
    let package = ids[1];
    let boolean_package = ids[2];
    let contain = ids[3];
    let root = ids[4];
    let string = ids[5];
    let number = ids[6];
    let boolean = ids[7];
    let object = ids[8];
    let array = ids[9];
    let truth = ids[10];
    let falsity = ids[11];

    let mut ops = Vec::with_capacity(12 + 11 * 2);
    // The meta type node describes itself; everything else hangs off it.
    ops.push(SerialOperation::InsertLink(LinkInsert::node(ty, ty)));
    for id in [
        package,
        boolean_package,
        contain,
        root,
        string,
        number,
        boolean,
        object,
        array,
    ] {
        ops.push(SerialOperation::InsertLink(LinkInsert::node(id, ty)));
    }
    for id in [truth, falsity] {
        ops.push(SerialOperation::InsertLink(LinkInsert::node(id, boolean)));
    }

    let mut edge_ids = ids[12..].iter().copied();
    let mut name = |ops: &mut Vec<SerialOperation>,
                    parent: LinkId,
                    child: LinkId,
                    label: &str|
     -> Result<(), ConvertError> {
        let id = edge_ids.next().ok_or(ConvertError::PoolExhausted)?;
        ops.push(SerialOperation::InsertLink(LinkInsert::edge(
            Some(id),
            contain,
            parent,
            child,
        )));
        ops.push(SerialOperation::InsertValue {
            link_id: id,
            value: StoredValue::String(label.to_string()),
        });
        Ok(())
    };

    name(&mut ops, package, ty, "Type")?;
    name(&mut ops, package, contain, "Contain")?;
    name(&mut ops, package, root, "Root")?;
    name(&mut ops, package, string, "String")?;
    name(&mut ops, package, number, "Number")?;
    name(&mut ops, package, boolean, "Boolean")?;
    name(&mut ops, package, object, "Object")?;
    name(&mut ops, package, array, "Array")?;
    name(&mut ops, package, boolean_package, "boolean")?;
    name(&mut ops, boolean_package, truth, "True")?;
    name(&mut ops, boolean_package, falsity, "False")?;

    store.serial(&ops)?;
    tracing::debug!(%package, %boolean_package, "canonical schema installed");
    Ok(SchemaHandles {
        package,
        boolean_package,
    })
}
