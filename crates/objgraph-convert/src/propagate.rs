//! Upward propagation of a single property change.
//!
//! When one property link's payload is rewritten out-of-band, the mirrored
//! object blobs on its ancestors go stale. [`on_property_changed`] walks the
//! containment chain from the changed link up to the root, rewriting the
//! key path inside every ancestor that carries a mirror blob. Ancestors
//! without a blob are passed over. All rewrites land in one atomic batch.

use objgraph_core::{
    Link, LinkId, LinkPattern, Selector, SerialOperation, SerialOutcome, StoredValue, ValueKind,
};
use objgraph_store::LinkStore;

use crate::converter::fetch_link;
use crate::diag::Diagnostics;
use crate::error::{ConvertError, ConvertFailure};
use crate::resolver::WellKnownIds;

/// A notification that one property link's value changed.
#[derive(Debug, Clone, Copy)]
pub struct PropertyChange {
    pub package: LinkId,
    pub boolean_package: LinkId,
    /// The property link whose value was rewritten.
    pub changed: LinkId,
}

/// Result of a propagation pass.
#[derive(Debug, Clone)]
pub struct PropagateOutcome {
    /// Ancestors whose mirror blobs were rewritten, nearest first.
    pub updated: Vec<LinkId>,
    pub outcome: SerialOutcome,
    pub diagnostics: Diagnostics,
}

/// Rewrites the changed property's new value into every ancestor mirror
/// blob along its containment chain.
///
/// The changed link itself must be reachable by a containment name; a leaf
/// with no containment link is fatal, since its position in any ancestor
/// blob cannot be determined.
pub fn on_property_changed<S: LinkStore>(
    store: &mut S,
    change: PropertyChange,
) -> Result<PropagateOutcome, ConvertFailure> {
    let mut diag = Diagnostics::new();
    match propagate(store, change, &mut diag) {
        Ok((updated, outcome)) => {
            tracing::debug!(
                changed = %change.changed,
                rewritten = updated.len(),
                "property change propagated"
            );
            Ok(PropagateOutcome {
                updated,
                outcome,
                diagnostics: diag,
            })
        }
        Err(error) => Err(ConvertFailure::new(error, diag)),
    }
}

fn propagate<S: LinkStore>(
    store: &mut S,
    change: PropertyChange,
    diag: &mut Diagnostics,
) -> Result<(Vec<LinkId>, SerialOutcome), ConvertError> {
    let wk = WellKnownIds::resolve(store, change.package, change.boolean_package)?;

    let changed = fetch_link(store, change.changed)?;
    let leaf = leaf_json(&wk, &changed)?;

    let mut ops = Vec::new();
    let mut updated = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut current = changed;
    let mut at_leaf = true;
    loop {
        let contain = store
            .select(&Selector::Pattern(LinkPattern::by_type_to(
                wk.contain_type,
                current.id,
            )))?
            .into_iter()
            .next();
        let Some(contain) = contain else {
            if at_leaf {
                return Err(ConvertError::AncestryNameResolution(current.id));
            }
            break;
        };
        let name = contain
            .name_payload()
            .ok_or(ConvertError::AncestryNameResolution(current.id))?;
        // Containment names are the raw input keys, and the mirror blobs are
        // keyed the same way, so the path is used verbatim.
        path.insert(0, name.to_string());
        let parent_id = contain
            .from_id
            .ok_or(ConvertError::AncestryNameResolution(current.id))?;
        let parent = fetch_link(store, parent_id)?;

        if let Some(StoredValue::Object(blob)) = &parent.value {
            let mut blob = blob.clone();
            set_path(&mut blob, &path, leaf.clone());
            ops.push(SerialOperation::UpdateValue {
                link_id: parent.id,
                value: StoredValue::Object(blob),
            });
            updated.push(parent.id);
            diag.debug(format!(
                "mirror on link {} rewritten at path {}",
                parent.id,
                path.join(".")
            ));
        }
        current = parent;
        at_leaf = false;
    }

    let outcome = store.serial(&ops)?;
    Ok((updated, outcome))
}

/// Reads the changed link's current value as JSON. Boolean-shaped links are
/// decoded from their truth edge; everything else must carry a value row.
fn leaf_json(wk: &WellKnownIds, link: &Link) -> Result<serde_json::Value, ConvertError> {
    if wk.kind_of_type(link.type_id) == Some(ValueKind::Bool) {
        return Ok(serde_json::Value::Bool(link.to_id == Some(wk.true_id)));
    }
    match &link.value {
        Some(StoredValue::String(s)) => Ok(serde_json::Value::String(s.clone())),
        Some(StoredValue::Number(n)) => Ok(serde_json::json!(n)),
        Some(StoredValue::Object(v)) => Ok(v.clone()),
        None => Err(ConvertError::MissingValue(link.id)),
    }
}

/// Writes `leaf` at `path` inside a JSON object, creating intermediate
/// objects where the blob disagrees with the containment chain.
fn set_path(target: &mut serde_json::Value, path: &[String], leaf: serde_json::Value) {
    let Some((last, prefix)) = path.split_last() else {
        return;
    };
    let mut cursor = target;
    for key in prefix {
        if !cursor.is_object() {
            *cursor = serde_json::Value::Object(serde_json::Map::new());
        }
        let map = match cursor.as_object_mut() {
            Some(map) => map,
            None => return,
        };
        cursor = map
            .entry(key.clone())
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    }
    if !cursor.is_object() {
        *cursor = serde_json::Value::Object(serde_json::Map::new());
    }
    if let Some(map) = cursor.as_object_mut() {
        map.insert(last.clone(), leaf);
    }
}
