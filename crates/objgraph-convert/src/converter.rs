//! The object-to-links converter.
//!
//! One pass maps a JSON-like object onto typed links under a root node. The
//! pass has three phases:
//!
//! 1. **Init** (cold): resolve canonical nodes, fetch or create the root,
//!    prime the [`Minilinks`] cache with the containment tree below it, and
//!    reserve every link id the pass could need.
//! 2. **Walk** (hot): recurse over the value, answering every
//!    "does this property already exist" question from the cache and queuing
//!    [`SerialOperation`]s. No store calls happen here.
//! 3. **Apply**: submit the whole queue in one atomic `serial` call.
//!
//! Identity is positional: a property is "the same" as an existing link when
//! a containment link from the parent carries the property key as its string
//! payload. The shape recorded on an existing link (its type edge) must match
//! the incoming value's shape; a mismatch aborts the pass before anything is
//! submitted.

use indexmap::IndexMap;
use smallvec::SmallVec;

use objgraph_core::{
    CoreError, Link, LinkId, LinkInsert, LinkUpdate, Selector, SerialOperation, SerialOutcome,
    StoredValue, Value,
};
use objgraph_store::{LinkStore, Minilinks};

use crate::diag::Diagnostics;
use crate::error::{ConvertError, ConvertFailure};
use crate::names;
use crate::options::ConverterOptions;
use crate::pool::{links_to_reserve, IdPool};
use crate::resolver::WellKnownIds;
use crate::schema::SchemaHandles;

/// Chain of ancestor property keys, used for diagnostics.
type NameChain = SmallVec<[String; 8]>;

/// Everything needed to run one conversion pass.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// Package holding the canonical type nodes.
    pub package: LinkId,
    /// Package holding the boolean True/False singletons.
    pub boolean_package: LinkId,
    /// Existing root to convert under; a fresh Root node is created when
    /// absent.
    pub root_id: Option<LinkId>,
    /// Node the converted properties attach to; defaults to the root.
    pub result_id: Option<LinkId>,
    /// The object to convert. Must be a JSON object at the top level.
    pub obj: serde_json::Value,
    pub options: ConverterOptions,
}

impl ConvertRequest {
    /// A request with default options, rooted at a fresh node.
    pub fn new(schema: &SchemaHandles, obj: serde_json::Value) -> Self {
        ConvertRequest {
            package: schema.package,
            boolean_package: schema.boolean_package,
            root_id: None,
            result_id: None,
            obj,
            options: ConverterOptions::default(),
        }
    }
}

/// Result of a completed conversion pass.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    /// The root node (pre-existing or freshly created).
    pub root_id: LinkId,
    /// The node the properties were attached to.
    pub result_id: LinkId,
    /// Store outcome of the atomic batch.
    pub outcome: SerialOutcome,
    /// Collected pass log.
    pub diagnostics: Diagnostics,
}

/// Success of a conversion call. The pass log is carried either way.
#[derive(Debug, Clone)]
pub enum Conversion {
    /// At least one property was processed and the batch was applied.
    Converted(ConvertOutcome),
    /// The object had no convertible properties; nothing was written. Skip
    /// warnings, if any, are in the carried log.
    Empty(Diagnostics),
}

impl Conversion {
    /// The outcome, if anything was converted.
    pub fn into_outcome(self) -> Option<ConvertOutcome> {
        match self {
            Conversion::Converted(outcome) => Some(outcome),
            Conversion::Empty(_) => None,
        }
    }

    /// The collected pass log, converted or not.
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Conversion::Converted(outcome) => &outcome.diagnostics,
            Conversion::Empty(diag) => diag,
        }
    }
}

/// Converts `request.obj` into links under its root, in one atomic batch.
///
/// Returns [`Conversion::Empty`] when the object has no properties (after
/// unsupported ones are skipped); nothing is written in that case. Failures
/// come back as [`ConvertFailure`] so the log collected up to the error is
/// not lost.
pub fn convert<S: LinkStore>(
    store: &mut S,
    request: ConvertRequest,
) -> Result<Conversion, ConvertFailure> {
    match ObjectToLinksConverter::init(store, request)? {
        ConvertStart::Ready(converter) => converter.convert().map(Conversion::Converted),
        ConvertStart::Empty(diag) => Ok(Conversion::Empty(diag)),
    }
}

/// Result of the cold phase: a primed pass, or the empty-object short
/// circuit with the log collected so far.
pub enum ConvertStart<'a, S: LinkStore> {
    Ready(ObjectToLinksConverter<'a, S>),
    Empty(Diagnostics),
}

/// A primed conversion pass: canonical ids resolved, cache filled, id pool
/// reserved. Consumed by [`ObjectToLinksConverter::convert`].
pub struct ObjectToLinksConverter<'a, S: LinkStore> {
    store: &'a mut S,
    cache: Minilinks,
    wk: WellKnownIds,
    options: ConverterOptions,
    root: Link,
    result: Link,
    obj: IndexMap<String, Value>,
    pool: IdPool,
    diag: Diagnostics,
}

/// State of the cold phase, minus the log it was collected under.
struct Primed<'a, S: LinkStore> {
    store: &'a mut S,
    cache: Minilinks,
    wk: WellKnownIds,
    options: ConverterOptions,
    root: Link,
    result: Link,
    obj: IndexMap<String, Value>,
    pool: IdPool,
}

impl<'a, S: LinkStore> ObjectToLinksConverter<'a, S> {
    /// Runs the cold phase. The collected log rides on every arm: the primed
    /// converter, the empty short circuit, and the failure.
    pub fn init(
        store: &'a mut S,
        request: ConvertRequest,
    ) -> Result<ConvertStart<'a, S>, ConvertFailure> {
        let mut diag = Diagnostics::new();
        match Self::prime(store, request, &mut diag) {
            Ok(Some(primed)) => Ok(ConvertStart::Ready(ObjectToLinksConverter {
                store: primed.store,
                cache: primed.cache,
                wk: primed.wk,
                options: primed.options,
                root: primed.root,
                result: primed.result,
                obj: primed.obj,
                pool: primed.pool,
                diag,
            })),
            Ok(None) => Ok(ConvertStart::Empty(diag)),
            Err(error) => Err(ConvertFailure::new(error, diag)),
        }
    }

    fn prime(
        store: &'a mut S,
        request: ConvertRequest,
        diag: &mut Diagnostics,
    ) -> Result<Option<Primed<'a, S>>, ConvertError> {
        let wk = WellKnownIds::resolve(store, request.package, request.boolean_package)?;

        let obj = match sanitize(&request.obj, "$", diag, &request.options)? {
            Some(Value::Obj(map)) => map,
            Some(other) => {
                return Err(CoreError::NotAnObject {
                    found: other.kind().to_string(),
                }
                .into())
            }
            None => {
                return Err(CoreError::NotAnObject {
                    found: "null".into(),
                }
                .into())
            }
        };
        if obj.is_empty() {
            diag.debug("object has no convertible properties, nothing to do");
            return Ok(None);
        }

        let root = match request.root_id {
            Some(id) => fetch_link(store, id)?,
            None => store.insert(LinkInsert {
                id: None,
                type_id: wk.root_type,
                from_id: None,
                to_id: None,
            })?,
        };
        let result = match request.result_id {
            Some(id) => fetch_link(store, id)?,
            None => root.clone(),
        };

        let mut cache = Minilinks::new();
        cache.apply(store.select(&Selector::ContainTreeDown {
            contain_type: wk.contain_type,
            root: root.id,
        })?);
        if result.id != root.id {
            cache.apply(store.select(&Selector::ContainTreeDown {
                contain_type: wk.contain_type,
                root: result.id,
            })?);
        }

        let reserve: usize = obj.values().map(links_to_reserve).sum();
        let pool = IdPool::new(store.reserve(reserve)?);
        tracing::debug!(
            root = %root.id,
            cached = cache.len(),
            reserved = reserve,
            "conversion pass initialized"
        );

        Ok(Some(Primed {
            store,
            cache,
            wk,
            options: request.options,
            root,
            result,
            obj,
            pool,
        }))
    }

    /// Runs the hot walk and applies the queued batch. On failure the log
    /// collected up to the error rides on the [`ConvertFailure`].
    pub fn convert(mut self) -> Result<ConvertOutcome, ConvertFailure> {
        let mut ops = Vec::new();
        let obj = std::mem::take(&mut self.obj);
        let result = self.result.clone();
        if let Err(error) = self.apply_object(&mut ops, &result, &obj, true, &NameChain::new()) {
            return Err(ConvertFailure::new(error, self.diag));
        }

        let outcome = match self.store.serial(&ops) {
            Ok(outcome) => outcome,
            Err(error) => return Err(ConvertFailure::new(error, self.diag)),
        };
        tracing::debug!(
            applied = outcome.applied,
            unused_ids = self.pool.remaining(),
            "conversion batch applied"
        );
        Ok(ConvertOutcome {
            root_id: self.root.id,
            result_id: self.result.id,
            outcome,
            diagnostics: self.diag,
        })
    }

    /// Updates-or-inserts every property of `map` under `link`.
    fn apply_object(
        &mut self,
        ops: &mut Vec<SerialOperation>,
        link: &Link,
        map: &IndexMap<String, Value>,
        is_root: bool,
        parents: &NameChain,
    ) -> Result<(), ConvertError> {
        if !is_root && self.options.mirror_object_values {
            let blob = StoredValue::Object(object_json(map));
            // The mirror row may be missing if mirroring was off when the
            // node was first inserted.
            if link.value.is_some() {
                ops.push(SerialOperation::UpdateValue {
                    link_id: link.id,
                    value: blob,
                });
            } else {
                ops.push(SerialOperation::InsertValue {
                    link_id: link.id,
                    value: blob,
                });
            }
        }
        for (key, value) in map {
            self.apply_property(ops, link, key, value, parents)?;
        }
        Ok(())
    }

    fn apply_property(
        &mut self,
        ops: &mut Vec<SerialOperation>,
        parent: &Link,
        key: &str,
        value: &Value,
        parents: &NameChain,
    ) -> Result<(), ConvertError> {
        let property = names::compound_name(parents, key);
        let existing = self
            .cache
            .query(&Selector::NamedChild {
                parent: parent.id,
                contain_type: self.wk.contain_type,
                name: key.to_string(),
            })
            .into_iter()
            .next();
        match existing {
            Some(child) => {
                self.diag
                    .debug(format!("property {property} found as link {}", child.id));
                self.update_property(ops, &child, key, value, parents)
            }
            None => {
                self.diag
                    .debug(format!("property {property} not found, inserting"));
                self.insert_property(ops, parent.id, key, value, parents)
            }
        }
    }

    /// Re-points an existing property link at the incoming value. The
    /// recorded shape must match; arrays are rebuilt rather than diffed.
    fn update_property(
        &mut self,
        ops: &mut Vec<SerialOperation>,
        child: &Link,
        key: &str,
        value: &Value,
        parents: &NameChain,
    ) -> Result<(), ConvertError> {
        let recorded = self
            .wk
            .kind_of_type(child.type_id)
            .ok_or(ConvertError::UnknownShape {
                link: child.id,
                type_id: child.type_id,
            })?;
        let incoming = value.kind();
        if recorded != incoming {
            return Err(ConvertError::ShapeChanged {
                key: key.to_string(),
                recorded,
                incoming,
            });
        }
        match value {
            Value::Str(s) => ops.push(SerialOperation::UpdateValue {
                link_id: child.id,
                value: StoredValue::String(s.clone()),
            }),
            Value::Num(n) => ops.push(SerialOperation::UpdateValue {
                link_id: child.id,
                value: StoredValue::Number(*n),
            }),
            Value::Bool(b) => ops.push(SerialOperation::UpdateLink {
                id: child.id,
                fields: LinkUpdate::redirect_to(self.wk.truth(*b)),
            }),
            Value::Obj(map) => {
                let chain = extend(parents, key);
                self.apply_object(ops, child, map, false, &chain)?;
            }
            Value::Arr(items) => self.rebuild_array(ops, child, items, key, parents)?,
        }
        Ok(())
    }

    /// Drops everything contained below the array node and re-inserts the
    /// incoming elements as fresh links.
    fn rebuild_array(
        &mut self,
        ops: &mut Vec<SerialOperation>,
        container: &Link,
        items: &[Value],
        key: &str,
        parents: &NameChain,
    ) -> Result<(), ConvertError> {
        let subtree = self.cache.query(&Selector::ContainTreeDown {
            contain_type: self.wk.contain_type,
            root: container.id,
        });
        let mut dropped = 0usize;
        for link in &subtree {
            if link.id == container.id {
                continue;
            }
            ops.push(SerialOperation::DeleteLink { id: link.id });
            dropped += 1;
        }
        self.diag.debug(format!(
            "array {} rebuilt: {dropped} links dropped, {} incoming elements",
            names::compound_name(parents, key),
            items.len()
        ));
        let chain = extend(parents, key);
        for (index, item) in items.iter().enumerate() {
            self.insert_property(ops, container.id, &index.to_string(), item, &chain)?;
        }
        Ok(())
    }

    /// Queues the inserts materializing `value` as a fresh node named `key`
    /// under `parent`: the node link (with its type edge and, for scalars,
    /// its value row) followed by the containment link carrying the key.
    fn insert_property(
        &mut self,
        ops: &mut Vec<SerialOperation>,
        parent: LinkId,
        key: &str,
        value: &Value,
        parents: &NameChain,
    ) -> Result<(), ConvertError> {
        let node_id = self.pool.pop()?;
        let contain_id = self.pool.pop()?;
        let type_id = self.wk.type_for_kind(value.kind());
        match value {
            Value::Str(s) => {
                ops.push(SerialOperation::InsertLink(LinkInsert::edge(
                    Some(node_id),
                    type_id,
                    parent,
                    parent,
                )));
                ops.push(SerialOperation::InsertValue {
                    link_id: node_id,
                    value: StoredValue::String(s.clone()),
                });
            }
            Value::Num(n) => {
                ops.push(SerialOperation::InsertLink(LinkInsert::edge(
                    Some(node_id),
                    type_id,
                    parent,
                    parent,
                )));
                ops.push(SerialOperation::InsertValue {
                    link_id: node_id,
                    value: StoredValue::Number(*n),
                });
            }
            // Booleans carry no value row; the link points at the
            // True/False singleton instead.
            Value::Bool(b) => {
                ops.push(SerialOperation::InsertLink(LinkInsert::edge(
                    Some(node_id),
                    type_id,
                    parent,
                    self.wk.truth(*b),
                )));
            }
            Value::Obj(map) => {
                ops.push(SerialOperation::InsertLink(LinkInsert::edge(
                    Some(node_id),
                    type_id,
                    parent,
                    parent,
                )));
                if self.options.mirror_object_values {
                    ops.push(SerialOperation::InsertValue {
                        link_id: node_id,
                        value: StoredValue::Object(object_json(map)),
                    });
                }
                let chain = extend(parents, key);
                for (child_key, child_value) in map {
                    self.insert_property(ops, node_id, child_key, child_value, &chain)?;
                }
            }
            Value::Arr(items) => {
                ops.push(SerialOperation::InsertLink(LinkInsert::edge(
                    Some(node_id),
                    type_id,
                    parent,
                    parent,
                )));
                let chain = extend(parents, key);
                for (index, item) in items.iter().enumerate() {
                    self.insert_property(ops, node_id, &index.to_string(), item, &chain)?;
                }
            }
        }
        ops.push(SerialOperation::InsertLink(LinkInsert::edge(
            Some(contain_id),
            self.wk.contain_type,
            parent,
            node_id,
        )));
        ops.push(SerialOperation::InsertValue {
            link_id: contain_id,
            value: StoredValue::String(key.to_string()),
        });
        Ok(())
    }
}

/// Point lookup returning the full row, or [`ConvertError::LinkNotFound`].
pub(crate) fn fetch_link<S: LinkStore>(store: &S, id: LinkId) -> Result<Link, ConvertError> {
    store
        .select(&Selector::by_id(id))?
        .into_iter()
        .next()
        .ok_or(ConvertError::LinkNotFound(id))
}

fn extend(parents: &NameChain, key: &str) -> NameChain {
    let mut chain = parents.clone();
    chain.push(key.to_string());
    chain
}

fn object_json(map: &IndexMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

/// Converts raw JSON into the typed value model. Unsupported values (nulls,
/// non-finite numbers) are dropped with a warning when `skip_unsupported` is
/// set, and fail the pass otherwise. Returns `None` when the value itself is
/// unsupported.
fn sanitize(
    json: &serde_json::Value,
    path: &str,
    diag: &mut Diagnostics,
    options: &ConverterOptions,
) -> Result<Option<Value>, ConvertError> {
    let unsupported = |found: String, diag: &mut Diagnostics| -> Result<Option<Value>, ConvertError> {
        if options.skip_unsupported {
            diag.warn(format!("skipping unsupported value ({found}) at {path}"));
            Ok(None)
        } else {
            Err(CoreError::UnsupportedValue { found }.into())
        }
    };
    match json {
        serde_json::Value::Null => unsupported(format!("null at {path}"), diag),
        serde_json::Value::Bool(b) => Ok(Some(Value::Bool(*b))),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(num) => Ok(Some(Value::Num(num))),
            None => unsupported(format!("non-representable number {n} at {path}"), diag),
        },
        serde_json::Value::String(s) => Ok(Some(Value::Str(s.clone()))),
        serde_json::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let child_path = format!("{path}[{index}]");
                if let Some(value) = sanitize(item, &child_path, diag, options)? {
                    out.push(value);
                }
            }
            Ok(Some(Value::Arr(out)))
        }
        serde_json::Value::Object(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (key, val) in map {
                let child_path = format!("{path}.{key}");
                if let Some(value) = sanitize(val, &child_path, diag, options)? {
                    out.insert(key.clone(), value);
                }
            }
            Ok(Some(Value::Obj(out)))
        }
    }
}
