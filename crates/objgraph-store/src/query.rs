//! Selector evaluation over an in-memory link index.
//!
//! Shared by [`InMemoryStore`](crate::memory::InMemoryStore) and
//! [`Minilinks`](crate::cache::Minilinks) so the cache answers exactly the
//! queries the store would, just without I/O. Results come back in row
//! insertion order, which keeps tests and batch construction deterministic.

use indexmap::IndexMap;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::HashSet;

use objgraph_core::{Link, LinkId, Selector};

/// Evaluates a selector against the full link index.
pub(crate) fn eval_selector(links: &IndexMap<LinkId, Link>, selector: &Selector) -> Vec<Link> {
    match selector {
        Selector::Pattern(pattern) => links
            .values()
            .filter(|link| pattern.matches(link))
            .cloned()
            .collect(),
        Selector::NamedChild {
            parent,
            contain_type,
            name,
        } => links
            .values()
            .filter(|link| {
                link.type_id == *contain_type
                    && link.from_id == Some(*parent)
                    && link.name_payload() == Some(name.as_str())
            })
            .filter_map(|contain| contain.to_id)
            .filter_map(|child_id| links.get(&child_id).cloned())
            .collect(),
        Selector::ContainTreeDown { contain_type, root } => {
            contain_tree_down(links, *contain_type, *root)
        }
    }
}

/// The containment closure below `root`: the root link, every containment
/// link reachable from it, and every contained link, transitively.
fn contain_tree_down(
    links: &IndexMap<LinkId, Link>,
    contain_type: LinkId,
    root: LinkId,
) -> Vec<Link> {
    // Adjacency over containment edges only.
    let mut graph: DiGraphMap<u64, ()> = DiGraphMap::new();
    for link in links.values() {
        if link.type_id != contain_type {
            continue;
        }
        if let (Some(from), Some(to)) = (link.from_id, link.to_id) {
            graph.add_edge(from.0, to.0, ());
        }
    }

    let mut reached: HashSet<u64> = HashSet::new();
    reached.insert(root.0);
    if graph.contains_node(root.0) {
        let mut dfs = Dfs::new(&graph, root.0);
        while let Some(node) = dfs.next(&graph) {
            reached.insert(node);
        }
    }

    // Emit in insertion order: reached nodes plus the containment links
    // connecting them.
    links
        .values()
        .filter(|link| {
            if reached.contains(&link.id.0) {
                return true;
            }
            link.type_id == contain_type
                && matches!(link.from_id, Some(from) if reached.contains(&from.0))
                && matches!(link.to_id, Some(to) if reached.contains(&to.0))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use objgraph_core::{LinkPattern, StoredValue};

    const CONTAIN: LinkId = LinkId(2);

    fn index(links: Vec<Link>) -> IndexMap<LinkId, Link> {
        links.into_iter().map(|link| (link.id, link)).collect()
    }

    fn node(id: u64, type_id: u64) -> Link {
        Link::node(LinkId(id), LinkId(type_id))
    }

    fn contain(id: u64, from: u64, to: u64, name: &str) -> Link {
        Link {
            id: LinkId(id),
            type_id: CONTAIN,
            from_id: Some(LinkId(from)),
            to_id: Some(LinkId(to)),
            value: Some(StoredValue::String(name.into())),
        }
    }

    #[test]
    fn named_child_follows_the_name_payload() {
        let links = index(vec![
            node(10, 1),
            node(11, 3),
            node(12, 3),
            contain(20, 10, 11, "first"),
            contain(21, 10, 12, "second"),
        ]);
        let hits = eval_selector(
            &links,
            &Selector::NamedChild {
                parent: LinkId(10),
                contain_type: CONTAIN,
                name: "second".into(),
            },
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, LinkId(12));
    }

    #[test]
    fn named_child_misses_under_wrong_parent() {
        let links = index(vec![node(10, 1), node(11, 3), contain(20, 10, 11, "k")]);
        let hits = eval_selector(
            &links,
            &Selector::NamedChild {
                parent: LinkId(11),
                contain_type: CONTAIN,
                name: "k".into(),
            },
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn contain_tree_down_is_transitive_and_includes_edges() {
        // 10 -> 11 -> 12, with 13 unrelated.
        let links = index(vec![
            node(10, 1),
            node(11, 3),
            node(12, 3),
            node(13, 3),
            contain(20, 10, 11, "a"),
            contain(21, 11, 12, "b"),
            contain(22, 13, 13, "self"),
        ]);
        let hits = eval_selector(
            &links,
            &Selector::ContainTreeDown {
                contain_type: CONTAIN,
                root: LinkId(10),
            },
        );
        let ids: Vec<u64> = hits.iter().map(|link| link.id.0).collect();
        assert_eq!(ids, vec![10, 11, 12, 20, 21]);
    }

    #[test]
    fn contain_tree_down_with_no_children_is_just_the_root() {
        let links = index(vec![node(10, 1), node(11, 3)]);
        let hits = eval_selector(
            &links,
            &Selector::ContainTreeDown {
                contain_type: CONTAIN,
                root: LinkId(10),
            },
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, LinkId(10));
    }

    #[test]
    fn pattern_selector_filters_in_insertion_order() {
        let links = index(vec![node(12, 3), node(10, 3), node(11, 4)]);
        let hits = eval_selector(&links, &Selector::Pattern(LinkPattern::by_type(LinkId(3))));
        let ids: Vec<u64> = hits.iter().map(|link| link.id.0).collect();
        assert_eq!(ids, vec![12, 10]);
    }
}
