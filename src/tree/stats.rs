//! Per-label bounds over a collection of trees
//!
//! Each statistic maps a label to the fewest and most times something was
//! observed for it: occurrences on a root-to-leaf path, children per node,
//! or children with a given label per node.

use std::collections::{BTreeMap, HashMap};

use super::node::Node;

/// `(min, max)` over every observation
pub type Bounds = (usize, usize);

fn record(bounds: &mut BTreeMap<String, Bounds>, label: &str, count: usize) {
    match bounds.get_mut(label) {
        Some((min, max)) => {
            *min = (*min).min(count);
            *max = (*max).max(count);
        }
        None => {
            bounds.insert(label.to_string(), (count, count));
        }
    }
}

/// Per label, the fewest and most times it occurs on a complete path that
/// contains it at least once, across all `trees`.
pub fn label_occurrence_bounds<'a, V: 'a>(
    trees: impl IntoIterator<Item = &'a Node<V>>,
) -> BTreeMap<String, Bounds> {
    let mut bounds = BTreeMap::new();

    for tree in trees {
        for path in tree.complete_paths() {
            let mut occurrences: HashMap<&str, usize> = HashMap::new();
            for node in &path {
                *occurrences.entry(node.id.as_str()).or_default() += 1;
            }

            for (label, count) in occurrences {
                record(&mut bounds, label, count);
            }
        }
    }

    bounds
}

/// Per label, the fewest and most children of any node with that label.
/// Leaves count as 0.
pub fn adjacency_bounds<'a, V: 'a>(
    trees: impl IntoIterator<Item = &'a Node<V>>,
) -> BTreeMap<String, Bounds> {
    let mut bounds = BTreeMap::new();

    for tree in trees {
        for (_, node) in tree.dfs() {
            record(&mut bounds, &node.id, node.children.len());
        }
    }

    bounds
}

/// Per parent label and child label, the fewest and most children with that
/// label under one parent node.
///
/// Only parents that have at least one such child are observed, so an edge
/// never gets a minimum of 0. Every parent label has an entry, empty when it
/// only ever appears as a leaf.
pub fn edge_bounds<'a, V: 'a>(
    trees: impl IntoIterator<Item = &'a Node<V>>,
) -> BTreeMap<String, BTreeMap<String, Bounds>> {
    let mut bounds: BTreeMap<String, BTreeMap<String, Bounds>> = BTreeMap::new();

    for tree in trees {
        for (_, node) in tree.dfs() {
            let mut per_label: HashMap<&str, usize> = HashMap::new();
            for child in node.children.nodes() {
                *per_label.entry(child.id.as_str()).or_default() += 1;
            }

            let edges = bounds.entry(node.id.clone()).or_default();
            for (child, count) in per_label {
                record(edges, child, count);
            }
        }
    }

    bounds
}
