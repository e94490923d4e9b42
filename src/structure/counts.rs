//! Per-tree occurrence counts

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::parser::DumpValue;

/// Handle of a tree within a structure, assigned sequentially from 0
pub type TreeId = usize;

/// Occurrence count per tree id, owned by exactly one structure node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts(BTreeMap<TreeId, u64>);

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `tree`, 0 when the tree never reached this node
    pub fn get(&self, tree: TreeId) -> u64 {
        self.0.get(&tree).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, tree: TreeId) {
        *self.0.entry(tree).or_insert(0) += 1;
    }

    /// Additive merge of `other` into `self`
    pub fn union(&mut self, other: &Counts) {
        for (&tree, &count) in &other.0 {
            *self.0.entry(tree).or_insert(0) += count;
        }
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TreeId, u64> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all trees
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn max_tree_id(&self) -> Option<TreeId> {
        self.0.keys().next_back().copied()
    }
}

impl FromIterator<(TreeId, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (TreeId, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (tree, count) in iter {
            *counts.0.entry(tree).or_insert(0) += count;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a TreeId, &'a u64);
    type IntoIter = btree_map::Iter<'a, TreeId, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Rendered as `tree:count` pairs in ascending tree order, e.g. `0:2,3:1`
impl DumpValue for Counts {
    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(tree, count)| format!("{tree}:{count}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn parse_value(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Counts::new());
        }

        text.split(',')
            .map(|pair| -> Result<(TreeId, u64), String> {
                let (tree, count) = pair
                    .split_once(':')
                    .ok_or_else(|| format!("expected tree:count, found {pair:?}"))?;
                let tree = tree
                    .trim()
                    .parse::<TreeId>()
                    .map_err(|e| format!("bad tree id {tree:?}: {e}"))?;
                let count = count
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| format!("bad count {count:?}: {e}"))?;
                Ok((tree, count))
            })
            .collect()
    }
}
