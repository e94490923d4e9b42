//! Root-to-leaf path enumeration
//!
//! Complete paths are every root-to-leaf sequence of a tree. Canonical paths
//! split complete paths at repeated labels so that no label occurs more than
//! twice on any emitted path:
//!
//! - scanning front to back, the first label seen a second time (at a node
//!   that is not the leaf) splits the path in two
//! - the first part runs from the root through that second occurrence, one
//!   full loop of the repeated label
//! - the second part is the prefix through the first occurrence followed by
//!   everything after the second occurrence, and is scanned again
//!
//! A label occurring `k` times on a complete path thus yields `k - 1` loops
//! plus the remainder.

use std::collections::HashSet;

use super::node::{Dfs, Node};

/// A root-to-node sequence of borrowed nodes
pub type Path<'a, V> = Vec<&'a Node<V>>;

/// Lazy root-to-leaf paths.
///
/// The path buffer is truncated to the depth of each visited node before the
/// node is appended, so it always holds the path to the current node.
pub struct CompletePaths<'a, V> {
    dfs: Dfs<'a, V>,
    path: Path<'a, V>,
}

impl<'a, V> CompletePaths<'a, V> {
    /// Paths starting at `seeds` (each seed is the first node of its paths)
    pub fn from_seeds(seeds: impl IntoIterator<Item = &'a Node<V>>) -> Self {
        Self {
            dfs: Dfs::from_seeds(seeds),
            path: Vec::new(),
        }
    }
}

impl<'a, V> Iterator for CompletePaths<'a, V> {
    type Item = Path<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, node) = self.dfs.next()?;
            self.path.truncate(depth);
            self.path.push(node);

            if node.is_leaf() {
                return Some(self.path.clone());
            }
        }
    }
}

/// Lazy canonical (split) paths
pub struct CanonicalPaths<'a, V> {
    complete: CompletePaths<'a, V>,
    pending: Vec<Path<'a, V>>,
}

impl<'a, V> Iterator for CanonicalPaths<'a, V> {
    type Item = Path<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = match self.pending.pop() {
            Some(path) => path,
            None => self.complete.next()?,
        };

        match split_path(&path, |node| node.id.as_str()) {
            Some((looped, rest)) => {
                self.pending.push(rest);
                Some(looped)
            }
            None => Some(path),
        }
    }
}

/// Split `path` at its first non-terminal repeated label.
///
/// Returns `None` when the path needs no split, otherwise the loop through
/// the second occurrence and the remainder that still has to be scanned.
pub fn split_path<T: Clone>(path: &[T], label: impl Fn(&T) -> &str) -> Option<(Vec<T>, Vec<T>)> {
    let last = path.len().checked_sub(1)?;
    let mut visited: HashSet<&str> = HashSet::new();

    for (i, item) in path.iter().enumerate() {
        let id = label(item);
        if visited.insert(id) || i == last {
            continue;
        }

        let first = path.iter().position(|other| label(other) == id)?;
        let looped = path[..=i].to_vec();
        let mut rest = path[..=first].to_vec();
        rest.extend_from_slice(&path[i + 1..]);
        return Some((looped, rest));
    }

    None
}

impl<V> Node<V> {
    /// Every root-to-leaf path below this node
    pub fn complete_paths(&self) -> CompletePaths<'_, V> {
        CompletePaths::from_seeds(self.adj_iter())
    }

    /// Complete paths split so that no label repeats more than twice
    pub fn paths(&self) -> CanonicalPaths<'_, V> {
        CanonicalPaths {
            complete: self.complete_paths(),
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use std::collections::HashMap;

    /// Build a single chain `labels[0] -> labels[1] -> ...`
    fn chain(labels: &[&str]) -> Tree {
        let mut node: Option<Tree> = None;
        for label in labels.iter().rev() {
            let mut parent = Tree::leaf(*label, None);
            if let Some(child) = node.take() {
                parent.add_adj(child);
            }
            node = Some(parent);
        }
        let mut root = Tree::root();
        if let Some(node) = node {
            root.add_adj(node);
        }
        root
    }

    fn ids<V>(path: &Path<'_, V>) -> Vec<String> {
        path.iter().map(|n| n.id.clone()).collect()
    }

    fn canonical(tree: &Tree) -> Vec<Vec<String>> {
        tree.paths().map(|p| ids(&p)).collect()
    }

    #[test]
    fn test_complete_paths_follow_tree_order() {
        let mut root = Tree::root();
        let mut a = Tree::leaf("A", None);
        let mut b = Tree::leaf("B", None);
        b.add_adj(Tree::leaf("C", None));
        a.add_adj(b);
        a.add_adj(Tree::leaf("D", None));
        root.add_adj(a);
        root.add_adj(Tree::leaf("E", None));

        let paths: Vec<Vec<String>> = root.complete_paths().map(|p| ids(&p)).collect();
        assert_eq!(
            paths,
            vec![
                vec!["A", "B", "C"],
                vec!["A", "D"],
                vec!["E"],
            ]
        );
    }

    #[test]
    fn test_empty_tree_has_no_paths() {
        let root = Tree::root();
        assert_eq!(root.complete_paths().count(), 0);
        assert_eq!(root.paths().count(), 0);
    }

    #[test]
    fn test_split_abab() {
        let tree = chain(&["A", "B", "A", "B"]);
        assert_eq!(
            canonical(&tree),
            vec![vec!["A", "B", "A"], vec!["A", "B"]]
        );
    }

    #[test]
    fn test_repeat_at_leaf_is_not_split() {
        let tree = chain(&["A", "B", "A"]);
        assert_eq!(canonical(&tree), vec![vec!["A", "B", "A"]]);
    }

    #[test]
    fn test_triple_repeat_yields_two_loops() {
        let tree = chain(&["A", "A", "A"]);
        assert_eq!(canonical(&tree), vec![vec!["A", "A"], vec!["A", "A"]]);

        let tree = chain(&["E", "X", "E", "Y", "E", "Z"]);
        assert_eq!(
            canonical(&tree),
            vec![
                vec!["E", "X", "E"],
                vec!["E", "Y", "E"],
                vec!["E", "Z"],
            ]
        );
    }

    #[test]
    fn test_split_uses_first_repeated_label() {
        let tree = chain(&["A", "B", "C", "B", "A", "D"]);
        assert_eq!(
            canonical(&tree),
            vec![
                vec!["A", "B", "C", "B"],
                vec!["A", "B", "A"],
                vec!["A", "D"],
            ]
        );
    }

    #[test]
    fn test_no_label_repeats_more_than_twice() {
        let tree = chain(&[
            "Expr", "Add", "Expr", "Add", "Expr", "Sub", "Expr", "Add", "Expr", "Lit",
        ]);
        for path in tree.paths() {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for node in &path {
                *counts.entry(node.id.as_str()).or_default() += 1;
            }
            assert!(counts.values().all(|&c| c <= 2), "{:?}", ids(&path));
        }
    }

    #[test]
    fn test_split_path_on_labels() {
        let path = ["A", "B", "A", "C"];
        let (looped, rest) = split_path(&path, |s| *s).unwrap();
        assert_eq!(looped, vec!["A", "B", "A"]);
        assert_eq!(rest, vec!["A", "C"]);
        assert!(split_path(&["A", "B"], |s| *s).is_none());
        assert!(split_path::<&str>(&[], |s| *s).is_none());
    }
}
