//! Count matrices and predicate queries over a structure
//!
//! Given distinct paths `Y = {y1 .. yK}`, the trees `T = {t1 .. tM}` of a
//! structure and `C(y, t)` the number of times path `y` occurs in tree `t`,
//! a query with activation `A` counts the trees `t` for which
//! `A([C(y1, t), .., C(yK, t)])` holds.
//!
//! A path that does not exist in the structure counts 0 for every tree.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use super::{Counts, StructureError, TreeId, TreeStructure};
use crate::tree::Node;

/// Separator between labels in the textual form of a path
pub const PATH_SEPARATOR: &str = "/";

/// Split a textual path such as `Expr/Add/Expr` into labels
pub fn parse_path(text: &str) -> Vec<String> {
    text.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read-only query interface over one structure
pub struct StructureQueryTool<'s> {
    structure: &'s TreeStructure,
}

impl<'s> StructureQueryTool<'s> {
    pub fn new(structure: &'s TreeStructure) -> Self {
        Self { structure }
    }

    /// Total count per tree over the nodes at the end of `paths`.
    ///
    /// `paths = None` sums over every node of the structure; `trees = None`
    /// selects every tree id. Every selected tree appears in the result, with
    /// 0 when no selected node counts it.
    pub fn matrix(
        &self,
        paths: Option<&[Vec<String>]>,
        trees: Option<&[TreeId]>,
    ) -> Result<BTreeMap<TreeId, u64>, StructureError> {
        let selected: BTreeSet<TreeId> = match trees {
            Some(ids) => {
                for &id in ids {
                    self.structure.check_tree_id(id)?;
                }
                ids.iter().copied().collect()
            }
            None => (0..self.structure.n_trees()).collect(),
        };

        let nodes: Vec<&Node<Counts>> = match paths {
            Some(paths) => paths.iter().filter_map(|path| self.resolve(path)).collect(),
            None => self.structure.root().dfs().map(|(_, node)| node).collect(),
        };

        let mut totals: BTreeMap<TreeId, u64> = selected.iter().map(|&id| (id, 0)).collect();
        for node in nodes {
            for (&id, total) in totals.iter_mut() {
                *total += node.value.get(id);
            }
        }

        Ok(totals)
    }

    /// Number of trees whose count vector over `paths` satisfies `activation`
    pub fn query<F>(&self, paths: &[Vec<String>], activation: F) -> usize
    where
        F: Fn(&[u64]) -> bool,
    {
        let nodes: Vec<Option<&Node<Counts>>> = paths.iter().map(|path| self.resolve(path)).collect();

        let mut counts: Vec<u64> = Vec::with_capacity(nodes.len());
        let mut n_activations = 0;

        for tree in 0..self.structure.n_trees() {
            counts.clear();
            counts.extend(
                nodes
                    .iter()
                    .map(|node| node.map_or(0, |node| node.value.get(tree))),
            );

            if activation(&counts) {
                n_activations += 1;
            }
        }

        n_activations
    }

    fn resolve(&self, path: &[String]) -> Option<&'s Node<Counts>> {
        let node = self.structure.get_path(path);
        if node.is_none() {
            debug!("path {} not in structure, counting 0", path.join(PATH_SEPARATOR));
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::read_tree;

    fn scenario() -> TreeStructure {
        let mut structure = TreeStructure::new();
        structure.add_tree(&read_tree("A\n| B\n| | A\n| | | B\n".as_bytes()).unwrap());
        structure.add_tree(&read_tree("A\n| C\n".as_bytes()).unwrap());
        structure
    }

    fn paths(texts: &[&str]) -> Vec<Vec<String>> {
        texts.iter().map(|text| parse_path(text)).collect()
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(parse_path("Expr/Add/Expr"), vec!["Expr", "Add", "Expr"]);
        assert_eq!(parse_path(" Expr / Lit "), vec!["Expr", "Lit"]);
        assert!(parse_path("").is_empty());
    }

    #[test]
    fn test_matrix_single_path() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);

        let matrix = tool.matrix(Some(&paths(&["A"])[..]), None).unwrap();
        assert_eq!(matrix, BTreeMap::from([(0, 2), (1, 1)]));
    }

    #[test]
    fn test_matrix_sums_paths_and_selects_trees() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);

        let matrix = tool
            .matrix(Some(&paths(&["A", "A/B", "A/C", "Missing/Path"])[..]), Some(&[1][..]))
            .unwrap();
        assert_eq!(matrix, BTreeMap::from([(1, 2)]));
    }

    #[test]
    fn test_matrix_over_whole_structure() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);

        // A + A/B + A/B/A for tree 0, A + A/C for tree 1
        let matrix = tool.matrix(None, None).unwrap();
        assert_eq!(matrix, BTreeMap::from([(0, 5), (1, 2)]));
    }

    #[test]
    fn test_matrix_rejects_unknown_tree() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);

        let err = tool.matrix(None, Some(&[0, 2][..])).unwrap_err();
        assert!(matches!(
            err,
            StructureError::InvalidTreeId { id: 2, n_trees: 2 }
        ));
    }

    #[test]
    fn test_query_counts_activated_trees() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);
        let query_paths = paths(&["A/B", "A/C"]);

        assert_eq!(tool.query(&query_paths, |c| c[0] > 0), 1);
        assert_eq!(tool.query(&query_paths, |c| c[0] > 0 || c[1] > 0), 2);
        assert_eq!(tool.query(&query_paths, |c| c[0] > 0 && c[1] > 0), 0);
        assert_eq!(tool.query(&query_paths, |c| c == [2, 0]), 1);
    }

    #[test]
    fn test_query_missing_path_counts_zero() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);

        let query_paths = paths(&["A/Z"]);
        assert_eq!(tool.query(&query_paths, |c| c == [0]), 2);
    }

    #[test]
    fn test_query_without_paths() {
        let structure = scenario();
        let tool = StructureQueryTool::new(&structure);

        assert_eq!(tool.query(&[], |c| c.is_empty()), 2);
        assert_eq!(tool.query(&[], |_| false), 0);
    }
}
