//! Aggregated path-count structure
//!
//! A [`TreeStructure`] is a keyed tree merging the canonical paths of many
//! parse trees. Each node maps tree ids to the number of canonical paths of
//! that tree passing through the node's position.
//!
//! Two aggregation rules coexist:
//! - [`TreeStructure::add_tree`] walks the *canonical* paths of a parse tree
//!   and adds 1 for that tree at every node on each path.
//! - [`TreeStructure::add_counts`] walks the *complete* paths of another
//!   structure and adds that node's whole count map at every node on each
//!   path, so a node is merged once per leaf below it.
//!
//! [`TreeStructure::merge`] is the node-for-node union used to fold structures
//! built independently.

mod counts;
mod query;

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path as FsPath;

use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use crate::output::{render_to_string, write_output, OutputError};
use crate::parser::{read_entries, DumpReader, ParseError};
use crate::tree::{AdjacencyKind, CompletePaths, Node, Path, TreeError, HEAD};

pub use counts::{Counts, TreeId};
pub use query::{parse_path, StructureQueryTool, PATH_SEPARATOR};

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Tree id {id} is out of range (structure holds {n_trees} trees)")]
    InvalidTreeId { id: TreeId, n_trees: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Shared count tree over every tree added so far
#[derive(Debug, Clone)]
pub struct TreeStructure {
    root: Node<Counts>,
    n_trees: usize,
}

impl Default for TreeStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStructure {
    pub fn new() -> Self {
        Self::with_trees(0)
    }

    /// An empty structure whose next tree id is `n_trees`
    pub fn with_trees(n_trees: usize) -> Self {
        Self {
            root: Node::head(AdjacencyKind::Keyed),
            n_trees,
        }
    }

    /// Number of tree ids handed out; valid ids are `0..n_trees`
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn root(&self) -> &Node<Counts> {
        &self.root
    }

    /// Aggregate the canonical paths of `tree` under a fresh tree id
    pub fn add_tree<V>(&mut self, tree: &Node<V>) -> TreeId {
        let tree_id = self.n_trees;
        self.n_trees += 1;

        let mut n_paths = 0;
        for path in tree.paths() {
            self.increment_path(path.iter().map(|node| node.id.as_str()), tree_id);
            n_paths += 1;
        }

        debug!("added tree {tree_id} ({n_paths} canonical paths)");
        tree_id
    }

    /// Walk `path` from the root, creating missing nodes, and add 1 for
    /// `tree_id` at every node along the way
    pub fn add_path<I, S>(&mut self, path: I, tree_id: TreeId) -> Result<(), StructureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_tree_id(tree_id)?;
        self.increment_path(path, tree_id);
        Ok(())
    }

    fn increment_path<I, S>(&mut self, path: I, tree_id: TreeId)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut curr = &mut self.root;
        for label in path {
            curr = child_entry(curr, label.as_ref());
            curr.value.increment(tree_id);
        }
    }

    pub fn check_tree_id(&self, id: TreeId) -> Result<(), StructureError> {
        if id < self.n_trees {
            Ok(())
        } else {
            Err(StructureError::InvalidTreeId {
                id,
                n_trees: self.n_trees,
            })
        }
    }

    /// Union the count maps along every complete path of `other` into `self`.
    ///
    /// A node of `other` contributes once per complete path through it. This
    /// is not the same as re-adding the original trees; see [`Self::merge`].
    pub fn add_counts(&mut self, other: &TreeStructure) {
        self.absorb(other.root.complete_paths());
        self.n_trees = self.n_trees.max(other.n_trees);
    }

    fn absorb<'a>(&mut self, paths: impl Iterator<Item = Path<'a, Counts>>) {
        for path in paths {
            let mut curr = &mut self.root;
            for node in path {
                curr = child_entry(curr, &node.id);
                curr.value.union(&node.value);
            }
        }
    }

    /// Union `other` into `self` node for node, each node exactly once.
    ///
    /// Folding per-tree structures with `merge` gives the same counts as
    /// adding the trees one after another.
    pub fn merge(&mut self, other: &TreeStructure) {
        let mut labels: Vec<&str> = Vec::new();

        for (depth, node) in other.root.dfs() {
            labels.truncate(depth);
            labels.push(&node.id);

            let mut curr = &mut self.root;
            for label in &labels {
                curr = child_entry(curr, label);
            }
            curr.value.union(&node.value);
        }

        self.n_trees = self.n_trees.max(other.n_trees);
    }

    /// Combined count profile of every subtree rooted at a node labeled `label`.
    ///
    /// The search does not descend into a matched subtree, so a nested
    /// occurrence of `label` only counts as part of its enclosing match.
    pub fn restructure(&self, label: &str) -> TreeStructure {
        let mut combined = TreeStructure::with_trees(self.n_trees);
        let mut matches = 0;

        let mut stack: Vec<&Node<Counts>> = self.root.adj_iter().collect();
        while let Some(node) = stack.pop() {
            if node.id == label {
                combined.absorb(CompletePaths::from_seeds([node]));
                matches += 1;
                continue;
            }

            stack.extend(node.adj_iter());
        }

        debug!("restructure {label:?}: {matches} matching subtrees");
        combined
    }

    /// Node at the end of `path`, if every label along it exists.
    ///
    /// An empty path resolves to the root.
    pub fn get_path<I, S>(&self, path: I) -> Option<&Node<Counts>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut curr = &self.root;
        for label in path {
            curr = curr.get_adj(label.as_ref())?;
        }
        Some(curr)
    }

    /// Aggregate `trees` on the rayon pool, tree `i` getting id `i`.
    ///
    /// Each worker owns the structure it builds; the partial structures are
    /// folded with [`Self::merge`]. Counts match a sequential build, sibling
    /// order may not.
    pub fn from_trees_parallel<V: Sync>(trees: &[Node<V>]) -> TreeStructure {
        trees
            .par_iter()
            .enumerate()
            .map(|(tree_id, tree)| {
                let mut structure = TreeStructure::with_trees(tree_id);
                structure.add_tree(tree);
                structure
            })
            .reduce(TreeStructure::new, |mut acc, part| {
                acc.merge(&part);
                acc
            })
    }

    /// Read a structure dump.
    ///
    /// A leading `head <n_trees>` line sets the number of trees. Without it,
    /// or when it is smaller, `n_trees` is the largest tree id seen plus one.
    pub fn from_dump<R: BufRead>(mut reader: R) -> Result<Self, StructureError> {
        let mut first = String::new();
        reader
            .read_line(&mut first)
            .map_err(|e| TreeError::from(ParseError::from(e)))?;

        let declared = parse_header(&first);
        let (leftover, consumed) = match declared {
            Some(_) => (String::new(), 1),
            None => (first, 0),
        };

        let entries = DumpReader::new(Cursor::new(leftover).chain(reader)).after_lines(consumed);
        let root: Node<Counts> = read_entries(entries, AdjacencyKind::Keyed)?;

        let seen = root
            .dfs()
            .filter_map(|(_, node)| node.value.max_tree_id())
            .max()
            .map_or(0, |id| id + 1);
        let n_trees = declared.map_or(seen, |declared| declared.max(seen));

        Ok(Self { root, n_trees })
    }

    pub fn read_file(path: &FsPath) -> Result<Self, StructureError> {
        let file = File::open(path).map_err(|e| TreeError::from(ParseError::from(e)))?;
        Self::from_dump(BufReader::new(file))
    }

    /// Render the structure dump: the `head <n_trees>` header, then one line
    /// per node
    pub fn to_dump_string(&self) -> Result<String, OutputError> {
        let mut output = format!("{} {}\n", HEAD, self.n_trees);
        output.push_str(&render_to_string(&self.root)?);
        Ok(output)
    }

    pub fn write_file(&self, path: &FsPath) -> Result<(), OutputError> {
        write_output(&self.to_dump_string()?, path)
    }
}

fn parse_header(line: &str) -> Option<usize> {
    line.trim_end()
        .strip_prefix(HEAD)?
        .strip_prefix(' ')?
        .parse()
        .ok()
}

fn child_entry<'n>(node: &'n mut Node<Counts>, label: &str) -> &'n mut Node<Counts> {
    node.children
        .get_or_insert_with(label, || Node::new(label, Counts::new(), AdjacencyKind::Keyed))
}
