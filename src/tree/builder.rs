//! Stack-based tree builder
//!
//! Consumes `(depth, node)` pairs in preorder, the shape every parsing front
//! end emits, and attaches each node to the most recent node one level up.

use super::node::{AdjacencyKind, Node};
use super::TreeError;

/// Builds a tree from a preorder stream of `(depth, node)` pairs
pub struct TreeBuilder<V> {
    /// Open nodes from the root down to the most recently pushed node
    stack: Vec<Node<V>>,
    prev_depth: Option<usize>,
    pushed: usize,
}

impl<V: Default> TreeBuilder<V> {
    /// Start an empty tree whose nodes store children as `kind`
    pub fn new(kind: AdjacencyKind) -> Self {
        Self {
            stack: vec![Node::head(kind)],
            prev_depth: None,
            pushed: 0,
        }
    }

    /// Build a whole tree in one go
    pub fn build<I>(kind: AdjacencyKind, entries: I) -> Result<Node<V>, TreeError>
    where
        I: IntoIterator<Item = (usize, Node<V>)>,
    {
        let mut builder = Self::new(kind);
        for (depth, node) in entries {
            builder.push(depth, node)?;
        }
        Ok(builder.finish())
    }

    /// Attach `node` at `depth`, counting positions from 1
    pub fn push(&mut self, depth: usize, node: Node<V>) -> Result<(), TreeError> {
        let position = self.pushed + 1;
        self.push_at(position, depth, node)
    }

    /// Attach `node` at `depth`, reporting errors against `position`
    /// (for example the source line number)
    pub fn push_at(
        &mut self,
        position: usize,
        depth: usize,
        node: Node<V>,
    ) -> Result<(), TreeError> {
        let max_depth = self.prev_depth.map_or(0, |prev| prev + 1);
        if depth > max_depth {
            return Err(TreeError::MalformedInput {
                position,
                depth,
                previous: self.prev_depth,
            });
        }

        // Close everything at `depth` or deeper; the top is then the parent
        self.close_to(depth + 1);
        self.stack.push(node);
        self.prev_depth = Some(depth);
        self.pushed += 1;

        Ok(())
    }

    /// Close all open nodes and return the root
    pub fn finish(mut self) -> Node<V> {
        self.close_to(1);
        // The root is never popped by close_to
        self.stack.pop().unwrap_or_else(|| Node::head(AdjacencyKind::List))
    }

    fn close_to(&mut self, len: usize) {
        while self.stack.len() > len {
            if let Some(child) = self.stack.pop() {
                if let Some(parent) = self.stack.last_mut() {
                    parent.add_adj(child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Tree, HEAD};

    fn entry(depth: usize, id: &str) -> (usize, Tree) {
        (depth, Tree::leaf(id, None))
    }

    fn shape(tree: &Tree) -> Vec<(usize, String)> {
        tree.dfs().map(|(d, n)| (d, n.id.clone())).collect()
    }

    #[test]
    fn test_builds_nested_tree() {
        let entries = vec![
            entry(0, "Program"),
            entry(1, "Stmt"),
            entry(2, "Expr"),
            entry(1, "Stmt"),
            entry(0, "End"),
        ];

        let tree = TreeBuilder::build(AdjacencyKind::List, entries).unwrap();

        assert_eq!(tree.id, HEAD);
        assert_eq!(tree.children.len(), 2);
        assert_eq!(
            shape(&tree),
            vec![
                (0, "Program".to_string()),
                (1, "Stmt".to_string()),
                (2, "Expr".to_string()),
                (1, "Stmt".to_string()),
                (0, "End".to_string()),
            ]
        );
    }

    #[test]
    fn test_depth_jump_is_malformed() {
        let entries = vec![entry(0, "A"), entry(2, "B")];
        let err = TreeBuilder::build(AdjacencyKind::List, entries).unwrap_err();

        assert!(matches!(
            err,
            TreeError::MalformedInput {
                position: 2,
                depth: 2,
                previous: Some(0)
            }
        ));
    }

    #[test]
    fn test_first_node_must_be_top_level() {
        let err = TreeBuilder::build(AdjacencyKind::List, vec![entry(1, "A")]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MalformedInput { previous: None, .. }
        ));
    }

    #[test]
    fn test_empty_stream_gives_empty_tree() {
        let tree: Tree = TreeBuilder::build(AdjacencyKind::List, Vec::new()).unwrap();
        assert!(tree.is_leaf());
    }

    #[test]
    fn test_deep_chain_is_one_path() {
        let entries = (0..1_000).map(|d| entry(d, "Expr"));
        let tree = TreeBuilder::build(AdjacencyKind::List, entries).unwrap();

        assert_eq!(tree.dfs().count(), 1_000);
        assert_eq!(tree.complete_paths().next().map(|p| p.len()), Some(1_000));
    }
}
