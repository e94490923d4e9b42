//! Labeled nodes with ordered or keyed children

use std::collections::HashMap;

/// Label carried by the root of every tree and structure
pub const HEAD: &str = "head";

/// A parse tree: list-ordered children, optional text payload
pub type Tree = Node<Option<String>>;

/// How a node stores its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyKind {
    /// Insertion-ordered sequence, duplicate labels allowed
    List,
    /// One child per label, looked up by label
    Keyed,
}

/// Children of a node
#[derive(Debug, Clone, PartialEq)]
pub enum Adjacency<V> {
    List(Vec<Node<V>>),
    Keyed {
        nodes: Vec<Node<V>>,
        index: HashMap<String, usize>,
    },
}

impl<V> Adjacency<V> {
    pub fn new(kind: AdjacencyKind) -> Self {
        match kind {
            AdjacencyKind::List => Adjacency::List(Vec::new()),
            AdjacencyKind::Keyed => Adjacency::Keyed {
                nodes: Vec::new(),
                index: HashMap::new(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    /// Children in insertion order
    pub fn nodes(&self) -> &[Node<V>] {
        match self {
            Adjacency::List(nodes) => nodes,
            Adjacency::Keyed { nodes, .. } => nodes,
        }
    }

    /// Mutable children in insertion order.
    ///
    /// Renaming a child of a keyed adjacency leaves the label index stale
    /// until [`Adjacency::reindex`] is called.
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node<V>] {
        match self {
            Adjacency::List(nodes) => nodes,
            Adjacency::Keyed { nodes, .. } => nodes,
        }
    }

    /// Rebuild the label index after children were renamed.
    ///
    /// Children of a keyed adjacency that now share a label collapse the way
    /// [`Adjacency::push`] does: the later one replaces the earlier in place.
    pub(crate) fn reindex(&mut self) {
        if let Adjacency::Keyed { nodes, index } = self {
            index.clear();
            for node in std::mem::take(nodes) {
                match index.get(&node.id) {
                    Some(&i) => nodes[i] = node,
                    None => {
                        index.insert(node.id.clone(), nodes.len());
                        nodes.push(node);
                    }
                }
            }
        }
    }

    /// Add a child and return its position.
    ///
    /// A keyed adjacency replaces an existing child with the same label in place.
    pub fn push(&mut self, node: Node<V>) -> usize {
        match self {
            Adjacency::List(nodes) => {
                nodes.push(node);
                nodes.len() - 1
            }
            Adjacency::Keyed { nodes, index } => match index.get(&node.id) {
                Some(&i) => {
                    nodes[i] = node;
                    i
                }
                None => {
                    index.insert(node.id.clone(), nodes.len());
                    nodes.push(node);
                    nodes.len() - 1
                }
            },
        }
    }

    /// Position of the first child labeled `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        match self {
            Adjacency::List(nodes) => nodes.iter().position(|n| n.id == id),
            Adjacency::Keyed { index, .. } => index.get(id).copied(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Node<V>> {
        self.position(id).map(|i| &self.nodes()[i])
    }

    /// Child labeled `id`, created with `make` when absent
    pub fn get_or_insert_with(
        &mut self,
        id: &str,
        make: impl FnOnce() -> Node<V>,
    ) -> &mut Node<V> {
        let i = match self.position(id) {
            Some(i) => i,
            None => self.push(make()),
        };
        &mut self.nodes_mut()[i]
    }

    /// Traversal order: reverse insertion for lists, insertion for keyed maps
    pub fn adj_iter(&self) -> AdjIter<'_, V> {
        match self {
            Adjacency::List(nodes) => AdjIter::Reversed(nodes.iter().rev()),
            Adjacency::Keyed { nodes, .. } => AdjIter::Forward(nodes.iter()),
        }
    }
}

pub enum AdjIter<'a, V> {
    Forward(std::slice::Iter<'a, Node<V>>),
    Reversed(std::iter::Rev<std::slice::Iter<'a, Node<V>>>),
}

impl<'a, V> Iterator for AdjIter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            AdjIter::Forward(iter) => iter.next(),
            AdjIter::Reversed(iter) => iter.next(),
        }
    }
}

/// A labeled node owning its children
#[derive(Debug, Clone, PartialEq)]
pub struct Node<V> {
    pub id: String,
    pub value: V,
    pub children: Adjacency<V>,
}

impl<V> Node<V> {
    pub fn new(id: impl Into<String>, value: V, kind: AdjacencyKind) -> Self {
        Self {
            id: id.into(),
            value,
            children: Adjacency::new(kind),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn add_adj(&mut self, node: Node<V>) {
        self.children.push(node);
    }

    pub fn get_adj(&self, id: &str) -> Option<&Node<V>> {
        self.children.get(id)
    }

    pub fn adj_iter(&self) -> AdjIter<'_, V> {
        self.children.adj_iter()
    }

    /// Preorder walk over every descendant, yielding `(depth, node)`.
    ///
    /// The root itself is not yielded; its children are at depth 0.
    pub fn dfs(&self) -> Dfs<'_, V> {
        Dfs::from_seeds(self.adj_iter())
    }
}

impl<V: Default> Node<V> {
    /// An empty root labeled [`HEAD`]
    pub fn head(kind: AdjacencyKind) -> Self {
        Self::new(HEAD, V::default(), kind)
    }
}

impl Node<Option<String>> {
    /// An empty parse tree
    pub fn root() -> Self {
        Self::head(AdjacencyKind::List)
    }

    /// A parse-tree node without children
    pub fn leaf(id: impl Into<String>, value: Option<String>) -> Self {
        Self::new(id, value, AdjacencyKind::List)
    }
}

/// Explicit-stack depth-first traversal
pub struct Dfs<'a, V> {
    stack: Vec<(usize, &'a Node<V>)>,
}

impl<'a, V> Dfs<'a, V> {
    /// Start a traversal at depth 0 from `seeds`; the last seed is visited first
    pub fn from_seeds(seeds: impl IntoIterator<Item = &'a Node<V>>) -> Self {
        Self {
            stack: seeds.into_iter().map(|node| (0, node)).collect(),
        }
    }
}

impl<'a, V> Iterator for Dfs<'a, V> {
    type Item = (usize, &'a Node<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.adj_iter().map(|adj| (depth + 1, adj)));
        Some((depth, node))
    }
}
