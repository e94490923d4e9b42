//! Labeled trees, their construction, path enumeration and label statistics

mod builder;
mod node;
mod normalize;
mod paths;
mod stats;

use thiserror::Error;

use crate::parser::ParseError;

pub use builder::TreeBuilder;
pub use node::{AdjIter, Adjacency, AdjacencyKind, Dfs, Node, Tree, HEAD};
pub use normalize::{normalize_literals, VALUE_STR};
pub use paths::{split_path, CanonicalPaths, CompletePaths, Path};
pub use stats::{adjacency_bounds, edge_bounds, label_occurrence_bounds, Bounds};

#[derive(Error, Debug)]
pub enum TreeError {
    #[error(
        "Malformed input at {position}: depth {depth} cannot follow depth {}",
        display_depth(.previous)
    )]
    MalformedInput {
        position: usize,
        depth: usize,
        previous: Option<usize>,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn display_depth(depth: &Option<usize>) -> String {
    depth.map_or_else(|| "-1".to_string(), |d| d.to_string())
}
