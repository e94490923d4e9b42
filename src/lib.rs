//! Path-count aggregation over parsed syntax trees.
//!
//! Trees come in as preorder `(depth, node)` streams, usually read from text
//! dumps of a parser's syntax tree. Every root-to-leaf path is split so that
//! no label (grammar production) repeats more than twice, and the resulting
//! canonical paths of many trees are merged into one [`TreeStructure`] whose
//! nodes count, per tree, how often their position was reached.
//!
//! [`StructureQueryTool`] answers questions over that aggregate: total counts
//! per tree for a set of paths, and how many trees have count vectors
//! satisfying a caller-supplied predicate.
//!
//! ```no_run
//! use treecount::parser::read_tree_file;
//! use treecount::structure::{parse_path, StructureQueryTool, TreeStructure};
//! use std::path::Path;
//!
//! let mut structure = TreeStructure::new();
//! for file in ["a.txt", "b.txt"] {
//!     let tree = read_tree_file(Path::new(file)).unwrap();
//!     structure.add_tree(&tree);
//! }
//!
//! let exprs = structure.restructure("Expr");
//! let tool = StructureQueryTool::new(&exprs);
//! let paths = vec![parse_path("Expr"), parse_path("Expr/Subtract/Expr/Subtract")];
//! let n = tool.query(&paths, |counts| counts[0] > 0 && counts[1] > 0);
//! println!("{n} trees nest subtractions");
//! ```

pub mod activation;
pub mod output;
pub mod parser;
pub mod project;
pub mod structure;
pub mod tree;

pub use structure::{Counts, StructureQueryTool, TreeId, TreeStructure};
pub use tree::{Node, Tree};
