//! Common test utilities

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use treecount::parser::{read_tree, read_tree_file};
use treecount::{Counts, Tree, TreeStructure};

/// Get the path to the testdata directory
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Path of a fixture dump under `testdata/trees`
pub fn fixture(name: &str) -> PathBuf {
    testdata_dir().join("trees").join(format!("{}.txt", name))
}

/// Read a fixture dump as a parse tree
pub fn load_fixture(name: &str) -> Tree {
    read_tree_file(&fixture(name)).expect("Failed to read fixture")
}

/// Parse a tree from dump text
pub fn tree(text: &str) -> Tree {
    read_tree(text.as_bytes()).expect("Failed to parse tree")
}

/// Copy fixtures into `dir`, keeping their file names
pub fn copy_fixtures(names: &[&str], dir: &Path) {
    fs::create_dir_all(dir).expect("Failed to create data directory");
    for name in names {
        let source = fixture(name);
        let file_name = source.file_name().expect("Fixture has no file name");
        fs::copy(&source, dir.join(file_name)).expect("Failed to copy fixture");
    }
}

/// Every node of a structure keyed by its label path, independent of
/// sibling order
pub fn profile(structure: &TreeStructure) -> BTreeMap<Vec<String>, Counts> {
    let mut profile = BTreeMap::new();
    let mut labels: Vec<String> = Vec::new();

    for (depth, node) in structure.root().dfs() {
        labels.truncate(depth);
        labels.push(node.id.clone());
        profile.insert(labels.clone(), node.value.clone());
    }

    profile
}

/// The `(depth, label, value)` triples of a tree in preorder
pub fn triples(tree: &Tree) -> Vec<(usize, String, Option<String>)> {
    tree.dfs()
        .map(|(depth, node)| (depth, node.id.clone(), node.value.clone()))
        .collect()
}
