//! Tree dump output rendering

use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::parser::{DumpValue, INDENT};
use crate::tree::Node;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Label {0:?} cannot be written to a dump")]
    InvalidLabel(String),

    #[error("Value {value:?} of node {label:?} spans several lines")]
    InvalidValue { label: String, value: String },
}

/// Render a tree to the dump format and write it to a file
pub fn write_dump<V: DumpValue>(root: &Node<V>, output_path: &Path) -> Result<(), OutputError> {
    let content = render_to_string(root)?;
    write_output(&content, output_path)
}

/// Write rendered content to a file
pub fn write_output(content: &str, output_path: &Path) -> Result<(), OutputError> {
    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(output_path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Render a tree to a string in the dump format.
///
/// Fails on labels that would not read back as the same label.
pub fn render_to_string<V: DumpValue>(root: &Node<V>) -> Result<String, OutputError> {
    let mut output = String::new();
    for (depth, node) in root.dfs() {
        render_node(depth, node, &mut output)?;
    }
    Ok(output)
}

fn render_node<V: DumpValue>(
    depth: usize,
    node: &Node<V>,
    output: &mut String,
) -> Result<(), OutputError> {
    if node.id.is_empty() || node.id.starts_with('|') || node.id.contains(char::is_whitespace) {
        return Err(OutputError::InvalidLabel(node.id.clone()));
    }

    let value = node.value.render();
    if value.contains(['\n', '\r']) {
        return Err(OutputError::InvalidValue {
            label: node.id.clone(),
            value,
        });
    }

    for _ in 0..depth {
        output.push_str(INDENT);
    }
    output.push_str(&node.id);
    output.push(' ');
    output.push_str(&value);
    output.push('\n');

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    #[test]
    fn test_simple_tree_rendering() {
        let mut root = Tree::root();
        let mut program = Tree::leaf("Program", None);
        let mut stmt = Tree::leaf("Stmt", None);
        stmt.add_adj(Tree::leaf("Name", Some("x".to_string())));
        program.add_adj(stmt);
        program.add_adj(Tree::leaf("End", None));
        root.add_adj(program);

        let output = render_to_string(&root).unwrap();
        let expected = "Program \n| Stmt \n| | Name x\n| End \n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_rejects_unreadable_labels() {
        for label in ["two words", "", "|pipe"] {
            let mut root = Tree::root();
            root.add_adj(Tree::leaf(label, None));
            assert!(matches!(
                render_to_string(&root),
                Err(OutputError::InvalidLabel(_))
            ));
        }
    }

    #[test]
    fn test_rejects_multiline_values() {
        let mut root = Tree::root();
        root.add_adj(Tree::leaf("ValueStr", Some("a\nb".to_string())));
        assert!(matches!(
            render_to_string(&root),
            Err(OutputError::InvalidValue { .. })
        ));
    }
}
