//! Quoted-literal normalization
//!
//! Syntax dumps print literal tokens as quoted labels (`'x'`, or a quote on
//! one side only when the literal was cut at a line break). Rewriting them to
//! a single `ValueStr` label keeps literal text out of the path space.

use super::node::Tree;

/// Label given to nodes that carried a quoted literal
pub const VALUE_STR: &str = "ValueStr";

/// Move quoted literal labels into node values, returning how many nodes changed.
///
/// Literal siblings under keyed children collapse into a single `ValueStr`
/// child holding the last literal.
pub fn normalize_literals(tree: &mut Tree) -> usize {
    let mut rewritten = 0;
    let mut stack: Vec<&mut Tree> = vec![tree];

    while let Some(node) = stack.pop() {
        let mut renamed = false;
        for child in node.children.nodes_mut() {
            if let Some(literal) = unquote(&child.id) {
                child.value = Some(literal.to_string());
                child.id = VALUE_STR.to_string();
                renamed = true;
                rewritten += 1;
            }
        }
        if renamed {
            node.children.reindex();
        }

        stack.extend(node.children.nodes_mut().iter_mut());
    }

    rewritten
}

fn unquote(id: &str) -> Option<&str> {
    if id.len() <= 1 {
        return None;
    }

    match (id.strip_prefix('\''), id.strip_suffix('\'')) {
        (Some(_), Some(_)) => Some(&id[1..id.len() - 1]),
        (Some(rest), None) => Some(rest),
        (None, Some(rest)) => Some(rest),
        (None, None) => None,
    }
}
