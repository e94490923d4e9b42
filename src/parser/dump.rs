//! Line-oriented tree dump format
//!
//! One line per node in preorder: `"| "` repeated `depth` times, the label,
//! a single space, then the rendered value (empty when there is none).
//!
//! ```text
//! Program
//! | Stmt
//! | | Name x
//! | | ValueStr hello world
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::marker::PhantomData;
use std::path::Path;

use super::ParseError;
use crate::tree::{AdjacencyKind, Node, Tree, TreeBuilder, TreeError};

/// Indentation unit, repeated once per level of depth
pub const INDENT: &str = "| ";

/// A node payload that can be written to and read back from a dump line
pub trait DumpValue: Sized {
    fn render(&self) -> String;

    fn parse_value(text: &str) -> Result<Self, String>;
}

impl DumpValue for Option<String> {
    fn render(&self) -> String {
        self.clone().unwrap_or_default()
    }

    fn parse_value(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(text.to_string()))
        }
    }
}

/// One parsed dump line
#[derive(Debug, Clone, PartialEq)]
pub struct DumpEntry<V> {
    pub line: usize,
    pub depth: usize,
    pub id: String,
    pub value: V,
}

/// Parse a single dump line; blank lines yield `None`
pub fn parse_line<V: DumpValue>(line: usize, text: &str) -> Result<Option<DumpEntry<V>>, ParseError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| ParseError::MalformedInput { line, reason };

    let mut rest = text;
    let mut depth = 0;
    while let Some(stripped) = rest.strip_prefix(INDENT) {
        rest = stripped;
        depth += 1;
    }

    if rest.starts_with('|') || rest.starts_with(char::is_whitespace) {
        return Err(malformed(format!(
            "indentation is not a whole number of {:?} units",
            INDENT
        )));
    }

    let (id, value) = rest.split_once(' ').unwrap_or((rest, ""));
    if id.is_empty() {
        return Err(malformed("missing label".to_string()));
    }

    let value = V::parse_value(value).map_err(malformed)?;

    Ok(Some(DumpEntry {
        line,
        depth,
        id: id.to_string(),
        value,
    }))
}

/// Iterator over the entries of a dump, skipping blank lines
pub struct DumpReader<R, V> {
    lines: Lines<R>,
    line: usize,
    _value: PhantomData<fn() -> V>,
}

impl<R: BufRead, V> DumpReader<R, V> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            _value: PhantomData,
        }
    }

    /// Number lines as if `consumed` lines were read before `reader`
    pub fn after_lines(mut self, consumed: usize) -> Self {
        self.line = consumed;
        self
    }
}

impl<R: BufRead, V: DumpValue> Iterator for DumpReader<R, V> {
    type Item = Result<DumpEntry<V>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;

            match parse_line(self.line, &text) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Read a whole dump into a tree whose nodes store children as `kind`
pub fn read_dump<V, R>(reader: R, kind: AdjacencyKind) -> Result<Node<V>, TreeError>
where
    V: DumpValue + Default,
    R: BufRead,
{
    read_entries(DumpReader::new(reader), kind)
}

/// Build a tree from dump entries whose nodes store children as `kind`
pub fn read_entries<V, R>(entries: DumpReader<R, V>, kind: AdjacencyKind) -> Result<Node<V>, TreeError>
where
    V: DumpValue + Default,
    R: BufRead,
{
    let mut builder = TreeBuilder::new(kind);

    for entry in entries {
        let entry = entry?;
        builder.push_at(
            entry.line,
            entry.depth,
            Node::new(entry.id, entry.value, kind),
        )?;
    }

    Ok(builder.finish())
}

/// Read a parse tree dump
pub fn read_tree<R: BufRead>(reader: R) -> Result<Tree, TreeError> {
    read_dump(reader, AdjacencyKind::List)
}

/// Read a parse tree dump from a file
pub fn read_tree_file(path: &Path) -> Result<Tree, TreeError> {
    let file = File::open(path).map_err(ParseError::from)?;
    read_tree(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> DumpEntry<Option<String>> {
        parse_line(1, text).unwrap().unwrap()
    }

    #[test]
    fn test_parse_line_depth_label_value() {
        let e = entry("| | Name x");
        assert_eq!(e.depth, 2);
        assert_eq!(e.id, "Name");
        assert_eq!(e.value, Some("x".to_string()));

        let e = entry("Program");
        assert_eq!((e.depth, e.id.as_str(), e.value), (0, "Program", None));

        let e = entry("| Stmt ");
        assert_eq!((e.depth, e.id.as_str(), e.value), (1, "Stmt", None));
    }

    #[test]
    fn test_value_keeps_inner_spaces() {
        let e = entry("| ValueStr hello  world");
        assert_eq!(e.value, Some("hello  world".to_string()));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let parsed: Option<DumpEntry<Option<String>>> = parse_line(3, "   ").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_bad_indentation_is_malformed() {
        for text in ["|Stmt", "| |Stmt", " Stmt", "| "] {
            let err = parse_line::<Option<String>>(7, text).unwrap_err();
            assert!(
                matches!(err, ParseError::MalformedInput { line: 7, .. }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_read_tree_builds_shape() {
        let dump = "Program\n| Stmt\n| | Expr\n\n| Stmt\nEnd x\n";
        let tree = read_tree(dump.as_bytes()).unwrap();

        let shape: Vec<(usize, String)> = tree.dfs().map(|(d, n)| (d, n.id.clone())).collect();
        assert_eq!(
            shape,
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
    fn test_read_tree_reports_line_of_depth_jump() {
        let dump = "Program\n\n| | Expr\n";
        let err = read_tree(dump.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MalformedInput {
                position: 3,
                depth: 2,
                ..
            }
        ));
    }
}
