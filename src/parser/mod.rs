//! Reading trees from text dumps

mod dump;

use thiserror::Error;

pub use dump::{
    parse_line, read_dump, read_entries, read_tree, read_tree_file, DumpEntry, DumpReader, DumpValue, INDENT,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
