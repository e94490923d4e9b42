//! Activation predicates over per-tree count vectors

mod expr;
mod parser;

use thiserror::Error;

pub use expr::{Activation, CmpOp, Operand};
pub use parser::parse_activation;

#[derive(Error, Debug, PartialEq)]
pub enum ActivationError {
    #[error("Invalid activation at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Activation refers to x{index} but the query has {len} paths")]
    IndexOutOfRange { index: usize, len: usize },
}
