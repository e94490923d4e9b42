//! Activation expression types

use super::ActivationError;

/// Comparison between two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    pub fn apply(self, left: u64, right: u64) -> bool {
        match self {
            CmpOp::Eq => left == right,
            CmpOp::NotEq => left != right,
            CmpOp::Gt => left > right,
            CmpOp::Gte => left >= right,
            CmpOp::Lt => left < right,
            CmpOp::Lte => left <= right,
        }
    }
}

/// A value drawn from the count vector or written literally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// `x<i>`: count of the i-th query path
    Count(usize),
    /// `sum`: total of the whole vector
    Sum,
    /// A literal count
    Literal(u64),
}

impl Operand {
    fn resolve(self, counts: &[u64]) -> u64 {
        match self {
            Operand::Count(i) => counts.get(i).copied().unwrap_or(0),
            Operand::Sum => counts.iter().sum(),
            Operand::Literal(n) => n,
        }
    }
}

/// Boolean predicate over a count vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Compare {
        left: Operand,
        op: CmpOp,
        right: Operand,
    },
    Not(Box<Activation>),
    And(Box<Activation>, Box<Activation>),
    Or(Box<Activation>, Box<Activation>),
    Const(bool),
}

impl Activation {
    /// Evaluate against `counts`; indices past the end read as 0
    pub fn eval(&self, counts: &[u64]) -> bool {
        match self {
            Activation::Compare { left, op, right } => {
                op.apply(left.resolve(counts), right.resolve(counts))
            }
            Activation::Not(inner) => !inner.eval(counts),
            Activation::And(left, right) => left.eval(counts) && right.eval(counts),
            Activation::Or(left, right) => left.eval(counts) || right.eval(counts),
            Activation::Const(value) => *value,
        }
    }

    /// Largest `x<i>` index used, if any
    pub fn max_index(&self) -> Option<usize> {
        match self {
            Activation::Compare { left, right, .. } => {
                let index = |operand: &Operand| match operand {
                    Operand::Count(i) => Some(*i),
                    _ => None,
                };
                index(left).max(index(right))
            }
            Activation::Not(inner) => inner.max_index(),
            Activation::And(left, right) | Activation::Or(left, right) => {
                left.max_index().max(right.max_index())
            }
            Activation::Const(_) => None,
        }
    }

    /// Check that every `x<i>` addresses one of `len` query paths
    pub fn validate(&self, len: usize) -> Result<(), ActivationError> {
        match self.max_index() {
            Some(index) if index >= len => Err(ActivationError::IndexOutOfRange { index, len }),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmpOp::Eq => write!(f, "=="),
            CmpOp::NotEq => write!(f, "!="),
            CmpOp::Gt => write!(f, ">"),
            CmpOp::Gte => write!(f, ">="),
            CmpOp::Lt => write!(f, "<"),
            CmpOp::Lte => write!(f, "<="),
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Count(i) => write!(f, "x{}", i),
            Operand::Sum => write!(f, "sum"),
            Operand::Literal(n) => write!(f, "{}", n),
        }
    }
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Activation::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Activation::Not(inner) => write!(f, "!({})", inner),
            Activation::And(left, right) => write!(f, "({}) && ({})", left, right),
            Activation::Or(left, right) => write!(f, "({}) || ({})", left, right),
            Activation::Const(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both_present() -> Activation {
        Activation::And(
            Box::new(Activation::Compare {
                left: Operand::Count(0),
                op: CmpOp::Gt,
                right: Operand::Literal(0),
            }),
            Box::new(Activation::Compare {
                left: Operand::Count(1),
                op: CmpOp::Gt,
                right: Operand::Literal(0),
            }),
        )
    }

    #[test]
    fn test_eval() {
        let activation = both_present();
        assert!(activation.eval(&[1, 3]));
        assert!(!activation.eval(&[1, 0]));
        assert!(!activation.eval(&[1]));
        assert!(!Activation::Not(Box::new(activation)).eval(&[2, 2]));
    }

    #[test]
    fn test_sum_operand() {
        let activation = Activation::Compare {
            left: Operand::Sum,
            op: CmpOp::Gte,
            right: Operand::Literal(4),
        };
        assert!(activation.eval(&[1, 3]));
        assert!(!activation.eval(&[]));
    }

    #[test]
    fn test_validate_indices() {
        assert_eq!(both_present().max_index(), Some(1));
        assert!(both_present().validate(2).is_ok());
        assert_eq!(
            both_present().validate(1),
            Err(ActivationError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(Activation::Const(true).validate(0).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(both_present().to_string(), "(x0 > 0) && (x1 > 0)");
    }
}
