//! Operator definitions for conditions.

use crate::sql::BinaryOperator;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operators a condition can apply to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    // Value comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Pattern match
    Like,
    NotLike,

    // Membership
    In,
    NotIn,
}

impl CompareOp {
    /// Map a parsed binary operator to a comparison, if it is one
    pub fn from_binary(op: BinaryOperator) -> Option<CompareOp> {
        match op {
            BinaryOperator::Equal => Some(CompareOp::Eq),
            BinaryOperator::NotEqual => Some(CompareOp::NotEq),
            BinaryOperator::Less => Some(CompareOp::Lt),
            BinaryOperator::LessEqual => Some(CompareOp::LtEq),
            BinaryOperator::Greater => Some(CompareOp::Gt),
            BinaryOperator::GreaterEqual => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    /// Check an ordering result against this operator.
    ///
    /// Only meaningful for `=`, `!=` and the ordering operators.
    pub fn holds_for(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
            CompareOp::Like | CompareOp::NotLike | CompareOp::In | CompareOp::NotIn => false,
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
