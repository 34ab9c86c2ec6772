//! Error types for predicate evaluation.

use crate::access::ValueKind;
use thiserror::Error;

/// Errors that can occur while compiling or evaluating a predicate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The WHERE text is not a valid condition
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A referenced column has no field on the record
    #[error("Field not found: {column}")]
    FieldNotFound { column: String },

    /// Operands cannot be brought to a comparable form
    #[error("Type mismatch for {column} {operator}: {left} vs {right}")]
    TypeMismatch {
        column: String,
        operator: String,
        left: ValueKind,
        right: ValueKind,
    },

    /// Node or operator outside the supported vocabulary
    #[error("Unsupported expression: {expression}")]
    UnsupportedExpression { expression: String },

    /// Operand of the wrong shape, or a literal that fails to parse
    #[error("Malformed operand: {message}")]
    MalformedOperand { message: String },
}

impl EvalError {
    pub fn parse(message: impl Into<String>) -> Self {
        EvalError::Parse {
            message: message.into(),
        }
    }

    pub fn field_not_found(column: impl Into<String>) -> Self {
        EvalError::FieldNotFound {
            column: column.into(),
        }
    }

    pub fn unsupported(expression: impl Into<String>) -> Self {
        EvalError::UnsupportedExpression {
            expression: expression.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        EvalError::MalformedOperand {
            message: message.into(),
        }
    }
}

/// Result type for predicate operations
pub type EvalResult<T> = Result<T, EvalError>;
