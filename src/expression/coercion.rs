//! Type coercion and ordering between values of different kinds.
//!
//! Coercion is pairwise: it brings two values to a common kind so that a
//! single comparison can be applied. Rules, in order of precedence:
//!
//! 1. Either side `Null`: returned unchanged.
//! 2. Same kind: returned unchanged.
//! 3. Integer with Float: the integer widens to Float.
//! 4. Integer or Float with Text: the text is parsed as a float and both
//!    sides become Float.
//! 5. Boolean with Text: the text is parsed as `true`/`false` (any case).
//! 6. Anything else is incompatible.
//!
//! Rules 3 to 5 apply in either operand order.

use crate::access::{Value, ValueKind};
use crate::expression::{CompareOp, EvalError};
use std::cmp::Ordering;

/// Two kinds that cannot be brought to a comparable form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incompatible {
    pub left: ValueKind,
    pub right: ValueKind,
}

impl Incompatible {
    fn of(left: &Value, right: &Value) -> Self {
        Self {
            left: left.kind(),
            right: right.kind(),
        }
    }

    /// Attach the column and operator the failed comparison belongs to
    pub fn at(self, column: &str, operator: impl ToString) -> EvalError {
        EvalError::TypeMismatch {
            column: column.to_string(),
            operator: operator.to_string(),
            left: self.left,
            right: self.right,
        }
    }
}

/// Bring `left` and `right` to a common kind
pub fn coerce(left: &Value, right: &Value) -> Result<(Value, Value), Incompatible> {
    use Value::*;

    match (left, right) {
        (Null, _) | (_, Null) => Ok((left.clone(), right.clone())),
        (l, r) if l.kind() == r.kind() => Ok((l.clone(), r.clone())),

        (Integer(a), Float(b)) => Ok((Float(*a as f64), Float(*b))),
        (Float(a), Integer(b)) => Ok((Float(*a), Float(*b as f64))),

        (Integer(_) | Float(_), Text(s)) => match (as_float(left), parse_float(s)) {
            (Some(a), Some(b)) => Ok((Float(a), Float(b))),
            _ => Err(Incompatible::of(left, right)),
        },
        (Text(s), Integer(_) | Float(_)) => match (parse_float(s), as_float(right)) {
            (Some(a), Some(b)) => Ok((Float(a), Float(b))),
            _ => Err(Incompatible::of(left, right)),
        },

        (Boolean(a), Text(s)) => match parse_bool(s) {
            Some(b) => Ok((Boolean(*a), Boolean(b))),
            None => Err(Incompatible::of(left, right)),
        },
        (Text(s), Boolean(b)) => match parse_bool(s) {
            Some(a) => Ok((Boolean(a), Boolean(*b))),
            None => Err(Incompatible::of(left, right)),
        },

        _ => Err(Incompatible::of(left, right)),
    }
}

/// Order two values of the same kind.
///
/// `None` means the pair is unordered (a NaN float). Booleans have no
/// order and mixed kinds are incompatible.
pub fn ordering(left: &Value, right: &Value) -> Result<Option<Ordering>, Incompatible> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
        (Value::Text(a), Value::Text(b)) => Ok(Some(a.cmp(b))),
        _ => Err(Incompatible::of(left, right)),
    }
}

/// Apply `=`, `!=` or an ordering operator to an already coerced pair
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, Incompatible> {
    if left.kind() != right.kind() {
        return Err(Incompatible::of(left, right));
    }

    match op {
        CompareOp::Eq => Ok(left == right),
        CompareOp::NotEq => Ok(left != right),
        _ => Ok(ordering(left, right)?.is_some_and(|ord| op.holds_for(ord))),
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
