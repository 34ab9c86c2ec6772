//! Condition tree understood by the predicate evaluator.
//!
//! The parser produces a general [`Expression`]; only a fixed vocabulary of
//! it is meaningful as a record predicate. Conversion rejects everything else
//! with `UnsupportedExpression` and types the literals.

use crate::access::Value;
use crate::expression::{CompareOp, EvalError, EvalResult};
use crate::sql::{BinaryOperator, Expression, Literal, UnaryOperator};
use std::fmt;

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Literal(Value),
    /// Parenthesised list used by IN
    List(Vec<Operand>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Comparison {
        op: CompareOp,
        column: String,
        right: Operand,
    },
    Between {
        negated: bool,
        column: String,
        low: Operand,
        high: Operand,
    },
    IsNull {
        negated: bool,
        column: String,
    },
    And(Box<ConditionNode>, Box<ConditionNode>),
    Or(Box<ConditionNode>, Box<ConditionNode>),
    Paren(Box<ConditionNode>),
}

impl ConditionNode {
    pub fn and(left: ConditionNode, right: ConditionNode) -> Self {
        ConditionNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: ConditionNode, right: ConditionNode) -> Self {
        ConditionNode::Or(Box::new(left), Box::new(right))
    }

    pub fn compare(column: impl Into<String>, op: CompareOp, right: Operand) -> Self {
        ConditionNode::Comparison {
            op,
            column: column.into(),
            right,
        }
    }
}

impl Operand {
    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }
}

impl TryFrom<&Expression> for ConditionNode {
    type Error = EvalError;

    fn try_from(expr: &Expression) -> EvalResult<Self> {
        match expr {
            Expression::Nested(inner) => Ok(ConditionNode::Paren(Box::new(
                ConditionNode::try_from(inner.as_ref())?,
            ))),

            Expression::BinaryOp { left, op, right } => match op {
                BinaryOperator::And => Ok(ConditionNode::and(
                    ConditionNode::try_from(left.as_ref())?,
                    ConditionNode::try_from(right.as_ref())?,
                )),
                BinaryOperator::Or => Ok(ConditionNode::or(
                    ConditionNode::try_from(left.as_ref())?,
                    ConditionNode::try_from(right.as_ref())?,
                )),
                _ => match CompareOp::from_binary(*op) {
                    Some(cmp) => Ok(ConditionNode::Comparison {
                        op: cmp,
                        column: column_name(left, expr)?,
                        right: operand(right)?,
                    }),
                    None => Err(EvalError::unsupported(format!(
                        "operator {} in {}",
                        op.as_str(),
                        expr
                    ))),
                },
            },

            Expression::Like {
                expression,
                pattern,
                escape,
                negated,
            } => {
                if escape.is_some() {
                    return Err(EvalError::unsupported(format!("ESCAPE clause in {}", expr)));
                }
                Ok(ConditionNode::Comparison {
                    op: if *negated {
                        CompareOp::NotLike
                    } else {
                        CompareOp::Like
                    },
                    column: column_name(expression, expr)?,
                    right: operand(pattern)?,
                })
            }

            Expression::InList {
                expression,
                list,
                negated,
            } => Ok(ConditionNode::Comparison {
                op: if *negated {
                    CompareOp::NotIn
                } else {
                    CompareOp::In
                },
                column: column_name(expression, expr)?,
                right: Operand::List(list.iter().map(operand).collect::<EvalResult<_>>()?),
            }),

            Expression::Between {
                expression,
                low,
                high,
                negated,
            } => Ok(ConditionNode::Between {
                negated: *negated,
                column: column_name(expression, expr)?,
                low: operand(low)?,
                high: operand(high)?,
            }),

            Expression::IsNull {
                expression,
                negated,
            } => Ok(ConditionNode::IsNull {
                negated: *negated,
                column: column_name(expression, expr)?,
            }),

            Expression::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => Err(EvalError::unsupported(format!("NOT in {}", expr))),

            _ => Err(EvalError::unsupported(format!(
                "{} is not a condition",
                expr
            ))),
        }
    }
}

/// Left side of a condition must name a column. A `table.` qualifier is
/// dropped.
fn column_name(side: &Expression, whole: &Expression) -> EvalResult<String> {
    match side {
        Expression::Column(name) | Expression::QualifiedColumn(_, name) => Ok(name.clone()),
        _ => Err(EvalError::unsupported(format!(
            "left operand of {} must be a column reference",
            whole
        ))),
    }
}

fn operand(expr: &Expression) -> EvalResult<Operand> {
    match expr {
        Expression::Column(name) | Expression::QualifiedColumn(_, name) => {
            Ok(Operand::Column(name.clone()))
        }
        Expression::Literal(lit) => Ok(Operand::Literal(literal_value(lit, false)?)),
        Expression::Nested(inner) => operand(inner),
        Expression::UnaryOp {
            op: op @ (UnaryOperator::Minus | UnaryOperator::Plus),
            operand: inner,
        } => match inner.as_ref() {
            Expression::Literal(lit @ Literal::Number(_)) => Ok(Operand::Literal(literal_value(
                lit,
                *op == UnaryOperator::Minus,
            )?)),
            _ => Err(EvalError::unsupported(format!("operand {}", expr))),
        },
        _ => Err(EvalError::unsupported(format!("operand {}", expr))),
    }
}

/// Type a literal. Integral text becomes `Integer`, text with a fraction
/// or exponent becomes `Float`.
pub fn literal_value(lit: &Literal, negate: bool) -> EvalResult<Value> {
    match lit {
        Literal::Number(text) => {
            let signed = if negate {
                format!("-{}", text)
            } else {
                text.clone()
            };
            if text.bytes().all(|b| b.is_ascii_digit()) {
                signed
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| EvalError::malformed(format!("invalid integer literal {}", signed)))
            } else {
                match signed.parse::<f64>() {
                    Ok(x) if x.is_finite() => Ok(Value::Float(x)),
                    _ => Err(EvalError::malformed(format!(
                        "invalid numeric literal {}",
                        signed
                    ))),
                }
            }
        }
        Literal::String(s) => Ok(Value::Text(s.clone())),
        Literal::Boolean(b) => Ok(Value::Boolean(*b)),
        Literal::Null => Ok(Value::Null),
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(name) => f.write_str(name),
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not = |negated: bool| if negated { "NOT " } else { "" };
        match self {
            ConditionNode::Comparison { op, column, right } => {
                write!(f, "{} {} {}", column, op, right)
            }
            ConditionNode::Between {
                negated,
                column,
                low,
                high,
            } => write!(
                f,
                "{} {}BETWEEN {} AND {}",
                column,
                not(*negated),
                low,
                high
            ),
            ConditionNode::IsNull { negated, column } => {
                write!(f, "{} IS {}NULL", column, not(*negated))
            }
            ConditionNode::And(left, right) => write!(f, "{} AND {}", left, right),
            ConditionNode::Or(left, right) => write!(f, "{} OR {}", left, right),
            ConditionNode::Paren(inner) => write!(f, "({})", inner),
        }
    }
}
