//! Predicate evaluation against a single record.

use crate::access::{FieldAccessor, FieldResolver, Value};
use crate::expression::coercion::{coerce, compare, Incompatible};
use crate::expression::{CompareOp, ConditionNode, EvalError, EvalResult, LikePattern, Operand};
use crate::sql::parse_where;
use log::{debug, trace};
use std::fmt;

/// Evaluator for condition trees over one record
pub struct PredicateEvaluator<'a, R: FieldAccessor + ?Sized> {
    resolver: FieldResolver<'a, R>,
}

impl<'a, R: FieldAccessor + ?Sized> PredicateEvaluator<'a, R> {
    pub fn new(record: &'a R) -> Self {
        Self {
            resolver: FieldResolver::new(record),
        }
    }

    /// Evaluate a condition and return its truth value.
    ///
    /// Both sides of AND and OR are always evaluated, left first, and an
    /// error from either side is returned instead of the boolean.
    pub fn evaluate(&self, node: &ConditionNode) -> EvalResult<bool> {
        trace!("evaluating {}", node);
        match node {
            ConditionNode::And(left, right) => {
                let left = self.evaluate(left);
                let right = self.evaluate(right);
                Ok(left? & right?)
            }

            ConditionNode::Or(left, right) => {
                let left = self.evaluate(left);
                let right = self.evaluate(right);
                Ok(left? | right?)
            }

            ConditionNode::Paren(inner) => self.evaluate(inner),

            ConditionNode::IsNull { negated, column } => {
                Ok(self.resolver.is_null(column)? != *negated)
            }

            ConditionNode::Comparison { op, column, right } => match op {
                CompareOp::In | CompareOp::NotIn => self.evaluate_in(*op, column, right),
                _ => self.evaluate_comparison(*op, column, right),
            },

            ConditionNode::Between {
                negated,
                column,
                low,
                high,
            } => self.evaluate_between(*negated, column, low, high),
        }
    }

    /// Resolve a scalar operand to a value
    fn operand_value(&self, operand: &Operand, op: impl fmt::Display) -> EvalResult<Value> {
        match operand {
            Operand::Column(name) => self.resolver.resolve(name),
            Operand::Literal(value) => Ok(value.clone()),
            Operand::List(_) => Err(EvalError::malformed(format!(
                "{} expects a single value, found list {}",
                op, operand
            ))),
        }
    }

    fn evaluate_comparison(&self, op: CompareOp, column: &str, right: &Operand) -> EvalResult<bool> {
        let left = self.resolver.resolve(column)?;
        let right = self.operand_value(right, op)?;
        if left.is_null() || right.is_null() {
            return Ok(false);
        }

        let (left, right) = coerce(&left, &right).map_err(|e| e.at(column, op))?;
        match op {
            CompareOp::Like | CompareOp::NotLike => {
                let (Value::Text(text), Value::Text(pattern)) = (&left, &right) else {
                    return Err(Incompatible {
                        left: left.kind(),
                        right: right.kind(),
                    }
                    .at(column, op));
                };
                let pattern = LikePattern::new(pattern).map_err(|e| {
                    EvalError::malformed(format!("LIKE pattern {}: {}", right, e))
                })?;
                Ok(pattern.is_match(text) == (op == CompareOp::Like))
            }
            _ => compare(op, &left, &right).map_err(|e| e.at(column, op)),
        }
    }

    fn evaluate_in(&self, op: CompareOp, column: &str, right: &Operand) -> EvalResult<bool> {
        let left = self.resolver.resolve(column)?;
        let Operand::List(items) = right else {
            return Err(EvalError::malformed(format!(
                "{} expects a value list, found {}",
                op, right
            )));
        };
        let candidates = items
            .iter()
            .map(|item| self.operand_value(item, op))
            .collect::<EvalResult<Vec<_>>>()?;

        if left.is_null() {
            return Ok(false);
        }

        let mut found = false;
        for candidate in candidates.iter().filter(|v| !v.is_null()) {
            let (l, r) = match coerce(&left, candidate) {
                Ok(pair) => pair,
                Err(e) => {
                    debug!(
                        "skipping {} entry {} for {}: cannot compare {} with {}",
                        op, candidate, column, e.left, e.right
                    );
                    continue;
                }
            };
            if compare(CompareOp::Eq, &l, &r).map_err(|e| e.at(column, op))? {
                found = true;
                break;
            }
        }

        Ok(found == (op == CompareOp::In))
    }

    fn evaluate_between(
        &self,
        negated: bool,
        column: &str,
        low: &Operand,
        high: &Operand,
    ) -> EvalResult<bool> {
        let operator = if negated { "NOT BETWEEN" } else { "BETWEEN" };
        let value = self.resolver.resolve(column)?;
        let low = self.operand_value(low, operator)?;
        let high = self.operand_value(high, operator)?;
        if value.is_null() || low.is_null() || high.is_null() {
            return Ok(false);
        }

        let (l, lo) = coerce(&value, &low).map_err(|e| e.at(column, operator))?;
        let above = compare(CompareOp::GtEq, &l, &lo).map_err(|e| e.at(column, operator))?;
        let (l, hi) = coerce(&value, &high).map_err(|e| e.at(column, operator))?;
        let below = compare(CompareOp::LtEq, &l, &hi).map_err(|e| e.at(column, operator))?;

        Ok((above && below) != negated)
    }
}

/// A WHERE clause compiled once and evaluated against any number of records.
///
/// An empty clause matches every record.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    condition: Option<ConditionNode>,
}

impl Predicate {
    /// Parse WHERE-clause text and convert it to a condition tree
    pub fn parse(where_clause: &str) -> EvalResult<Self> {
        let condition = match parse_where(where_clause) {
            Ok(Some(expr)) => Some(ConditionNode::try_from(&expr)?),
            Ok(None) => None,
            Err(e) => return Err(EvalError::parse(e.to_string())),
        };

        match &condition {
            Some(node) => debug!("compiled predicate: {}", node),
            None => debug!("compiled empty predicate"),
        }
        Ok(Self { condition })
    }

    pub fn condition(&self) -> Option<&ConditionNode> {
        self.condition.as_ref()
    }

    /// Evaluate against one record
    pub fn matches<R: FieldAccessor + ?Sized>(&self, record: &R) -> EvalResult<bool> {
        match &self.condition {
            Some(node) => PredicateEvaluator::new(record).evaluate(node),
            None => Ok(true),
        }
    }
}
