//! Predicate evaluation over record fields.
//!
//! This module provides:
//! - The closed condition vocabulary and its conversion from parse trees
//! - Pairwise type coercion and ordering
//! - LIKE pattern matching
//! - Evaluation of a condition tree against one record

pub mod coercion;
pub mod condition;
pub mod error;
pub mod eval;
pub mod like;
pub mod operator;

pub use coercion::{coerce, compare, Incompatible};
pub use condition::{ConditionNode, Operand};
pub use error::{EvalError, EvalResult};
pub use eval::{Predicate, PredicateEvaluator};
pub use like::LikePattern;
pub use operator::CompareOp;
