//! Evaluate SQL WHERE predicates against in-memory records.
//!
//! ```
//! use sqleval::access::JsonRecord;
//!
//! let record: JsonRecord = r#"{"name": "张三", "age": 25}"#.parse().unwrap();
//! assert!(sqleval::evaluate(&record, "name LIKE '张%' AND age BETWEEN 20 AND 30").unwrap());
//! ```

pub mod access;
pub mod expression;
pub mod sql;

use access::FieldAccessor;
use expression::{EvalResult, Predicate};

/// Parse `where_clause` and evaluate it against `record`.
///
/// An empty clause is true for every record.
pub fn evaluate<R: FieldAccessor + ?Sized>(record: &R, where_clause: &str) -> EvalResult<bool> {
    Predicate::parse(where_clause)?.matches(record)
}

/// Keep the records that satisfy `where_clause`. The clause is parsed once
/// and the first evaluation error aborts the scan.
pub fn filter<'r, R: FieldAccessor>(records: &'r [R], where_clause: &str) -> EvalResult<Vec<&'r R>> {
    let predicate = Predicate::parse(where_clause)?;
    let mut matched = Vec::new();
    for record in records {
        if predicate.matches(record)? {
            matched.push(record);
        }
    }
    Ok(matched)
}
