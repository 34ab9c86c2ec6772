use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of values a record field or a literal can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Integer,
    Float,
    Text,
    Boolean,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "NULL",
            ValueKind::Integer => "INTEGER",
            ValueKind::Float => "FLOAT",
            ValueKind::Text => "TEXT",
            ValueKind::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value or a SQL literal.
///
/// The untagged representation maps JSON scalars directly: `null`, `true`,
/// `42`, `4.2` and `"text"`. Integral numbers that do not fit an `i64`
/// fall through to `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Get the kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// An empty slot becomes `Null`, a present one its typed value
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(slot: Option<T>) -> Self {
        slot.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::Boolean(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::Integer(42).kind(), ValueKind::Integer);
        assert_eq!(Value::Float(4.5).kind(), ValueKind::Float);
        assert_eq!(Value::Text("hi".to_string()).kind(), ValueKind::Text);
    }

    #[test]
    fn test_optional_slots() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(25)), Value::Integer(25));
        assert_eq!(Value::from(Some("")), Value::Text(String::new()));
        // zero and empty text are values, not NULL
        assert!(!Value::from(Some(0i64)).is_null());
        assert!(!Value::from(Some("")).is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Text("it's".to_string()).to_string(), "'it''s'");
        assert_eq!(ValueKind::Boolean.to_string(), "BOOLEAN");
    }

    #[test]
    fn test_json_scalars() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 42, 4.5, "张三", 18446744073709551615]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Boolean(true),
                Value::Integer(42),
                Value::Float(4.5),
                Value::Text("张三".to_string()),
                Value::Float(18446744073709551615.0),
            ]
        );

        assert!(serde_json::from_str::<Value>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Value>(r#"{"a": 1}"#).is_err());
    }
}
