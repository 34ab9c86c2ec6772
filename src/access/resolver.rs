//! Column name resolution against a record.

use crate::access::{FieldAccessor, FieldDef, Value};
use crate::expression::{EvalError, EvalResult};
use log::trace;

/// Convert a snake_case column name to the native field convention:
/// `is_active` becomes `IsActive`.
pub fn to_native_name(column: &str) -> String {
    column
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Maps SQL column identifiers to values of one record
pub struct FieldResolver<'a, R: FieldAccessor + ?Sized> {
    record: &'a R,
}

impl<'a, R: FieldAccessor + ?Sized> FieldResolver<'a, R> {
    pub fn new(record: &'a R) -> Self {
        Self { record }
    }

    /// Resolve `column` to the current value of its field.
    ///
    /// The native-cased name is tried first, then a field whose tag equals
    /// `column` verbatim.
    pub fn resolve(&self, column: &str) -> EvalResult<Value> {
        let (field, value) = self.lookup(column)?;
        self.check_kind(column, field, value)
    }

    /// Whether the field behind `column` is empty. The declared kind is not
    /// checked, so this never fails on type grounds.
    pub fn is_null(&self, column: &str) -> EvalResult<bool> {
        let (_, value) = self.lookup(column)?;
        Ok(value.is_null())
    }

    fn lookup(&self, column: &str) -> EvalResult<(Option<&'a FieldDef>, Value)> {
        let record = self.record;
        let schema = record.schema();
        let native = to_native_name(column);

        if let Some(value) = record.get(&native) {
            trace!("resolved column {} as field {}", column, native);
            return Ok((schema.field(&native), value));
        }

        if let Some(field) = schema.field_by_tag(column) {
            if let Some(value) = record.get(&field.name) {
                trace!("resolved column {} by tag on field {}", column, field.name);
                return Ok((Some(field), value));
            }
        }

        Err(EvalError::field_not_found(column))
    }

    fn check_kind(&self, column: &str, field: Option<&FieldDef>, value: Value) -> EvalResult<Value> {
        match field.and_then(|f| f.kind) {
            Some(declared) if !value.is_null() && value.kind() != declared => {
                Err(EvalError::TypeMismatch {
                    column: column.to_string(),
                    operator: "field".to_string(),
                    left: declared,
                    right: value.kind(),
                })
            }
            _ => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{RecordSchema, ValueKind};

    struct Account {
        schema: RecordSchema,
        id: Option<i64>,
        display_name: Option<String>,
        broken: Value,
    }

    impl Account {
        fn new(id: Option<i64>, display_name: Option<&str>) -> Self {
            Self {
                schema: RecordSchema::new(vec![
                    FieldDef::new("ID", ValueKind::Integer).tag("id"),
                    FieldDef::new("DisplayName", ValueKind::Text).tag("nick"),
                    FieldDef::new("Broken", ValueKind::Integer),
                ]),
                id,
                display_name: display_name.map(str::to_string),
                broken: Value::Text("oops".to_string()),
            }
        }
    }

    impl FieldAccessor for Account {
        fn schema(&self) -> &RecordSchema {
            &self.schema
        }

        fn get(&self, name: &str) -> Option<Value> {
            match name {
                "ID" => Some(self.id.into()),
                "DisplayName" => Some(self.display_name.clone().into()),
                "Broken" => Some(self.broken.clone()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_to_native_name() {
        assert_eq!(to_native_name("is_active"), "IsActive");
        assert_eq!(to_native_name("name"), "Name");
        assert_eq!(to_native_name("id"), "Id");
        assert_eq!(to_native_name("Already"), "Already");
        assert_eq!(to_native_name("a__b"), "AB");
    }

    #[test]
    fn test_resolve_by_native_name() {
        let account = Account::new(Some(7), Some("neo"));
        let resolver = FieldResolver::new(&account);
        assert_eq!(
            resolver.resolve("display_name").unwrap(),
            Value::Text("neo".to_string())
        );
    }

    #[test]
    fn test_resolve_by_tag() {
        let account = Account::new(Some(7), Some("neo"));
        let resolver = FieldResolver::new(&account);
        // `id` becomes `Id`, which only the tag can rescue
        assert_eq!(resolver.resolve("id").unwrap(), Value::Integer(7));
        assert_eq!(
            resolver.resolve("nick").unwrap(),
            Value::Text("neo".to_string())
        );
    }

    #[test]
    fn test_resolve_empty_slot() {
        let account = Account::new(None, None);
        let resolver = FieldResolver::new(&account);
        assert_eq!(resolver.resolve("id").unwrap(), Value::Null);
        assert_eq!(resolver.resolve("display_name").unwrap(), Value::Null);
        // repeated lookups see the same value
        assert_eq!(resolver.resolve("id").unwrap(), Value::Null);
    }

    #[test]
    fn test_resolve_missing_field() {
        let account = Account::new(Some(1), None);
        let resolver = FieldResolver::new(&account);
        assert_eq!(
            resolver.resolve("email"),
            Err(EvalError::field_not_found("email"))
        );
        // tags are matched verbatim
        assert!(resolver.resolve("NICK").is_err());
    }

    #[test]
    fn test_resolve_declared_kind_mismatch() {
        let account = Account::new(Some(1), None);
        let resolver = FieldResolver::new(&account);
        assert!(matches!(
            resolver.resolve("broken"),
            Err(EvalError::TypeMismatch {
                left: ValueKind::Integer,
                right: ValueKind::Text,
                ..
            })
        ));
        // null tests only look at presence
        assert_eq!(resolver.is_null("broken"), Ok(false));
    }

    #[test]
    fn test_is_null() {
        let account = Account::new(None, Some("neo"));
        let resolver = FieldResolver::new(&account);
        assert_eq!(resolver.is_null("id"), Ok(true));
        assert_eq!(resolver.is_null("display_name"), Ok(false));
        assert_eq!(
            resolver.is_null("email"),
            Err(EvalError::field_not_found("email"))
        );
    }
}
