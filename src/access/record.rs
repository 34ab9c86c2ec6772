//! Record capability consumed by the field resolver.

use crate::access::{Value, ValueKind};
use std::collections::HashMap;

/// A declared field of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name in the record's native naming convention (e.g. `IsActive`)
    pub name: String,
    /// Explicit external name (e.g. `is_active`), matched verbatim
    pub tag: Option<String>,
    /// Declared kind of a present value; `None` accepts any kind
    pub kind: Option<ValueKind>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            tag: None,
            kind: Some(kind),
        }
    }

    /// A field whose values are not constrained to one kind
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            kind: None,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Field declarations of a record type, built once when the type is registered.
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    fields: Vec<FieldDef>,
    by_tag: HashMap<String, usize>,
}

impl RecordSchema {
    /// Build a schema and its tag index. When two fields carry the same tag
    /// the first declaration wins.
    pub fn new(fields: Vec<FieldDef>) -> Self {
        let mut by_tag = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if let Some(tag) = &field.tag {
                by_tag.entry(tag.clone()).or_insert(i);
            }
        }
        Self { fields, by_tag }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_tag(&self, tag: &str) -> Option<&FieldDef> {
        self.by_tag.get(tag).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read-only access to the named fields of one record.
///
/// `get` returns `None` only when the record has no field called `name`.
/// A declared field whose slot is empty must return `Some(Value::Null)`.
pub trait FieldAccessor {
    fn schema(&self) -> &RecordSchema;

    fn get(&self, name: &str) -> Option<Value>;
}

impl<T: FieldAccessor + ?Sized> FieldAccessor for &T {
    fn schema(&self) -> &RecordSchema {
        (**self).schema()
    }

    fn get(&self, name: &str) -> Option<Value> {
        (**self).get(name)
    }
}
