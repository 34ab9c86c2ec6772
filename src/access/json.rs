//! Dynamic records backed by a JSON object.

use crate::access::{FieldAccessor, FieldDef, RecordSchema, Value};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// A record whose fields are the keys of a flat JSON object.
///
/// Every key is both the native field name and its tag, so snake_case keys
/// resolve through the tag lookup.
#[derive(Debug, Clone)]
pub struct JsonRecord {
    schema: RecordSchema,
    values: HashMap<String, Value>,
}

impl JsonRecord {
    pub fn from_value(json: serde_json::Value) -> Result<Self> {
        let object = match json {
            serde_json::Value::Object(object) => object,
            other => bail!("Expected a JSON object, got {}", json_type_name(&other)),
        };

        let mut fields = Vec::with_capacity(object.len());
        let mut values = HashMap::with_capacity(object.len());
        for (key, raw) in object {
            let value: Value = serde_json::from_value(raw)
                .with_context(|| format!("Field {} must hold a scalar value", key))?;
            fields.push(FieldDef::untyped(key.clone()).tag(key.clone()));
            values.insert(key, value);
        }

        Ok(Self {
            schema: RecordSchema::new(fields),
            values,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file {}", path.display()))?;
        text.parse()
    }
}

impl FromStr for JsonRecord {
    type Err = anyhow::Error;

    fn from_str(json: &str) -> Result<Self> {
        let value = serde_json::from_str(json).context("Invalid JSON record")?;
        Self::from_value(value)
    }
}

impl FieldAccessor for JsonRecord {
    fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
