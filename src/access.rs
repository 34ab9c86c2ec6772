//! Access layer for record-oriented field lookup.
//!
//! This module provides the record side of predicate evaluation:
//!
//! - **Value**: Type-safe representation of field values and literals
//! - **FieldAccessor**: Capability a record type implements to expose its fields
//! - **RecordSchema**: Field declarations and the tag index, built once per type
//! - **FieldResolver**: Maps SQL column identifiers to field values
//! - **JsonRecord**: A dynamic record over a flat JSON object

pub mod json;
pub mod record;
pub mod resolver;
pub mod value;

pub use json::JsonRecord;
pub use record::{FieldAccessor, FieldDef, RecordSchema};
pub use resolver::{to_native_name, FieldResolver};
pub use value::{Value, ValueKind};
