//! Untyped records and documents as they arrive from the corpus.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// An untyped field mapping from a source document.
pub type Record = Map<String, Value>;

/// One decoded document of the corpus: top-level section name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Human-readable origin, used only in diagnostics.
    pub name: String,
    pub sections: Map<String, Value>,
}

impl Document {
    pub fn new(name: impl Into<String>, sections: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            sections,
        }
    }
}

/// Field name that marks a record as a tombstone.
pub const DELETE_FIELD: &str = "delete";

/// Read `field` as an identifier. Strings and numbers qualify; empty strings
/// do not.
pub fn key_value(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The key a deduplicated record is addressed by: `type`, else `id`, else
/// `name`, else the value of `delete`.
pub fn record_key(record: &Record) -> Option<String> {
    ["type", "id", "name", DELETE_FIELD]
        .iter()
        .find_map(|field| key_value(record, field))
}

/// Whether the record is a tombstone.
pub fn is_tombstone(record: &Record) -> bool {
    record.contains_key(DELETE_FIELD)
}

/// Shallow merge: every field of `patch` overwrites the same field of `base`.
pub fn shallow_merge(base: &mut Record, patch: Record) {
    for (field, value) in patch {
        base.insert(field, value);
    }
}

/// Deserialize a field whose explicit `null` means "not given".
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a field that rulesets write either as a string or a number.
pub(crate) fn string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
