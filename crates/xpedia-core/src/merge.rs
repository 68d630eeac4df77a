//! Document Merge Engine.
//!
//! Accumulates the section values of an ordered sequence of documents into
//! one value per section name. The merge depth rule is fixed and applies to
//! every section alike:
//!
//! - first sighting: the value is taken verbatim;
//! - sequence onto sequence: concatenate, order preserved, no duplicate
//!   suppression;
//! - mapping onto mapping: for each key of the new mapping, if both sides
//!   hold a mapping under that key the new sub-fields are assigned over the
//!   old ones (one level, no deeper); otherwise the new value replaces the
//!   old one;
//! - any other combination: the later value replaces the earlier one.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::shape_name;
use crate::lang::{Localization, is_language_section};
use crate::record::Document;

/// Merge all documents, in order, into one section map. Language tables are
/// additionally merged into `lang`.
pub fn merge_documents(documents: &[Document], lang: &mut Localization) -> Map<String, Value> {
    let mut merged = Map::new();
    for document in documents {
        merge_document(&mut merged, document, lang);
    }
    merged
}

/// Merge one document into the accumulator.
pub fn merge_document(merged: &mut Map<String, Value>, document: &Document, lang: &mut Localization) {
    for (name, value) in &document.sections {
        if is_language_section(name)
            && let Value::Object(table) = value
        {
            lang.merge_table(table);
        }

        match merged.get_mut(name) {
            None => {
                merged.insert(name.clone(), value.clone());
            }
            Some(existing) => merge_value(name, existing, value.clone(), &document.name),
        }
    }
}

fn merge_value(section: &str, existing: &mut Value, adding: Value, origin: &str) {
    match (existing, adding) {
        (Value::Array(old), Value::Array(new)) => old.extend(new),
        (Value::Object(old), Value::Object(new)) => {
            for (key, value) in new {
                let nested = matches!(
                    (old.get(&key), &value),
                    (Some(Value::Object(_)), Value::Object(_))
                );
                if !nested {
                    old.insert(key, value);
                } else if let (Some(Value::Object(old_fields)), Value::Object(new_fields)) =
                    (old.get_mut(&key), value)
                {
                    for (field, v) in new_fields {
                        old_fields.insert(field, v);
                    }
                }
            }
        }
        (existing, adding) => {
            let (old_shape, new_shape) = (shape_name(existing), shape_name(&adding));
            if old_shape != new_shape && !existing.is_null() {
                warn!(
                    section,
                    document = origin,
                    was = old_shape,
                    now = new_shape,
                    "section changes shape between documents; later value replaces earlier"
                );
            } else {
                debug!(section, document = origin, "section value replaced");
            }
            *existing = adding;
        }
    }
}
