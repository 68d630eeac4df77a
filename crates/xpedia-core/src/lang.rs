//! The process-wide string localization table.
//!
//! Every section whose name starts with [`LANGUAGE_PREFIX`] is merged into a
//! single flat key-to-text table. Text values have their line-break markers
//! rewritten for display as they are merged in.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Section names starting with this prefix are language tables.
pub const LANGUAGE_PREFIX: &str = "lang";

/// Line-break marker used in source text.
pub const NEWLINE_MARKER: &str = "{NEWLINE}";

/// Line-break marker emitted for display.
pub const DISPLAY_BREAK: &str = "<br/>";

/// Whether a section name denotes a language table.
pub fn is_language_section(name: &str) -> bool {
    name.starts_with(LANGUAGE_PREFIX)
}

/// Strip any leading run of line-break markers, then rewrite the rest as
/// display breaks.
pub fn format_text(text: &str) -> String {
    let mut rest = text;
    while let Some(stripped) = rest.strip_prefix(NEWLINE_MARKER) {
        rest = stripped;
    }
    rest.replace(NEWLINE_MARKER, DISPLAY_BREAK)
}

/// Flat key-to-text table.
#[derive(Debug, Clone, Default)]
pub struct Localization {
    strings: HashMap<String, String>,
}

impl Localization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one language table. Later tables win on conflicting keys.
    /// Non-text values are ignored.
    pub fn merge_table(&mut self, table: &Map<String, Value>) {
        for (key, value) in table {
            if let Value::String(text) = value {
                self.strings.insert(key.clone(), format_text(text));
            }
        }
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// Display text for a key, falling back to the key itself.
    pub fn str<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// Add a generated label unless the table already translates the key.
    pub fn insert_if_absent(&mut self, key: &str, text: String) {
        self.strings.entry(key.to_string()).or_insert(text);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
