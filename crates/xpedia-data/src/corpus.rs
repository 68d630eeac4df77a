//! Text corpus splitting and YAML document decoding.
//!
//! A corpus is one text blob holding many ruleset files, each introduced by
//! a header line `FILE: <name>`. Every body is decoded as YAML into a
//! [`Document`]. Bodies that fail to decode, or that are not a mapping at
//! the top level, are discarded with a warning; the rest still load.

use serde_json::{Map, Number, Value};
use tracing::{debug, warn};
use xpedia_core::Document;

use crate::loader::DataLoadError;

/// Prefix of a corpus header line.
pub const FILE_HEADER: &str = "FILE: ";

/// Byte-order mark, and the same three bytes decoded as Windows-1251.
const BYTE_ORDER_MARKS: [&str; 2] = ["\u{feff}", "п»ї"];

/// Split a corpus into `(name, body)` pairs, in order. Text before the first
/// header belongs to no file and is ignored.
pub fn split_corpus(text: &str) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = Vec::new();
    for line in text.split_inclusive('\n') {
        if let Some(name) = line.strip_prefix(FILE_HEADER) {
            files.push((name.trim_end_matches(['\r', '\n']).to_string(), String::new()));
        } else if let Some((_, body)) = files.last_mut() {
            body.push_str(line);
        }
    }
    for (_, body) in &mut files {
        *body = strip_byte_order_mark(body).to_string();
    }
    files
}

fn strip_byte_order_mark(body: &str) -> &str {
    let trimmed = body.trim_start_matches(['\r', '\n']);
    BYTE_ORDER_MARKS
        .iter()
        .find_map(|mark| trimmed.strip_prefix(mark))
        .unwrap_or(body)
}

/// Decode every file of a corpus, discarding the ones that do not decode.
pub fn parse_corpus(text: &str) -> Vec<Document> {
    split_corpus(text)
        .into_iter()
        .filter_map(|(name, body)| match parse_yaml_document(&name, &body) {
            Ok(document) => Some(document),
            Err(error) => {
                warn!(file = %name, %error, "document discarded");
                None
            }
        })
        .collect()
}

/// Decode one YAML text into a document.
pub fn parse_yaml_document(name: &str, text: &str) -> Result<Document, DataLoadError> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| DataLoadError::Parse {
        file: name.into(),
        detail: e.to_string(),
    })?;
    into_document(name, yaml_to_json(value))
}

/// Wrap a decoded value as a document. Only mappings qualify.
pub fn into_document(name: &str, value: Value) -> Result<Document, DataLoadError> {
    match value {
        Value::Object(sections) => {
            debug!(file = name, sections = sections.len(), "document decoded");
            Ok(Document::new(name, sections))
        }
        other => Err(DataLoadError::NotADocument {
            file: name.into(),
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Convert a YAML value into the JSON data model. Non-string mapping keys,
/// such as the numbered keys of sprite `files`, are stringified; tags are
/// dropped.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(list) => Value::Array(list.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => match yaml_to_json(other) {
            Value::String(s) => s,
            value => value.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CORPUS: &str = "FILE: base/items.rul\nitems:\n  - type: STR_RIFLE\n    power: 30\nFILE: base/lang.yml\nen-US:\n  STR_RIFLE: Rifle\n";

    #[test]
    fn split_on_headers() {
        let files = split_corpus(CORPUS);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].0, "base/items.rul");
        assert!(files[0].1.starts_with("items:"));
        assert_eq!(files[1].0, "base/lang.yml");
    }

    #[test]
    fn text_before_first_header_ignored() {
        let files = split_corpus("junk\nFILE: a.rul\nmodName: a\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1, "modName: a\n");
    }

    #[test]
    fn byte_order_marks_stripped() {
        let files = split_corpus("FILE: a.rul\n\u{feff}modName: a\nFILE: b.rul\nп»їmodName: b\n");
        assert_eq!(files[0].1, "modName: a\n");
        assert_eq!(files[1].1, "modName: b\n");
    }

    #[test]
    fn crlf_header() {
        let files = split_corpus("FILE: a.rul\r\nmodName: a\r\n");
        assert_eq!(files[0].0, "a.rul");
    }

    #[test]
    fn corpus_decodes_to_documents() {
        let docs = parse_corpus(CORPUS);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].name, "base/items.rul");
        assert_eq!(docs[0].sections["items"][0]["power"], json!(30));
    }

    #[test]
    fn broken_and_scalar_documents_discarded() {
        let docs = parse_corpus("FILE: bad.rul\nitems: [unclosed\nFILE: scalar.rul\njust text\nFILE: ok.rul\nmodName: ok\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "ok.rul");
    }

    #[test]
    fn numeric_keys_stringified() {
        let doc = parse_yaml_document(
            "sprites.rul",
            "extraSprites:\n  - type: BIGOBS.PCK\n    files:\n      0: a.png\n      12: b.png\n",
        )
        .unwrap();
        assert_eq!(
            doc.sections["extraSprites"][0]["files"],
            json!({"0": "a.png", "12": "b.png"})
        );
    }

    #[test]
    fn numbers_keep_their_kind() {
        let value = yaml_to_json(serde_yaml::from_str("a: 3\nb: 0.5\nc: -2").unwrap());
        assert_eq!(value, json!({"a": 3, "b": 0.5, "c": -2}));
    }

    #[test]
    fn empty_document_is_not_a_document() {
        let err = parse_yaml_document("empty.rul", "").unwrap_err();
        assert!(matches!(err, DataLoadError::NotADocument { .. }));
    }
}
