//! Sprite and sound references.
//!
//! `extraSprites` records map a sprite identifier to one file or to a
//! numbered set of files. A handful of well-known sheets are also exposed as
//! numbered tables that items and facilities index into.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::record::{Record, key_value};

/// Sheet holding inventory ("big") item sprites.
pub const BIG_OBJECTS: &str = "BIGOBS.PCK";
/// Sheet holding floor item sprites.
pub const FLOOR_OBJECTS: &str = "FLOOROB.PCK";
/// Sheet holding in-hand item sprites.
pub const HAND_OBJECTS: &str = "HANDOB.PCK";
/// Sheet holding base facility sprites.
pub const BASE_BITS: &str = "BASEBITS.PCK";

/// A numbered table of file paths.
pub type NumberedFiles = BTreeMap<i64, String>;

/// One `extraSprites` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub id: String,
    /// The primary file: `files[0]`, or `fileSingle` when given.
    pub path: Option<String>,
    pub files: NumberedFiles,
}

impl Sprite {
    /// Build a sprite from its record. Returns `None` when the record names
    /// neither `type` nor `typeSingle`.
    pub fn from_record(record: &Record) -> Option<Sprite> {
        let id = key_value(record, "type").or_else(|| key_value(record, "typeSingle"))?;
        let files = record.get("files").map(numbered_files).unwrap_or_default();
        let mut path = files.get(&0).cloned();
        if let Some(Value::String(single)) = record.get("fileSingle") {
            path = Some(single.clone());
        }
        Some(Sprite { id, path, files })
    }
}

/// Read a `files` value: a mapping keyed by number, or a plain sequence.
pub fn numbered_files(value: &Value) -> NumberedFiles {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| Some((k.trim().parse::<i64>().ok()?, v.as_str()?.to_string())))
            .collect(),
        Value::Array(list) => list
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((i as i64, v.as_str()?.to_string())))
            .collect(),
        _ => NumberedFiles::new(),
    }
}

/// The numbered sprite and sound tables.
#[derive(Debug, Clone, Default)]
pub struct SpriteSheets {
    pub big: NumberedFiles,
    pub floor: NumberedFiles,
    pub hand: NumberedFiles,
    pub base: NumberedFiles,
    pub sounds: NumberedFiles,
}

impl SpriteSheets {
    /// Pick the well-known sheets out of the registered sprites.
    pub fn from_sprites(sprites: &BTreeMap<String, Sprite>) -> Self {
        let sheet = |name: &str| {
            sprites
                .get(name)
                .map(|s| s.files.clone())
                .unwrap_or_default()
        };
        Self {
            big: sheet(BIG_OBJECTS),
            floor: sheet(FLOOR_OBJECTS),
            hand: sheet(HAND_OBJECTS),
            base: sheet(BASE_BITS),
            sounds: NumberedFiles::new(),
        }
    }

    /// Look up a sheet by its file name.
    pub fn sheet(&self, name: &str) -> Option<&NumberedFiles> {
        match name {
            BIG_OBJECTS => Some(&self.big),
            FLOOR_OBJECTS => Some(&self.floor),
            HAND_OBJECTS => Some(&self.hand),
            BASE_BITS => Some(&self.base),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record;
    use serde_json::json;

    #[test]
    fn sprite_from_numbered_files() {
        let s = Sprite::from_record(&record(json!({
            "type": "BIGOBS.PCK",
            "files": {"0": "a.png", "7": "b.png"}
        })))
        .unwrap();
        assert_eq!(s.id, "BIGOBS.PCK");
        assert_eq!(s.path.as_deref(), Some("a.png"));
        assert_eq!(s.files.get(&7).map(String::as_str), Some("b.png"));
    }

    #[test]
    fn file_single_wins_over_files() {
        let s = Sprite::from_record(&record(json!({
            "typeSingle": "INV.SPK",
            "files": {"0": "a.png"},
            "fileSingle": "single.png"
        })))
        .unwrap();
        assert_eq!(s.id, "INV.SPK");
        assert_eq!(s.path.as_deref(), Some("single.png"));
    }

    #[test]
    fn sprite_without_identifier_skipped() {
        assert!(Sprite::from_record(&record(json!({"fileSingle": "x.png"}))).is_none());
    }

    #[test]
    fn files_as_sequence() {
        let files = numbered_files(&json!(["a.png", "b.png"]));
        assert_eq!(files.len(), 2);
        assert_eq!(files[&1], "b.png");
    }

    #[test]
    fn non_numeric_file_keys_ignored() {
        let files = numbered_files(&json!({"zero": "a.png", "3": "d.png"}));
        assert_eq!(files.len(), 1);
        assert_eq!(files[&3], "d.png");
    }

    #[test]
    fn sheets_from_sprites() {
        let mut sprites = BTreeMap::new();
        let big = Sprite::from_record(&record(json!({
            "type": "BIGOBS.PCK",
            "files": {"0": "rifle.png"}
        })))
        .unwrap();
        sprites.insert(big.id.clone(), big);
        let sheets = SpriteSheets::from_sprites(&sprites);
        assert_eq!(sheets.big[&0], "rifle.png");
        assert!(sheets.floor.is_empty());
        assert_eq!(sheets.sheet(BIG_OBJECTS).map(|s| s.len()), Some(1));
        assert!(sheets.sheet("UNKNOWN.PCK").is_none());
    }
}
