use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::entity::{EntityKind, decode};
use crate::link;
use crate::record::{Record, or_default};
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// Armor values per facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArmorFacings {
    pub front: Option<i64>,
    pub side: Option<i64>,
    pub rear: Option<i64>,
    pub under: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(default)]
    pub sprite_inv: Option<String>,
    /// Body type to layer names, by position or by layer key.
    #[serde(default)]
    pub layers_definition: Option<Record>,
    #[serde(default)]
    pub layers_default_prefix: Option<String>,
    #[serde(default)]
    pub front_armor: Option<i64>,
    #[serde(default)]
    pub side_armor: Option<i64>,
    #[serde(default)]
    pub rear_armor: Option<i64>,
    #[serde(default)]
    pub under_armor: Option<i64>,
    #[serde(default)]
    pub store_item: Option<String>,
    /// Unit types allowed to wear this armor.
    #[serde(default, deserialize_with = "or_default")]
    pub units: Vec<String>,

    #[serde(skip)]
    pub facings: ArmorFacings,
    /// Body type to paper-doll image paths.
    #[serde(skip)]
    pub doll_sprites: BTreeMap<String, Vec<String>>,
    /// Units wearing this armor.
    #[serde(skip)]
    pub users: Vec<String>,

    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for Armor {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(mut armor) = decode::<Armor>(EntityKind::Armor, record) else {
        return;
    };
    armor.facings = ArmorFacings {
        front: armor.front_armor,
        side: armor.side_armor,
        rear: armor.rear_armor,
        under: armor.under_armor,
    };
    armor.doll_sprites = doll_sprites(&armor, rul);

    if let Some(item) = armor.store_item.clone() {
        link::armor_store_item(rul, &armor.id, &item);
    }
    rul.armors.insert(armor);
}

/// Paper-doll images, from explicit layers or by scanning registered
/// sprites for the `spriteInv` prefix.
fn doll_sprites(armor: &Armor, rul: &Ruleset) -> BTreeMap<String, Vec<String>> {
    if let Some(layers) = &armor.layers_definition {
        let prefix = armor.layers_default_prefix.as_deref().unwrap_or_default();
        return layers
            .iter()
            .map(|(body, definition)| {
                let paths = layer_names(definition)
                    .into_iter()
                    .filter(|(_, name)| !name.is_empty())
                    .map(|(layer, name)| rul.sprite(&format!("{prefix}__{layer}__{name}")))
                    .collect();
                (body.clone(), paths)
            })
            .collect();
    }

    let Some(prefix) = armor.sprite_inv.as_deref() else {
        return BTreeMap::new();
    };
    rul.sprites
        .iter()
        .filter_map(|(id, sprite)| {
            let rest = id.strip_prefix(prefix)?;
            let path = sprite.path.as_deref()?;
            // Drop the four-character file extension.
            let keep = rest.chars().count().saturating_sub(4);
            let body: String = rest.chars().take(keep).collect();
            Some((body, vec![rul.asset_path(path)]))
        })
        .collect()
}

fn layer_names(definition: &Value) -> Vec<(String, &str)> {
    match definition {
        Value::Array(list) => list
            .iter()
            .enumerate()
            .filter_map(|(i, v)| Some((i.to_string(), v.as_str()?)))
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| Some((k.clone(), v.as_str()?)))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{document, parse, sample_base};
    use serde_json::json;

    #[test]
    fn facings_collected() {
        let rul = parse(&[sample_base()]);
        let armor = rul.armors().get("STR_PERSONAL_ARMOR_UC").unwrap();
        assert_eq!(
            armor.facings,
            ArmorFacings {
                front: Some(50),
                side: Some(40),
                rear: Some(30),
                under: Some(30)
            }
        );
    }

    #[test]
    fn doll_sprites_from_prefix_scan() {
        let rul = parse(&[sample_base()]);
        let armor = rul.armors().get("STR_PERSONAL_ARMOR_UC").unwrap();
        assert_eq!(
            armor.doll_sprites.keys().collect::<Vec<_>>(),
            vec!["F0", "M0"]
        );
        assert_eq!(
            armor.doll_sprites["M0"],
            vec!["user/mods/sample/Resources/doll_m0.png".to_string()]
        );
    }

    #[test]
    fn doll_sprites_from_layers() {
        let doc = document(
            "layers.rul",
            json!({
                "modName": "m",
                "extraSprites": [
                    {"type": "PFX__1__torso", "fileSingle": "torso.png"}
                ],
                "armors": [{
                    "type": "LAYERED",
                    "layersDefaultPrefix": "PFX",
                    "layersDefinition": {"MAL": ["", "torso", "legs"]},
                    "spriteInv": "IGNORED_"
                }]
            }),
        );
        let rul = parse(&[doc]);
        let armor = rul.armors().get("LAYERED").unwrap();
        assert_eq!(
            armor.doll_sprites["MAL"],
            vec![
                "user/mods/m/torso.png".to_string(),
                "user/mods/m/PFX__2__legs".to_string()
            ]
        );
    }

    #[test]
    fn store_item_back_reference() {
        let rul = parse(&[sample_base()]);
        let item = rul.items().get("STR_PERSONAL_ARMOR_ITEM").unwrap();
        assert_eq!(item.armors, vec!["STR_PERSONAL_ARMOR_UC"]);
    }
}
