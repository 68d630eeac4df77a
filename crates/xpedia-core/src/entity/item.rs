use std::cell::OnceCell;
use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::attack::{Attack, AttackMode, ModeFields, derive_attacks};
use crate::catalog::{ArticleSpec, ITEMS};
use crate::entity::{EntityKind, decode_with};
use crate::lang::Localization;
use crate::record::{Record, or_default};
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// Battle categories an item can belong to.
pub mod battle_type {
    pub const NONE: i64 = 0;
    pub const FIREARM: i64 = 1;
    pub const AMMO: i64 = 2;
    pub const MELEE: i64 = 3;
    pub const GRENADE: i64 = 4;
    pub const PROXIMITY_GRENADE: i64 = 5;
    pub const MEDIKIT: i64 = 6;
    pub const SCANNER: i64 = 7;
    pub const MIND_PROBE: i64 = 8;
    pub const PSI_AMP: i64 = 9;
    pub const FLARE: i64 = 10;
    pub const CORPSE: i64 = 11;
}

/// Display names of the battle categories, indexed by `battleType`.
pub const BATTLE_TYPES: [&str; 12] = [
    "None (Geoscape-only item)",
    "Firearm",
    "Ammo",
    "Melee",
    "Grenade",
    "Proximity Grenade",
    "Medi-Kit",
    "Motion Scanner",
    "Mind Probe",
    "Psi-Amp",
    "Electro-flare",
    "Corpse",
];

/// Language keys of the damage types, indexed by `damageType`.
pub const DAMAGE_TYPES: [&str; 18] = [
    "STR_DAMAGE_NONE",
    "STR_DAMAGE_ARMOR_PIERCING",
    "STR_DAMAGE_INCENDIARY",
    "STR_DAMAGE_HIGH_EXPLOSIVE",
    "STR_DAMAGE_LASER_BEAM",
    "STR_DAMAGE_PLASMA_BEAM",
    "STR_DAMAGE_STUN",
    "STR_DAMAGE_MELEE",
    "STR_DAMAGE_ACID",
    "STR_DAMAGE_SMOKE",
    "STR_DAMAGE_10",
    "STR_DAMAGE_11",
    "STR_DAMAGE_12",
    "STR_DAMAGE_13",
    "STR_DAMAGE_14",
    "STR_DAMAGE_15",
    "STR_DAMAGE_16",
    "STR_DAMAGE_17",
];

fn one() -> i64 {
    1
}

/// A battlescape or geoscape item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub battle_type: i64,
    #[serde(default)]
    pub big_sprite: Option<i64>,
    #[serde(default = "one")]
    pub inv_width: i64,
    #[serde(default = "one")]
    pub inv_height: i64,
    /// `None` when the item needs no separate ammunition.
    #[serde(default)]
    pub compatible_ammo: Option<Vec<String>>,

    #[serde(default)]
    pub power: Option<i64>,
    #[serde(default)]
    pub damage_type: Option<i64>,
    #[serde(default)]
    pub damage_bonus: Option<Record>,
    #[serde(default)]
    pub damage_alter: Option<Record>,
    #[serde(default)]
    pub melee_power: Option<i64>,
    #[serde(default)]
    pub melee_type: Option<i64>,
    #[serde(default)]
    pub melee_bonus: Option<Record>,
    #[serde(default)]
    pub melee_alter: Option<Record>,
    #[serde(default)]
    pub shotgun_pellets: Option<i64>,
    #[serde(default)]
    pub auto_shots: Option<i64>,
    #[serde(default, deserialize_with = "or_default")]
    pub flat_rate: bool,
    #[serde(default)]
    pub accuracy_multiplier: Option<Record>,
    #[serde(default)]
    pub melee_multiplier: Option<Record>,

    /// `flatThrow.time`, lifted out of its sub-object.
    #[serde(skip)]
    pub flat_throw_time: Option<bool>,
    /// Mode-prefixed fields, keyed by the mode they belong to.
    #[serde(skip)]
    pub modes: BTreeMap<AttackMode, ModeFields>,
    /// Sheet-relative path of the inventory sprite.
    #[serde(skip)]
    pub sprite: Option<String>,

    #[serde(skip)]
    pub compatible_weapons: Vec<String>,
    #[serde(skip)]
    pub spawned_by: Vec<String>,
    /// Manufacture projects producing this item, with quantity.
    #[serde(skip)]
    pub manufacture: BTreeMap<String, i64>,
    /// Manufacture projects consuming this item, with quantity.
    #[serde(skip)]
    pub component_of: BTreeMap<String, i64>,
    /// Armors stored as this item.
    #[serde(skip)]
    pub armors: Vec<String>,

    #[serde(skip)]
    attacks: OnceCell<Vec<Attack>>,

    #[serde(flatten)]
    pub extra: Record,
}

impl Item {
    /// Decode an item, pulling its mode-prefixed and `flatThrow` fields out
    /// of the record first.
    pub fn from_record(mut record: Record) -> Result<Item, serde_json::Error> {
        let mut modes = BTreeMap::new();
        for mode in AttackMode::ALL {
            if let Some(fields) = ModeFields::take_from(&mut record, mode)? {
                modes.insert(mode, fields);
            }
        }
        let flat_throw = record.remove("flatThrow");

        let mut item: Item = serde_json::from_value(Value::Object(record))?;
        item.modes = modes;
        item.flat_throw_time = flat_throw
            .as_ref()
            .and_then(|f| f.get("time"))
            .and_then(Value::as_bool);
        Ok(item)
    }

    /// The item's attack modes. Derived on first call, then reused.
    pub fn attacks(&self, lang: &Localization) -> &[Attack] {
        self.attacks.get_or_init(|| derive_attacks(self, lang))
    }

    pub fn battle_type_name(&self) -> Option<&'static str> {
        battle_type_name(self.battle_type)
    }
}

impl Keyed for Item {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Display name of a battle category.
pub fn battle_type_name(battle_type: i64) -> Option<&'static str> {
    usize::try_from(battle_type)
        .ok()
        .and_then(|i| BATTLE_TYPES.get(i))
        .copied()
}

/// Language key of a damage type.
pub fn damage_type_key(damage_type: i64) -> Option<&'static str> {
    usize::try_from(damage_type)
        .ok()
        .and_then(|i| DAMAGE_TYPES.get(i))
        .copied()
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(mut item) = decode_with(EntityKind::Item, record, Item::from_record) else {
        return;
    };
    item.sprite = item
        .big_sprite
        .and_then(|n| rul.sheets.big.get(&n).cloned());

    rul.catalog.create_article(
        ArticleSpec::new(&item.id).section(ITEMS).type_id(ITEMS),
        &rul.lang,
    );
    rul.items.insert(item);
}
