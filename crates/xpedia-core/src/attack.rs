//! Attack Deriver.
//!
//! An item can be used in up to five ways ("modes"). Which modes apply, and
//! with what damage, cost, accuracy weights and modifiers, follows from a
//! large set of optional mode-prefixed item fields:
//!
//! | Field | Meaning |
//! |---|---|
//! | `accuracy<Mode>` | declares the mode |
//! | `tu<Mode>` | time-unit cost when no cost object is given |
//! | `cost<Mode>` | full cost object |
//! | `flat<Mode>` | `time: true` makes the cost ignore time-unit scaling |
//! | `conf<Mode>` | overrides display name and/or shot count |
//! | `<mode>Range` | range entry of the modifier map |
//!
//! These fields are pulled out of the item record at construction into
//! [`ModeFields`], so they never appear among an item's unknown fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::entity::item::{Item, battle_type};
use crate::lang::Localization;
use crate::record::Record;

/// One way of using an item in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttackMode {
    Ammo,
    Melee,
    Snap,
    Aimed,
    Auto,
}

impl AttackMode {
    /// Every mode, in derivation order.
    pub const ALL: [AttackMode; 5] = [
        AttackMode::Ammo,
        AttackMode::Melee,
        AttackMode::Snap,
        AttackMode::Aimed,
        AttackMode::Auto,
    ];

    /// Lowercase name, as used in `<mode>Range`.
    pub fn key(self) -> &'static str {
        match self {
            AttackMode::Ammo => "ammo",
            AttackMode::Melee => "melee",
            AttackMode::Snap => "snap",
            AttackMode::Aimed => "aimed",
            AttackMode::Auto => "auto",
        }
    }

    /// Capitalized name: the default display name and the field suffix.
    pub fn label(self) -> &'static str {
        match self {
            AttackMode::Ammo => "Ammo",
            AttackMode::Melee => "Melee",
            AttackMode::Snap => "Snap",
            AttackMode::Aimed => "Aimed",
            AttackMode::Auto => "Auto",
        }
    }
}

/// Time and energy spent on one use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub energy: Option<i64>,
    #[serde(flatten)]
    pub extra: Record,
}

/// A `flat<Mode>` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FlatFlags {
    #[serde(default)]
    pub time: bool,
    #[serde(flatten)]
    pub extra: Record,
}

/// A `conf<Mode>` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModeConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shots: Option<i64>,
    #[serde(flatten)]
    pub extra: Record,
}

/// Everything an item declares for one specific mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeFields {
    pub accuracy: Option<i64>,
    pub time_units: Option<i64>,
    pub cost: Option<Cost>,
    pub flat: Option<FlatFlags>,
    pub conf: Option<ModeConfig>,
    /// Present whenever `<mode>Range` is, even if null.
    pub range: Option<Value>,
}

impl ModeFields {
    /// Remove this mode's fields from `record`. Returns `Ok(None)` if the
    /// record declares none of them.
    pub fn take_from(record: &mut Record, mode: AttackMode) -> Result<Option<ModeFields>, serde_json::Error> {
        let label = mode.label();
        let accuracy = record.remove(&format!("accuracy{label}"));
        let time_units = record.remove(&format!("tu{label}"));
        let cost = record.remove(&format!("cost{label}"));
        let flat = record.remove(&format!("flat{label}"));
        let conf = record.remove(&format!("conf{label}"));
        let range = record.remove(&format!("{}Range", mode.key()));

        if [&accuracy, &time_units, &cost, &flat, &conf, &range]
            .iter()
            .all(|v| v.is_none())
        {
            return Ok(None);
        }

        Ok(Some(ModeFields {
            accuracy: decode(accuracy)?,
            time_units: decode(time_units)?,
            cost: decode(cost)?,
            flat: decode(flat)?,
            conf: decode(conf)?,
            range,
        }))
    }
}

fn decode<T: DeserializeOwned>(value: Option<Value>) -> Result<Option<T>, serde_json::Error> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some),
    }
}

/// A derived combat mode of an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attack {
    pub mode: AttackMode,
    pub name: String,
    /// `None` when damage comes from separately loaded ammunition.
    pub damage: Option<i64>,
    pub damage_bonus: Option<Record>,
    pub damage_type: Option<i64>,
    pub accuracy: Option<i64>,
    /// Which stats contribute to hit chance, and with what weight.
    pub accuracy_multiplier: Option<Record>,
    pub cost: Option<Cost>,
    /// Cost ignores time-unit percentage scaling.
    pub flat_time: bool,
    pub alter: Option<Record>,
    pub shots: i64,
    pub pellets: i64,
}

/// Derive every applicable attack of `item`, in [`AttackMode::ALL`] order.
pub fn derive_attacks(item: &Item, lang: &Localization) -> Vec<Attack> {
    AttackMode::ALL
        .into_iter()
        .filter_map(|mode| derive_attack(item, mode, lang))
        .collect()
}

/// Derive one mode, or `None` if it does not apply to `item`.
pub fn derive_attack(item: &Item, mode: AttackMode, lang: &Localization) -> Option<Attack> {
    let none = ModeFields::default();
    let fields = item.modes.get(&mode).unwrap_or(&none);
    let melee_weapon = item.battle_type == battle_type::MELEE;

    let implicit = match mode {
        AttackMode::Melee => melee_weapon,
        AttackMode::Ammo => item.battle_type == battle_type::AMMO,
        _ => false,
    };
    let declared = fields.accuracy.is_some_and(|a| a != 0);
    if !declared && !implicit {
        return None;
    }

    // A firearm's melee mode is its secondary (butt-stroke) attack.
    let (damage, damage_bonus, damage_type) =
        if mode == AttackMode::Melee && item.battle_type == battle_type::FIREARM {
            (item.melee_power, item.melee_bonus.clone(), item.melee_type)
        } else if item.compatible_ammo.is_none() {
            (item.power, item.damage_bonus.clone(), item.damage_type)
        } else {
            (None, None, None)
        };

    let mut name = mode.label().to_string();
    let mut shots = match mode {
        AttackMode::Auto => nonzero(item.auto_shots).unwrap_or(3),
        _ => 1,
    };
    if let Some(conf) = &fields.conf {
        if let Some(conf_name) = conf.name.as_deref().filter(|n| !n.is_empty()) {
            name = lang.str(conf_name).to_string();
        }
        if let Some(conf_shots) = nonzero(conf.shots) {
            shots = conf_shots;
        }
    }

    let primary = mode != AttackMode::Melee || melee_weapon;
    let mut alter = if primary {
        item.damage_alter.clone()
    } else {
        item.melee_alter.clone()
    };

    let mut attack = Attack {
        mode,
        name,
        damage,
        damage_bonus,
        damage_type,
        accuracy: None,
        accuracy_multiplier: None,
        cost: None,
        flat_time: false,
        alter: None,
        shots,
        pellets: nonzero(item.shotgun_pellets).unwrap_or(1),
    };

    if mode != AttackMode::Ammo {
        attack.flat_time = (primary && item.flat_rate) || fields.flat.as_ref().is_some_and(|f| f.time);
        attack.cost = Some(fields.cost.clone().unwrap_or_else(|| Cost {
            time: fields.time_units,
            energy: Some(0),
            extra: Record::new(),
        }));
        attack.accuracy = fields.accuracy;

        let declared = match mode {
            AttackMode::Melee => &item.melee_multiplier,
            _ => &item.accuracy_multiplier,
        };
        attack.accuracy_multiplier = Some(declared.clone().unwrap_or_else(|| default_multiplier(mode)));
    }

    if let Some(range) = &fields.range {
        alter
            .get_or_insert_with(Record::new)
            .insert("range".to_string(), range.clone());
    }
    attack.alter = alter;

    Some(attack)
}

/// `{melee: 1}` for melee, `{firing: 1}` for everything else.
pub fn default_multiplier(mode: AttackMode) -> Record {
    let stat = match mode {
        AttackMode::Melee => "melee",
        _ => "firing",
    };
    let mut weights = Record::new();
    weights.insert(stat.to_string(), json!(1));
    weights
}

fn nonzero(value: Option<i64>) -> Option<i64> {
    value.filter(|&v| v != 0)
}
