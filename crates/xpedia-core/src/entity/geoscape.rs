//! Geoscape kinds with no kind-local wiring of their own.

use serde::Deserialize;

use crate::entity::{EntityKind, decode};
use crate::record::Record;
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// A player craft.
#[derive(Debug, Clone, Deserialize)]
pub struct Craft {
    #[serde(rename = "type")]
    pub id: String,
    /// Starting conditions that allow this craft.
    #[serde(skip)]
    pub starting_conditions: Vec<String>,
    #[serde(flatten)]
    pub extra: Record,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CraftWeapon {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Record,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ufo {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Record,
}

/// A base facility.
#[derive(Debug, Clone, Deserialize)]
pub struct Facility {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for Craft {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for CraftWeapon {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Ufo {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Facility {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn construct_craft(record: Record, rul: &mut Ruleset) {
    if let Some(craft) = decode::<Craft>(EntityKind::Craft, record) {
        rul.crafts.insert(craft);
    }
}

pub(crate) fn construct_craft_weapon(record: Record, rul: &mut Ruleset) {
    if let Some(weapon) = decode::<CraftWeapon>(EntityKind::CraftWeapon, record) {
        rul.craft_weapons.insert(weapon);
    }
}

pub(crate) fn construct_ufo(record: Record, rul: &mut Ruleset) {
    if let Some(ufo) = decode::<Ufo>(EntityKind::Ufo, record) {
        rul.ufos.insert(ufo);
    }
}

pub(crate) fn construct_facility(record: Record, rul: &mut Ruleset) {
    if let Some(facility) = decode::<Facility>(EntityKind::Facility, record) {
        rul.facilities.insert(facility);
    }
}
