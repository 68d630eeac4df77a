//! Entity Constructors.
//!
//! One typed entity per ruleset kind. Every entity keeps the fields it
//! understands as typed fields and everything else in an `extra` map, so
//! unknown fields survive a load untouched.
//!
//! Constructors take the resolved record and the ruleset under
//! construction. They register the entity and do the wiring that only needs
//! kinds built before them; everything else is left to [`crate::link`].

pub mod alien_deployment;
pub mod armor;
pub mod geoscape;
pub mod item;
pub mod manufacture;
pub mod research;
pub mod starting_conditions;
pub mod unit;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::record::{Record, key_value};
use crate::ruleset::Ruleset;

pub use alien_deployment::AlienDeployment;
pub use armor::{Armor, ArmorFacings};
pub use geoscape::{Craft, CraftWeapon, Facility, Ufo};
pub use item::Item;
pub use manufacture::Manufacture;
pub use research::Research;
pub use starting_conditions::StartingConditions;
pub use unit::{Unit, UnitStats};

/// The entity kinds of a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Item,
    Armor,
    Unit,
    Craft,
    CraftWeapon,
    Ufo,
    Facility,
    StartingConditions,
    AlienDeployment,
    Research,
    Manufacture,
}

impl EntityKind {
    /// Construction order. Units need armors, deployments need starting
    /// conditions and manufacture needs research to already exist.
    pub const CONSTRUCTION_ORDER: [EntityKind; 11] = [
        EntityKind::Item,
        EntityKind::Armor,
        EntityKind::Unit,
        EntityKind::Craft,
        EntityKind::CraftWeapon,
        EntityKind::Ufo,
        EntityKind::Facility,
        EntityKind::StartingConditions,
        EntityKind::AlienDeployment,
        EntityKind::Research,
        EntityKind::Manufacture,
    ];

    /// Name of the source section.
    pub fn section(self) -> &'static str {
        match self {
            EntityKind::Item => "items",
            EntityKind::Armor => "armors",
            EntityKind::Unit => "units",
            EntityKind::Craft => "crafts",
            EntityKind::CraftWeapon => "craftWeapons",
            EntityKind::Ufo => "ufos",
            EntityKind::Facility => "facilities",
            EntityKind::StartingConditions => "startingConditions",
            EntityKind::AlienDeployment => "alienDeployments",
            EntityKind::Research => "research",
            EntityKind::Manufacture => "manufacture",
        }
    }

    /// The field an entity of this kind is keyed by.
    pub fn key_field(self) -> &'static str {
        match self {
            EntityKind::Research | EntityKind::Manufacture => "name",
            _ => "type",
        }
    }

    /// Build and register one entity from its resolved record.
    pub(crate) fn construct(self, record: Record, rul: &mut Ruleset) {
        match self {
            EntityKind::Item => item::construct(record, rul),
            EntityKind::Armor => armor::construct(record, rul),
            EntityKind::Unit => unit::construct(record, rul),
            EntityKind::Craft => geoscape::construct_craft(record, rul),
            EntityKind::CraftWeapon => geoscape::construct_craft_weapon(record, rul),
            EntityKind::Ufo => geoscape::construct_ufo(record, rul),
            EntityKind::Facility => geoscape::construct_facility(record, rul),
            EntityKind::StartingConditions => starting_conditions::construct(record, rul),
            EntityKind::AlienDeployment => alien_deployment::construct(record, rul),
            EntityKind::Research => research::construct(record, rul),
            EntityKind::Manufacture => manufacture::construct(record, rul),
        }
    }
}

/// Decode a record into a typed entity with [`serde_json`].
pub(crate) fn decode<T: DeserializeOwned>(kind: EntityKind, record: Record) -> Option<T> {
    decode_with(kind, record, |record| {
        serde_json::from_value(Value::Object(record))
    })
}

/// Decode a record with a kind-specific decoder.
///
/// Records without a usable key are dropped. The key is normalized to a
/// string so numeric keys decode like any other. A record that still fails
/// to decode is skipped with a warning; the rest of the load continues.
pub(crate) fn decode_with<T>(
    kind: EntityKind,
    mut record: Record,
    decoder: impl FnOnce(Record) -> Result<T, serde_json::Error>,
) -> Option<T> {
    let field = kind.key_field();
    let Some(key) = key_value(&record, field) else {
        debug!(section = kind.section(), field, "record without a key dropped");
        return None;
    };
    record.insert(field.to_string(), Value::String(key.clone()));

    match decoder(record) {
        Ok(entity) => Some(entity),
        Err(error) => {
            warn!(section = kind.section(), %key, %error, "record could not be decoded; skipped");
            None
        }
    }
}
