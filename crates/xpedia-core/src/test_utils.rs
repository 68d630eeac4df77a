//! Shared test helpers for unit tests, integration tests and downstream crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use serde_json::Value;

use crate::record::{Document, Record};
use crate::ruleset::Ruleset;

// ===========================================================================
// Records and documents
// ===========================================================================

/// Build a record from a JSON object literal. Panics on anything else.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Build a named document from a JSON object literal of sections.
pub fn document(name: &str, sections: Value) -> Document {
    Document::new(name, record(sections))
}

/// Parse the given documents, panicking on failure.
pub fn parse(documents: &[Document]) -> Ruleset {
    Ruleset::parse(documents).expect("ruleset should parse")
}

// ===========================================================================
// A small but complete ruleset
// ===========================================================================

/// One document exercising every entity kind and every cross-reference.
pub fn sample_base() -> Document {
    document(
        "base.rul",
        serde_json::json!({
            "modName": "sample",
            "lang": {
                "STR_RIFLE": "Rifle",
                "STR_RIFLE_CLIP": "Rifle Clip",
                "STR_KNIFE": "Combat Knife",
                "STR_RIFLE_UFOPEDIA": "{NEWLINE}A standard issue rifle.{NEWLINE}Reliable.",
                "STR_LASER_WEAPONS": "Laser Weapons",
                "STR_LASER_RIFLE": "Laser Rifle",
                "STR_DAMAGE_ARMOR_PIERCING": "Armor Piercing",
                "STR_WEAPONS": "Weapons"
            },
            "extraSprites": [
                {"type": "BIGOBS.PCK", "files": {"0": "Resources/rifle.png", "1": "Resources/clip.png"}},
                {"type": "INV_SOLDIER_M0.SPK", "fileSingle": "Resources/doll_m0.png"},
                {"type": "INV_SOLDIER_F0.SPK", "fileSingle": "Resources/doll_f0.png"}
            ],
            "extraSounds": [
                {"type": "BATTLE.CAT", "files": {"0": "Sound/shot.ogg"}}
            ],
            "ufopaedia": [
                {"id": "STR_RIFLE", "section": "STR_WEAPONS", "image_id": "rifle.png"},
                {"id": "STR_LASER_WEAPONS", "section": "STR_WEAPONS", "text": "STR_LASER_WEAPONS"}
            ],
            "items": [
                {
                    "type": "STR_RIFLE",
                    "battleType": 1,
                    "bigSprite": 0,
                    "compatibleAmmo": ["STR_RIFLE_CLIP"],
                    "accuracySnap": 60,
                    "accuracyAimed": 110,
                    "accuracyAuto": 35,
                    "tuSnap": 25,
                    "tuAimed": 80,
                    "tuAuto": 35,
                    "meleePower": 10,
                    "meleeType": 7,
                    "accuracyMelee": 50,
                    "tuMelee": 15
                },
                {"type": "STR_RIFLE_CLIP", "battleType": 2, "bigSprite": 1, "power": 30, "damageType": 1},
                {"type": "STR_KNIFE", "battleType": 3, "power": 25, "damageType": 7, "tuMelee": 12},
                {"type": "STR_LASER_RIFLE", "battleType": 1, "power": 60, "damageType": 4, "accuracySnap": 65, "tuSnap": 25},
                {"type": "STR_ALLOYS", "battleType": 0},
                {"type": "STR_PERSONAL_ARMOR_ITEM", "battleType": 0}
            ],
            "armors": [
                {
                    "type": "STR_PERSONAL_ARMOR_UC",
                    "spriteInv": "INV_SOLDIER_",
                    "storeItem": "STR_PERSONAL_ARMOR_ITEM",
                    "frontArmor": 50,
                    "sideArmor": 40,
                    "rearArmor": 30,
                    "underArmor": 30,
                    "units": ["STR_SOLDIER"]
                },
                {"type": "STR_SECTOID_ARMOR", "frontArmor": 4}
            ],
            "units": [
                {"type": "STR_SOLDIER", "armor": "STR_PERSONAL_ARMOR_UC", "stats": {"tu": 60, "health": 40, "firing": 70}},
                {"type": "STR_SECTOID_SOLDIER", "armor": "STR_SECTOID_ARMOR"}
            ],
            "crafts": [{"type": "STR_SKYRANGER"}, {"type": "STR_INTERCEPTOR"}],
            "craftWeapons": [{"type": "STR_STINGRAY"}],
            "ufos": [{"type": "STR_SMALL_SCOUT"}],
            "facilities": [{"type": "STR_LABORATORY"}],
            "startingConditions": [
                {"type": "CONDITIONS_NightRaid", "allowedCraft": ["STR_SKYRANGER"]}
            ],
            "alienDeployments": [
                {"type": "STR_UFO_CRASH_RECOVERY", "startingCondition": "CONDITIONS_NightRaid"}
            ],
            "research": [
                {"name": "STR_ALIEN_ALLOYS", "cost": 100},
                {"name": "STR_LASER_WEAPONS", "cost": 200, "dependencies": ["STR_ALIEN_ALLOYS"]},
                {
                    "name": "STR_LASER_RIFLE",
                    "cost": 300,
                    "dependencies": ["STR_LASER_WEAPONS"],
                    "getOneFree": ["STR_ALIEN_ALLOYS"],
                    "lookup": "STR_LASER_WEAPONS",
                    "spawnedItem": "STR_ALLOYS"
                }
            ],
            "manufacture": [
                {
                    "name": "STR_LASER_RIFLE",
                    "requires": ["STR_LASER_RIFLE"],
                    "requiredItems": {"STR_ALLOYS": 2},
                    "producedItems": {"STR_LASER_RIFLE": 1}
                }
            ]
        }),
    )
}
