//! Integration tests for the ruleset core.
//!
//! These tests exercise the whole parse pipeline across several documents:
//! merging, patching and deleting, construction, linking, attack derivation
//! and the catalog.

use serde_json::json;
use xpedia_core::Ruleset;
use xpedia_core::attack::AttackMode;
use xpedia_core::catalog::{ITEMS, RESEARCH};
use xpedia_core::test_utils::*;

// ===========================================================================
// Merging across documents
// ===========================================================================

#[test]
fn mod_patches_base_in_document_order() {
    let patch = document(
        "mod.rul",
        json!({
            "lang": {"STR_RIFLE": "Assault Rifle"},
            "items": [
                {"type": "STR_RIFLE", "accuracyAuto": 40, "confAuto": {"shots": 5}},
                {"type": "STR_PLASMA_PISTOL", "battleType": 1, "accuracySnap": 65}
            ],
            "research": [{"delete": "STR_LASER_WEAPONS"}]
        }),
    );
    let rul = parse(&[sample_base(), patch]);

    // New items land after the base ones.
    let keys: Vec<&str> = rul.items().keys().collect();
    assert_eq!(keys.first(), Some(&"STR_RIFLE"));
    assert_eq!(keys.last(), Some(&"STR_PLASMA_PISTOL"));

    // Later language tables win.
    assert_eq!(rul.article("STR_RIFLE").unwrap().title, "Assault Rifle");

    // The deleted topic is gone, and links to it are recorded as dangling.
    assert!(!rul.research().contains("STR_LASER_WEAPONS"));
    assert!(
        rul.dangling_refs()
            .iter()
            .any(|d| d.source == "STR_LASER_RIFLE" && d.target == "STR_LASER_WEAPONS")
    );
    assert!(rul.research().get("STR_ALIEN_ALLOYS").unwrap().leads_to.is_empty());
}

#[test]
fn delete_then_reinsert_starts_fresh() {
    let delete = document("a.rul", json!({"items": [{"delete": "STR_KNIFE"}]}));
    let reinsert = document("b.rul", json!({"items": [{"type": "STR_KNIFE", "battleType": 3, "power": 5}]}));
    let rul = parse(&[sample_base(), delete, reinsert]);
    let knife = rul.items().get("STR_KNIFE").unwrap();
    assert_eq!(knife.power, Some(5));
    assert!(knife.damage_type.is_none());
    assert_eq!(rul.items().keys().last(), Some("STR_KNIFE"));
}

// ===========================================================================
// Attacks
// ===========================================================================

#[test]
fn auto_shots_default_and_override() {
    let base = parse(&[sample_base()]);
    let auto = base
        .attacks("STR_RIFLE")
        .unwrap()
        .iter()
        .find(|a| a.mode == AttackMode::Auto)
        .unwrap();
    assert_eq!(auto.shots, 3);

    let patch = document("mod.rul", json!({"items": [{"type": "STR_RIFLE", "confAuto": {"shots": 5}}]}));
    let patched = parse(&[sample_base(), patch]);
    let auto = patched
        .attacks("STR_RIFLE")
        .unwrap()
        .iter()
        .find(|a| a.mode == AttackMode::Auto)
        .unwrap();
    assert_eq!(auto.shots, 5);
    assert!(!patched.items().get("STR_RIFLE").unwrap().extra.contains_key("confAuto"));
}

#[test]
fn melee_only_item_has_one_attack() {
    let rul = parse(&[sample_base()]);
    let attacks = rul.attacks("STR_KNIFE").unwrap();
    assert_eq!(attacks.len(), 1);
    assert_eq!(attacks[0].mode, AttackMode::Melee);
    assert_eq!(attacks[0].damage, Some(25));
}

#[test]
fn attacks_are_computed_once() {
    let rul = parse(&[sample_base()]);
    let first = rul.attacks("STR_RIFLE").unwrap().as_ptr();
    let second = rul.attacks("STR_RIFLE").unwrap().as_ptr();
    assert_eq!(first, second);
}

// ===========================================================================
// Catalog
// ===========================================================================

#[test]
fn article_shared_between_sections_is_built_once() {
    let rul = parse(&[sample_base()]);
    // STR_LASER_RIFLE is an item, a research topic and a manufacture project.
    let article = rul.article("STR_LASER_RIFLE").unwrap();
    assert_eq!(article.section.as_deref(), Some(ITEMS));
    assert_eq!(article.type_id, ITEMS);
    for section in [ITEMS, RESEARCH, "MANUFACTURE"] {
        let members = rul.section(section).unwrap().articles();
        assert_eq!(
            members.iter().filter(|a| *a == "STR_LASER_RIFLE").count(),
            1,
            "{section}"
        );
    }
}

#[test]
fn conditions_section_uses_generated_label() {
    let rul = parse(&[sample_base()]);
    let conditions = rul.section("CONDITIONS").unwrap();
    assert_eq!(conditions.articles(), &["CONDITIONS_NightRaid".to_string()]);
}

#[test]
fn reparse_builds_independent_snapshot() {
    let first = parse(&[sample_base()]);
    let second = Ruleset::parse(&[]).unwrap();
    assert!(second.items().is_empty());
    assert_eq!(first.items().len(), 6);
}
