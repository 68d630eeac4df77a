//! Cross-Reference Linker.
//!
//! Entities refer to each other only by identifier. For every forward
//! reference the linker records a denormalized back-reference on the
//! target. Relations whose target kind is built before the source kind are
//! wired from the source's constructor; the rest are wired by [`link`],
//! which runs exactly once after every kind exists.
//!
//! A reference to an identifier that is not registered is skipped. The
//! miss is logged and kept as a [`DanglingRef`] so callers can surface
//! malformed rulesets; the load itself still succeeds.

use tracing::debug;

use crate::entity::Manufacture;
use crate::registry::push_unique;
use crate::ruleset::Ruleset;

/// The kind of a cross-reference, named after its source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `Item.compatibleAmmo`
    CompatibleAmmo,
    /// `Research.dependencies`
    Dependency,
    /// `Research.getOneFree`
    GetOneFree,
    /// `Research.lookup`
    Lookup,
    /// `Research.spawnedItem`
    SpawnedItem,
    /// `Manufacture.requires`
    ManufactureRequires,
    /// `Manufacture.producedItems`
    ProducedItem,
    /// `Manufacture.requiredItems`
    RequiredItem,
    /// `Unit.armor`
    UnitArmor,
    /// `Armor.storeItem`
    StoreItem,
    /// `AlienDeployment.startingCondition`
    DeploymentCondition,
    /// `StartingConditions.allowedCraft`
    AllowedCraft,
}

impl Relation {
    /// The source field holding the reference.
    pub fn field(self) -> &'static str {
        match self {
            Relation::CompatibleAmmo => "compatibleAmmo",
            Relation::Dependency => "dependencies",
            Relation::GetOneFree => "getOneFree",
            Relation::Lookup => "lookup",
            Relation::SpawnedItem => "spawnedItem",
            Relation::ManufactureRequires => "requires",
            Relation::ProducedItem => "producedItems",
            Relation::RequiredItem => "requiredItems",
            Relation::UnitArmor => "armor",
            Relation::StoreItem => "storeItem",
            Relation::DeploymentCondition => "startingCondition",
            Relation::AllowedCraft => "allowedCraft",
        }
    }
}

/// A reference whose target is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub relation: Relation,
    /// Identifier of the referring entity.
    pub source: String,
    /// The identifier that did not resolve.
    pub target: String,
}

fn dangling(rul: &mut Ruleset, relation: Relation, source: &str, target: &str) {
    debug!(field = relation.field(), source, target, "dangling reference skipped");
    rul.dangling.push(DanglingRef {
        relation,
        source: source.to_string(),
        target: target.to_string(),
    });
}

// ===========================================================================
// Wired from constructors
// ===========================================================================

pub(crate) fn unit_armor(rul: &mut Ruleset, unit: &str, armor: &str) {
    match rul.armors.get_mut(armor) {
        Some(target) => push_unique(&mut target.users, unit),
        None => dangling(rul, Relation::UnitArmor, unit, armor),
    }
}

pub(crate) fn armor_store_item(rul: &mut Ruleset, armor: &str, item: &str) {
    match rul.items.get_mut(item) {
        Some(target) => push_unique(&mut target.armors, armor),
        None => dangling(rul, Relation::StoreItem, armor, item),
    }
}

pub(crate) fn condition_craft(rul: &mut Ruleset, condition: &str, craft: &str) {
    match rul.crafts.get_mut(craft) {
        Some(target) => push_unique(&mut target.starting_conditions, condition),
        None => dangling(rul, Relation::AllowedCraft, condition, craft),
    }
}

pub(crate) fn deployment_condition(rul: &mut Ruleset, deployment: &str, condition: &str) {
    match rul.starting_conditions.get_mut(condition) {
        Some(target) => push_unique(&mut target.deployments, deployment),
        None => dangling(rul, Relation::DeploymentCondition, deployment, condition),
    }
}

/// Research requirements, produced items and consumed items of a project.
pub(crate) fn manufacture(rul: &mut Ruleset, project: &Manufacture) {
    let name = project.id.as_str();
    for research in &project.requires {
        match rul.research.get_mut(research) {
            Some(target) => push_unique(&mut target.manufacture, name),
            None => dangling(rul, Relation::ManufactureRequires, name, research),
        }
    }
    for (item, &quantity) in &project.produced_items {
        match rul.items.get_mut(item) {
            Some(target) => {
                target.manufacture.insert(name.to_string(), quantity);
            }
            None => dangling(rul, Relation::ProducedItem, name, item),
        }
    }
    for (item, &quantity) in &project.required_items {
        match rul.items.get_mut(item) {
            Some(target) => {
                target.component_of.insert(name.to_string(), quantity);
            }
            None => dangling(rul, Relation::RequiredItem, name, item),
        }
    }
}

// ===========================================================================
// Post-construction pass
// ===========================================================================

/// Install the back-references that need every kind to exist. Must run
/// once per load; running it twice would not duplicate entries, but would
/// record every dangling reference twice.
pub(crate) fn link(rul: &mut Ruleset) {
    link_ammo(rul);
    link_research(rul);
}

fn link_ammo(rul: &mut Ruleset) {
    let pairs: Vec<(String, String)> = rul
        .items
        .iter()
        .flat_map(|weapon| {
            weapon
                .compatible_ammo
                .iter()
                .flatten()
                .map(move |ammo| (weapon.id.clone(), ammo.clone()))
        })
        .collect();

    for (weapon, ammo) in pairs {
        match rul.items.get_mut(&ammo) {
            Some(target) => push_unique(&mut target.compatible_weapons, &weapon),
            None => dangling(rul, Relation::CompatibleAmmo, &weapon, &ammo),
        }
    }
}

struct ResearchRefs {
    name: String,
    dependencies: Vec<String>,
    get_one_free: Vec<String>,
    lookup: Option<String>,
    spawned_item: Option<String>,
}

fn link_research(rul: &mut Ruleset) {
    let refs: Vec<ResearchRefs> = rul
        .research
        .iter()
        .map(|r| ResearchRefs {
            name: r.id.clone(),
            dependencies: r.dependencies.clone(),
            get_one_free: r.get_one_free.clone(),
            lookup: r.lookup.clone(),
            spawned_item: r.spawned_item.clone(),
        })
        .collect();

    for r in refs {
        let name = r.name.as_str();
        for dependency in &r.dependencies {
            match rul.research.get_mut(dependency) {
                Some(target) => push_unique(&mut target.leads_to, name),
                None => dangling(rul, Relation::Dependency, name, dependency),
            }
        }
        for free in &r.get_one_free {
            match rul.research.get_mut(free) {
                Some(target) => push_unique(&mut target.free_from, name),
                None => dangling(rul, Relation::GetOneFree, name, free),
            }
        }
        if let Some(lookup) = &r.lookup
            && !rul.catalog.add_lookup(lookup, name)
        {
            dangling(rul, Relation::Lookup, name, lookup);
        }
        if let Some(item) = &r.spawned_item {
            match rul.items.get_mut(item) {
                Some(target) => push_unique(&mut target.spawned_by, name),
                None => dangling(rul, Relation::SpawnedItem, name, item),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{document, parse, sample_base};
    use serde_json::json;

    #[test]
    fn ammo_lists_its_weapons() {
        let rul = parse(&[sample_base()]);
        let clip = rul.items().get("STR_RIFLE_CLIP").unwrap();
        assert_eq!(clip.compatible_weapons, vec!["STR_RIFLE"]);
        assert!(rul.items().get("STR_KNIFE").unwrap().compatible_weapons.is_empty());
    }

    #[test]
    fn shared_ammo_lists_every_weapon_once() {
        let doc = document(
            "a.rul",
            json!({"items": [
                {"type": "PISTOL", "compatibleAmmo": ["CLIP", "CLIP"]},
                {"type": "RIFLE", "compatibleAmmo": ["CLIP"]},
                {"type": "CLIP", "battleType": 2}
            ]}),
        );
        let rul = parse(&[doc]);
        assert_eq!(
            rul.items().get("CLIP").unwrap().compatible_weapons,
            vec!["PISTOL", "RIFLE"]
        );
    }

    #[test]
    fn sample_has_no_dangling_references() {
        let rul = parse(&[sample_base()]);
        assert!(rul.dangling_refs().is_empty(), "{:?}", rul.dangling_refs());
    }

    #[test]
    fn dangling_references_are_skipped_and_recorded() {
        let doc = document(
            "d.rul",
            json!({
                "items": [{"type": "GUN", "compatibleAmmo": ["NO_CLIP"]}],
                "units": [{"type": "UNIT", "armor": "NO_ARMOR"}],
                "research": [{
                    "name": "TOPIC",
                    "dependencies": ["NO_TOPIC"],
                    "getOneFree": ["NO_FREE"],
                    "lookup": "NO_ARTICLE",
                    "spawnedItem": "NO_ITEM"
                }],
                "manufacture": [{
                    "name": "PROJECT",
                    "requires": ["NO_RESEARCH"],
                    "producedItems": {"NO_PRODUCT": 1},
                    "requiredItems": {"GUN": 1}
                }]
            }),
        );
        let rul = parse(&[doc]);
        let relations: Vec<Relation> = rul.dangling_refs().iter().map(|d| d.relation).collect();
        for expected in [
            Relation::CompatibleAmmo,
            Relation::UnitArmor,
            Relation::Dependency,
            Relation::GetOneFree,
            Relation::Lookup,
            Relation::SpawnedItem,
            Relation::ManufactureRequires,
            Relation::ProducedItem,
        ] {
            assert!(relations.contains(&expected), "missing {expected:?}");
        }
        assert!(!relations.contains(&Relation::RequiredItem));
        // The resolvable reference on the same project still links.
        assert_eq!(
            rul.items().get("GUN").unwrap().component_of.get("PROJECT"),
            Some(&1)
        );
    }

    #[test]
    fn relation_field_names() {
        assert_eq!(Relation::GetOneFree.field(), "getOneFree");
        assert_eq!(Relation::StoreItem.field(), "storeItem");
    }
}
