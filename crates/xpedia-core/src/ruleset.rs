//! The parsed ruleset: one read-only snapshot per load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::attack::Attack;
use crate::catalog::{Article, ArticleSpec, CONDITIONS, Catalog, Section, SectionKind, TYPE_SECTIONS};
use crate::dedup::{DEDUPLICATED_SECTIONS, deduplicate};
use crate::entity::item::{battle_type_name, damage_type_key};
use crate::entity::{
    AlienDeployment, Armor, Craft, CraftWeapon, EntityKind, Facility, Item, Manufacture, Research,
    StartingConditions, Ufo, Unit,
};
use crate::error::{RulesetError, shape_name};
use crate::lang::Localization;
use crate::link::{self, DanglingRef};
use crate::merge::merge_documents;
use crate::record::{Document, Record, key_value};
use crate::registry::Registry;
use crate::sprite::{NumberedFiles, Sprite, SpriteSheets, numbered_files};

/// Placeholder in [`ParseOptions::mod_root`] replaced by the mod name.
pub const MOD_NAME_PLACEHOLDER: &str = "{modName}";

// ===========================================================================
// Options
// ===========================================================================

/// Knobs for building asset paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Root every asset path is resolved under. `{modName}` expands to the
    /// ruleset's `modName`.
    pub mod_root: String,
    /// Path returned for a sprite-sheet index that has no file.
    pub placeholder_sprite: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mod_root: "user/mods/{modName}/".to_string(),
            placeholder_sprite: "xpedia/0.png".to_string(),
        }
    }
}

/// What the external search index receives for one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRecord {
    pub id: String,
    pub type_id: String,
    pub title: String,
    pub text: Option<String>,
}

// ===========================================================================
// Ruleset
// ===========================================================================

/// Every entity, article and section of one load.
///
/// Built once by [`Ruleset::parse`] and never changed afterwards; a new
/// load builds a new `Ruleset`.
#[derive(Debug, Default)]
pub struct Ruleset {
    pub(crate) options: ParseOptions,
    pub(crate) mod_name: Option<String>,
    pub(crate) asset_root: String,
    pub(crate) sections: Map<String, Value>,
    pub(crate) lang: Localization,
    pub(crate) catalog: Catalog,
    pub(crate) sprites: BTreeMap<String, Sprite>,
    pub(crate) sheets: SpriteSheets,

    pub(crate) items: Registry<Item>,
    pub(crate) armors: Registry<Armor>,
    pub(crate) units: Registry<Unit>,
    pub(crate) crafts: Registry<Craft>,
    pub(crate) craft_weapons: Registry<CraftWeapon>,
    pub(crate) ufos: Registry<Ufo>,
    pub(crate) facilities: Registry<Facility>,
    pub(crate) starting_conditions: Registry<StartingConditions>,
    pub(crate) alien_deployments: Registry<AlienDeployment>,
    pub(crate) research: Registry<Research>,
    pub(crate) manufacture: Registry<Manufacture>,

    pub(crate) dangling: Vec<DanglingRef>,
}

impl Ruleset {
    /// Parse with default options.
    pub fn parse(documents: &[Document]) -> Result<Ruleset, RulesetError> {
        Self::parse_with(documents, &ParseOptions::default())
    }

    /// Merge, deduplicate, construct, link and sort.
    ///
    /// Fails only when an entity section has the wrong shape; every other
    /// irregularity is logged and skipped.
    pub fn parse_with(documents: &[Document], options: &ParseOptions) -> Result<Ruleset, RulesetError> {
        let mut rul = Ruleset {
            options: options.clone(),
            ..Ruleset::default()
        };
        rul.sections = merge_documents(documents, &mut rul.lang);

        for id in TYPE_SECTIONS {
            rul.catalog.create_section(id, SectionKind::Type, &rul.lang);
        }

        for name in DEDUPLICATED_SECTIONS {
            let resolved = deduplicate(rul.records(name)?);
            if rul.sections.contains_key(name) {
                rul.sections.insert(
                    name.to_string(),
                    Value::Array(resolved.into_iter().map(Value::Object).collect()),
                );
            }
        }

        rul.mod_name = rul
            .sections
            .get("modName")
            .and_then(Value::as_str)
            .map(str::to_string);
        rul.asset_root = rul
            .options
            .mod_root
            .replace(MOD_NAME_PLACEHOLDER, rul.mod_name.as_deref().unwrap_or_default());

        rul.load_pedia()?;
        rul.load_sprites()?;

        // Check every entity section before constructing anything.
        let mut pending = Vec::with_capacity(EntityKind::CONSTRUCTION_ORDER.len());
        for kind in EntityKind::CONSTRUCTION_ORDER {
            pending.push((kind, rul.records(kind.section())?));
        }
        for (kind, records) in pending {
            for record in records {
                kind.construct(record, &mut rul);
            }
        }

        link::link(&mut rul);
        rul.catalog.sort_type_sections();

        info!(
            mod_name = rul.mod_name.as_deref().unwrap_or_default(),
            documents = documents.len(),
            items = rul.items.len(),
            armors = rul.armors.len(),
            units = rul.units.len(),
            research = rul.research.len(),
            manufacture = rul.manufacture.len(),
            articles = rul.catalog.article_count(),
            dangling = rul.dangling.len(),
            "ruleset parsed"
        );
        Ok(rul)
    }

    /// The records of a list section. A missing or null section is empty;
    /// entries that are not mappings are skipped.
    fn records(&self, section: &str) -> Result<Vec<Record>, RulesetError> {
        let list = match self.sections.get(section) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(list)) => list,
            Some(other) => {
                return Err(RulesetError::SectionShape {
                    section: section.to_string(),
                    expected: "a sequence",
                    found: shape_name(other),
                });
            }
        };
        Ok(list
            .iter()
            .filter_map(|entry| match entry {
                Value::Object(record) => Some(record.clone()),
                other => {
                    warn!(section, found = shape_name(other), "non-mapping entry skipped");
                    None
                }
            })
            .collect())
    }

    /// `ufopaedia` entries with an id become articles, in document order.
    fn load_pedia(&mut self) -> Result<(), RulesetError> {
        for mut record in self.records("ufopaedia")? {
            let Some(id) = key_value(&record, "id") else {
                continue;
            };
            record.insert("id".to_string(), Value::String(id.clone()));
            let spec: ArticleSpec = match serde_json::from_value(Value::Object(record)) {
                Ok(spec) => spec,
                Err(error) => {
                    warn!(%id, %error, "ufopaedia entry could not be decoded; skipped");
                    continue;
                }
            };
            self.catalog.create_article(spec, &self.lang);
            self.catalog.push_order(&id);
        }
        Ok(())
    }

    fn load_sprites(&mut self) -> Result<(), RulesetError> {
        for record in self.records("extraSprites")? {
            if let Some(sprite) = Sprite::from_record(&record) {
                self.sprites.insert(sprite.id.clone(), sprite);
            }
        }
        self.sheets = SpriteSheets::from_sprites(&self.sprites);
        if let Some(files) = self
            .records("extraSounds")?
            .first()
            .and_then(|sounds| sounds.get("files"))
        {
            self.sheets.sounds = numbered_files(files);
        }
        Ok(())
    }

    // -- Entities --

    pub fn items(&self) -> &Registry<Item> {
        &self.items
    }

    pub fn armors(&self) -> &Registry<Armor> {
        &self.armors
    }

    pub fn units(&self) -> &Registry<Unit> {
        &self.units
    }

    pub fn crafts(&self) -> &Registry<Craft> {
        &self.crafts
    }

    pub fn craft_weapons(&self) -> &Registry<CraftWeapon> {
        &self.craft_weapons
    }

    pub fn ufos(&self) -> &Registry<Ufo> {
        &self.ufos
    }

    pub fn facilities(&self) -> &Registry<Facility> {
        &self.facilities
    }

    pub fn starting_conditions(&self) -> &Registry<StartingConditions> {
        &self.starting_conditions
    }

    pub fn alien_deployments(&self) -> &Registry<AlienDeployment> {
        &self.alien_deployments
    }

    pub fn research(&self) -> &Registry<Research> {
        &self.research
    }

    pub fn manufacture(&self) -> &Registry<Manufacture> {
        &self.manufacture
    }

    /// Attack modes of an item, derived on first request.
    pub fn attacks(&self, item: &str) -> Option<&[Attack]> {
        self.items.get(item).map(|i| i.attacks(&self.lang))
    }

    /// Armors meant for the player: those naming the units that wear them.
    pub fn player_armors(&self) -> impl Iterator<Item = &Armor> {
        self.armors.iter().filter(|a| !a.units.is_empty())
    }

    /// References that did not resolve during this load.
    pub fn dangling_refs(&self) -> &[DanglingRef] {
        &self.dangling
    }

    // -- Text --

    pub fn lang(&self) -> &Localization {
        &self.lang
    }

    /// Display text for a language key, or the key itself.
    pub fn str<'a>(&'a self, key: &'a str) -> &'a str {
        self.lang.str(key)
    }

    /// Translated damage type name.
    pub fn damage_type_name(&self, damage_type: i64) -> Option<&str> {
        damage_type_key(damage_type).and_then(|key| self.lang.get(key))
    }

    pub fn battle_type_name(&self, battle_type: i64) -> Option<&'static str> {
        battle_type_name(battle_type)
    }

    pub fn mod_name(&self) -> Option<&str> {
        self.mod_name.as_deref()
    }

    /// A merged section as it was before typed construction. Entity
    /// sections are already deduplicated.
    pub fn raw_section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    // -- Assets --

    pub fn sprites(&self) -> &BTreeMap<String, Sprite> {
        &self.sprites
    }

    pub fn sheets(&self) -> &SpriteSheets {
        &self.sheets
    }

    /// Root all asset paths are resolved under.
    pub fn asset_root(&self) -> &str {
        &self.asset_root
    }

    pub(crate) fn asset_path(&self, path: &str) -> String {
        format!("{}{path}", self.asset_root)
    }

    /// Path of a registered sprite, or of the identifier itself as a file
    /// name when no such sprite exists.
    pub fn sprite(&self, id: &str) -> String {
        match self.sprites.get(id).and_then(|s| s.path.as_deref()) {
            Some(path) => self.asset_path(path),
            None => self.asset_path(id),
        }
    }

    /// Path of entry `index` of a numbered sprite sheet, or the placeholder.
    pub fn special_sprite(&self, sheet: &str, index: i64) -> String {
        match self.sheets.sheet(sheet).and_then(|files| files.get(&index)) {
            Some(path) => self.asset_path(path),
            None => self.options.placeholder_sprite.clone(),
        }
    }

    pub fn sound(&self, index: i64) -> Option<String> {
        self.sheets.sounds.get(&index).map(|path| self.asset_path(path))
    }

    pub fn sounds(&self) -> &NumberedFiles {
        &self.sheets.sounds
    }

    // -- Catalog --

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.catalog.article(id)
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.catalog.section(id)
    }

    pub fn find_next_article(&self, current: &str, delta: isize) -> Option<&Article> {
        self.catalog.find_next_article(current, delta)
    }

    /// Browser link targets listed under a TYPE section. Only the
    /// starting-conditions browser has any: one `CONDITIONS_<type>` link per
    /// condition, in registry order.
    pub fn links_by_type(&self, type_id: &str) -> Vec<String> {
        match type_id {
            CONDITIONS => self
                .starting_conditions
                .keys()
                .map(|id| format!("{CONDITIONS}_{id}"))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Pedia articles in document order, as handed to the search index.
    pub fn search_records(&self) -> Vec<SearchRecord> {
        self.catalog
            .articles_order()
            .iter()
            .filter_map(|id| self.catalog.article(id))
            .map(|article| SearchRecord {
                id: article.id.clone(),
                type_id: article.type_id.clone(),
                title: article.title.clone(),
                text: article.text.clone(),
            })
            .collect()
    }
}
