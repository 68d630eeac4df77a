use convert_case::{Case, Casing};
use serde::Deserialize;

use crate::catalog::{ArticleSpec, CONDITIONS};
use crate::entity::{EntityKind, decode};
use crate::link;
use crate::record::{Record, or_default};
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// Length of the `CONDITIONS_` prefix starting-condition identifiers carry.
const LABEL_PREFIX_LEN: usize = 11;

/// Battlescape starting conditions: environment plus what the player may
/// bring.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingConditions {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub allowed_craft: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub allowed_armors: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub allowed_vehicles: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub allowed_item_categories: Vec<String>,

    /// Alien deployments using these conditions.
    #[serde(skip)]
    pub deployments: Vec<String>,

    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for StartingConditions {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Human label for a starting-condition identifier:
/// `CONDITIONS_NightRaid` becomes `Night raid`.
pub fn label(id: &str) -> String {
    let rest: String = id.chars().skip(LABEL_PREFIX_LEN).collect();
    rest.to_case(Case::Sentence)
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(conditions) = decode::<StartingConditions>(EntityKind::StartingConditions, record)
    else {
        return;
    };
    let label = label(&conditions.id);
    if !label.is_empty() {
        rul.lang.insert_if_absent(&conditions.id, label);
    }

    for craft in &conditions.allowed_craft {
        link::condition_craft(rul, &conditions.id, craft);
    }
    rul.catalog.create_article(
        ArticleSpec::new(&conditions.id)
            .section(CONDITIONS)
            .type_id(CONDITIONS),
        &rul.lang,
    );
    rul.starting_conditions.insert(conditions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{document, parse, sample_base};
    use serde_json::json;

    #[test]
    fn label_from_identifier() {
        assert_eq!(label("CONDITIONS_NightRaid"), "Night raid");
        assert_eq!(label("SHORT"), "");
    }

    #[test]
    fn label_becomes_article_title() {
        let rul = parse(&[sample_base()]);
        assert_eq!(rul.str("CONDITIONS_NightRaid"), "Night raid");
        assert_eq!(
            rul.catalog().article("CONDITIONS_NightRaid").unwrap().title,
            "Night raid"
        );
    }

    #[test]
    fn translated_title_is_kept() {
        let doc = document(
            "c.rul",
            json!({
                "lang": {"CONDITIONS_Arctic": "Frozen wastes"},
                "startingConditions": [{"type": "CONDITIONS_Arctic"}]
            }),
        );
        let rul = parse(&[doc]);
        assert_eq!(rul.str("CONDITIONS_Arctic"), "Frozen wastes");
    }

    #[test]
    fn allowed_craft_back_reference() {
        let rul = parse(&[sample_base()]);
        assert_eq!(
            rul.crafts().get("STR_SKYRANGER").unwrap().starting_conditions,
            vec!["CONDITIONS_NightRaid"]
        );
        assert!(rul.crafts().get("STR_INTERCEPTOR").unwrap().starting_conditions.is_empty());
    }
}
