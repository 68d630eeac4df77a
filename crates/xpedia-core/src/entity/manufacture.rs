use std::collections::BTreeMap;

use serde::Deserialize;

use crate::catalog::{ArticleSpec, MANUFACTURE};
use crate::entity::{EntityKind, decode};
use crate::link;
use crate::record::{Record, or_default};
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// Item id to quantity.
pub type Quantities = BTreeMap<String, i64>;

/// A manufacture project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacture {
    #[serde(rename = "name")]
    pub id: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Research needed before the project is available.
    #[serde(default, deserialize_with = "or_default")]
    pub requires: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub required_items: Quantities,
    #[serde(default, deserialize_with = "or_default")]
    pub produced_items: Quantities,
    /// Weighted alternatives: `[chance, {item: quantity}]`.
    #[serde(default, deserialize_with = "or_default")]
    pub random_produced_items: Vec<(i64, Quantities)>,

    /// Total weight of `random_produced_items`.
    #[serde(skip)]
    pub chance_sum: i64,

    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for Manufacture {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(mut manufacture) = decode::<Manufacture>(EntityKind::Manufacture, record) else {
        return;
    };
    manufacture.chance_sum = manufacture
        .random_produced_items
        .iter()
        .map(|(chance, _)| chance)
        .sum();

    link::manufacture(rul, &manufacture);
    rul.catalog.create_article(
        ArticleSpec::new(&manufacture.id)
            .section(MANUFACTURE)
            .type_id(MANUFACTURE),
        &rul.lang,
    );
    rul.manufacture.insert(manufacture);
}
