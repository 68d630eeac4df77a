use serde::Deserialize;

use crate::catalog::{ArticleSpec, RESEARCH};
use crate::entity::{EntityKind, decode};
use crate::record::{Record, or_default};
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// A research project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Research {
    #[serde(rename = "name")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub unlocks: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub get_one_free: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub requires: Vec<String>,
    /// Article to show instead of this project's own.
    #[serde(default)]
    pub lookup: Option<String>,
    #[serde(default)]
    pub spawned_item: Option<String>,

    /// Projects listing this one among their dependencies.
    #[serde(skip)]
    pub leads_to: Vec<String>,
    /// Projects that may grant this one for free.
    #[serde(skip)]
    pub free_from: Vec<String>,
    /// Manufacture projects requiring this one.
    #[serde(skip)]
    pub manufacture: Vec<String>,

    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for Research {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(research) = decode::<Research>(EntityKind::Research, record) else {
        return;
    };
    rul.catalog.create_article(
        ArticleSpec::new(&research.id).section(RESEARCH).type_id(RESEARCH),
        &rul.lang,
    );
    rul.research.insert(research);
}
