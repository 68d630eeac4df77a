use serde::Deserialize;

use crate::entity::{EntityKind, decode};
use crate::link;
use crate::record::Record;
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// Base stats of a unit. Stats a ruleset adds beyond these are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    pub tu: Option<i64>,
    pub stamina: Option<i64>,
    pub health: Option<i64>,
    pub bravery: Option<i64>,
    pub reactions: Option<i64>,
    pub firing: Option<i64>,
    pub throwing: Option<i64>,
    pub strength: Option<i64>,
    pub psi_strength: Option<i64>,
    pub psi_skill: Option<i64>,
    pub melee: Option<i64>,
    #[serde(flatten)]
    pub extra: Record,
}

/// A soldier, alien or other battlescape unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub stats: Option<UnitStats>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for Unit {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(unit) = decode::<Unit>(EntityKind::Unit, record) else {
        return;
    };
    if let Some(armor) = &unit.armor {
        link::unit_armor(rul, &unit.id, armor);
    }
    rul.units.insert(unit);
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{parse, sample_base};

    #[test]
    fn stats_decoded() {
        let rul = parse(&[sample_base()]);
        let soldier = rul.units().get("STR_SOLDIER").unwrap();
        let stats = soldier.stats.as_ref().unwrap();
        assert_eq!(stats.tu, Some(60));
        assert_eq!(stats.firing, Some(70));
        assert_eq!(stats.psi_skill, None);
    }

    #[test]
    fn units_back_link_into_armor() {
        let rul = parse(&[sample_base()]);
        assert_eq!(
            rul.armors().get("STR_PERSONAL_ARMOR_UC").unwrap().users,
            vec!["STR_SOLDIER"]
        );
        assert_eq!(
            rul.armors().get("STR_SECTOID_ARMOR").unwrap().users,
            vec!["STR_SECTOID_SOLDIER"]
        );
    }
}
