use serde::Deserialize;

use crate::entity::{EntityKind, decode};
use crate::link;
use crate::record::Record;
use crate::registry::Keyed;
use crate::ruleset::Ruleset;

/// An alien mission deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlienDeployment {
    #[serde(rename = "type")]
    pub id: String,
    #[serde(default)]
    pub starting_condition: Option<String>,
    #[serde(flatten)]
    pub extra: Record,
}

impl Keyed for AlienDeployment {
    fn key(&self) -> &str {
        &self.id
    }
}

pub(crate) fn construct(record: Record, rul: &mut Ruleset) {
    let Some(deployment) = decode::<AlienDeployment>(EntityKind::AlienDeployment, record) else {
        return;
    };
    if let Some(condition) = &deployment.starting_condition {
        link::deployment_condition(rul, &deployment.id, condition);
    }
    rul.alien_deployments.insert(deployment);
}

#[cfg(test)]
mod tests {
    use crate::link::Relation;
    use crate::test_utils::{document, parse, sample_base};
    use serde_json::json;

    #[test]
    fn deployment_back_links_into_condition() {
        let rul = parse(&[sample_base()]);
        assert_eq!(
            rul.starting_conditions()
                .get("CONDITIONS_NightRaid")
                .unwrap()
                .deployments,
            vec!["STR_UFO_CRASH_RECOVERY"]
        );
    }

    #[test]
    fn unknown_condition_is_recorded() {
        let doc = document(
            "d.rul",
            json!({"alienDeployments": [{"type": "STR_RAID", "startingCondition": "CONDITIONS_Missing"}]}),
        );
        let rul = parse(&[doc]);
        assert!(rul.alien_deployments().contains("STR_RAID"));
        assert!(rul.dangling_refs().iter().any(|d| d.relation == Relation::DeploymentCondition
            && d.source == "STR_RAID"
            && d.target == "CONDITIONS_Missing"));
    }
}
