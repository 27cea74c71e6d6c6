use serde::{Deserialize, Serialize};

use crate::combat::BattlePlanDetails;
use crate::events::News;
use crate::flat::flat_pairs;
use crate::world::NebulaType;
use crate::{Location, Validate, VariantError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    pub id: i64,
    /// Jumpship, starship/ramship or explorer.
    pub ftl_type: String,
    pub name: String,
    #[serde(rename = "sovereignID")]
    pub sovereign_id: i64,
    pub resources: Vec<i64>,
    pub news: Option<Vec<News>>,
    /// World the fleet is stationed at, if any.
    #[serde(rename = "anchorObjID")]
    pub anchor_obj_id: Option<i64>,
    pub battle_plan: Option<BattlePlanDetails>,
    pub pos: Location,
    #[serde(rename = "dest")]
    pub destination: Option<Location>,
    #[serde(rename = "destID")]
    pub dest_id: Option<i64>,
    /// Watch on which the fleet arrives. Absent once it has arrived.
    pub eta: Option<i64>,
    #[serde(default)]
    pub region: NebulaType,
}

impl Fleet {
    pub fn has_arrived(&self) -> bool {
        self.eta.is_none()
    }

    pub fn resource_map(&self) -> std::collections::BTreeMap<i64, i64> {
        flat_pairs(&self.resources).collect()
    }
}

impl Validate for Fleet {
    fn validate(&self) -> Result<(), VariantError> {
        if self.resources.len() % 2 != 0 {
            return Err(VariantError::invalid("resources", "odd length"));
        }
        match &self.battle_plan {
            Some(plan) => plan.validate(),
            None => Ok(()),
        }
    }
}
