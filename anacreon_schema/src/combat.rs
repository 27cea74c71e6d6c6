use serde::{Deserialize, Serialize};

use crate::events::News;
use crate::{Location, Validate, VariantError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BattleObjective {
    Invasion,
    SpaceSupremacy,
    ReinforceSiege,
}

/// A battle plan attached to a world or fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlePlanDetails {
    /// Absent only when reinforcing an existing siege.
    #[serde(rename = "enemySovereignIDs")]
    pub enemy_sovereign_ids: Option<Vec<i64>>,
    pub objective: BattleObjective,
    #[serde(rename = "sovereignID")]
    pub sovereign_id: i64,
    pub status: String,
}

impl Validate for BattlePlanDetails {
    fn validate(&self) -> Result<(), VariantError> {
        if self.enemy_sovereign_ids.is_none() && self.objective != BattleObjective::ReinforceSiege {
            return Err(VariantError::invalid(
                "enemySovereignIDs",
                "may only be absent when reinforcing a siege",
            ));
        }
        Ok(())
    }
}

/// Patch that replaces the battle plan of an existing world or fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattlePlanObject {
    pub id: i64,
    pub battle_plan: BattlePlanDetails,
}

impl Validate for BattlePlanObject {
    fn validate(&self) -> Result<(), VariantError> {
        self.battle_plan.validate()
    }
}

/// An ongoing attack on a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Siege {
    pub id: i64,
    #[serde(rename = "anchorObjID")]
    pub anchor_obj_id: i64,
    pub attack_forces: f64,
    pub defense_forces: f64,
    pub name: String,
    pub news: Option<Vec<News>>,
    pub pos: Location,
    pub resources: Option<Vec<f64>>,
    #[serde(rename = "sovereignID")]
    pub sovereign_id: i64,
    pub status: Option<String>,
    pub time_left: Option<i64>,
}

impl Validate for Siege {}
