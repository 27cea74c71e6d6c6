//! Sovereigns (empires).
//!
//! The three record types widen one another: every [`ReigningSovereign`] is a
//! [`Sovereign`] with a capital and statistics, and the player's own
//! [`OwnSovereign`] adds funds and administration range on top. Each embeds
//! the narrower record, and [`SovereignObject`] offers the narrowing accessors.

use serde::{Deserialize, Serialize};

use crate::{check_tech_level, Validate, VariantError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SovereignActions {
    pub attacks_initiated: i64,
    pub offensives_initiated: i64,
    pub worlds_conquered: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SovereignRelationship {
    pub first_contact: i64,
    pub our_actions: SovereignActions,
    pub their_actions: SovereignActions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationGrid {
    pub radius: f64,
    pub explored_outline: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SovereignStats {
    pub fleets: i64,
    pub population: i64,
    pub resources: Option<Vec<i64>>,
    pub tech_level: i64,
    pub worlds: i64,
}

/// Trade terms of the Mesophon traders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MesophonTrait {
    /// `[resId, price, ...]` the Mesophons pay per unit.
    pub buy_prices: Vec<f64>,
    /// `[resId, price, ...]` the Mesophons charge per unit.
    pub sell_prices: Vec<f64>,
    #[serde(rename = "traitID")]
    pub trait_id: i64,
}

/// Any sovereign that has played in the game, including abdicated ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sovereign {
    pub id: i64,
    /// Strength relative to the player.
    pub imperial_might: i64,
    pub name: String,
    pub relationship: Option<SovereignRelationship>,
    pub doctrine: Option<i64>,
    pub traits: Option<Vec<MesophonTrait>>,
}

impl Validate for Sovereign {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReigningSovereign {
    #[serde(flatten)]
    pub sovereign: Sovereign,
    #[serde(rename = "capitalID")]
    pub capital_id: i64,
    pub stats: SovereignStats,
    /// Only known once the capital has been found.
    pub founded_on: Option<i64>,
    pub territory: Option<Vec<Vec<f64>>>,
}

impl Validate for ReigningSovereign {
    fn validate(&self) -> Result<(), VariantError> {
        check_tech_level("stats.techLevel", self.stats.tech_level)
    }
}

/// The logged-in player's sovereign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnSovereign {
    #[serde(flatten)]
    pub reigning: ReigningSovereign,
    pub admin_range: Vec<Vec<f64>>,
    pub exploration_grid: ExplorationGrid,
    /// `[currencyId, amount]`
    pub funds: Vec<f64>,
    pub secession_chance: f64,
}

impl Validate for OwnSovereign {
    fn validate(&self) -> Result<(), VariantError> {
        self.reigning.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SovereignObject {
    Sovereign(Sovereign),
    Reigning(ReigningSovereign),
    Own(OwnSovereign),
}

impl SovereignObject {
    pub fn id(&self) -> i64 {
        self.base().id
    }

    pub fn base(&self) -> &Sovereign {
        match self {
            SovereignObject::Sovereign(sovereign) => sovereign,
            SovereignObject::Reigning(reigning) => &reigning.sovereign,
            SovereignObject::Own(own) => &own.reigning.sovereign,
        }
    }

    pub fn base_mut(&mut self) -> &mut Sovereign {
        match self {
            SovereignObject::Sovereign(sovereign) => sovereign,
            SovereignObject::Reigning(reigning) => &mut reigning.sovereign,
            SovereignObject::Own(own) => &mut own.reigning.sovereign,
        }
    }

    pub fn as_reigning(&self) -> Option<&ReigningSovereign> {
        match self {
            SovereignObject::Sovereign(_) => None,
            SovereignObject::Reigning(reigning) => Some(reigning),
            SovereignObject::Own(own) => Some(&own.reigning),
        }
    }

    pub fn as_own(&self) -> Option<&OwnSovereign> {
        match self {
            SovereignObject::Own(own) => Some(own),
            _ => None,
        }
    }
}
