//! Worlds and the structures built on them.
//!
//! [`World`] is any world the player can see. [`OwnedWorld`] is a world the
//! server sent with owner-only fields (base consumption, revolution index,
//! trade route cap); it embeds the plain [`World`] rather than repeating it.
//!
//! Derived views (`resource_map`, `trait_map`, `trade_partners`) are computed
//! on every call and borrow the world, so they cannot outlive a replacement
//! of the object in the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::combat::BattlePlanDetails;
use crate::events::News;
use crate::flat::flat_pairs;
use crate::scenario::{Ruleset, RulesetError};
use crate::{check_tech_level, Location, Validate, VariantError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevIndex {
    Happy,
    Content,
    Dissatisfied,
    Aggrieved,
    Rioting,
    Rebelling,
    #[serde(rename = "civil war")]
    CivilWar,
}

/// Kind of space a world sits in. Sent as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum NebulaType {
    #[default]
    ClearSpace = 1,
    LightNebula = 2,
    DarkNebula = 3,
    RiftZone = 4,
}

impl TryFrom<i64> for NebulaType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NebulaType::ClearSpace),
            2 => Ok(NebulaType::LightNebula),
            3 => Ok(NebulaType::DarkNebula),
            4 => Ok(NebulaType::RiftZone),
            other => Err(format!("unknown region type {other}")),
        }
    }
}

impl From<NebulaType> for i64 {
    fn from(value: NebulaType) -> Self {
        value as i64
    }
}

/// A structure, industry or improvement on a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trait {
    pub allocation: f64,
    /// `[resId, pctAlloc, cannotBuild, ...]` for industries.
    pub build_data: Vec<Value>,
    /// Set on the industry that belongs to the world's designation.
    pub is_primary: Option<bool>,
    /// `[resId, optimal, actual, ...]`; positive optimal means produced.
    pub production_data: Option<Vec<Option<f64>>>,
    pub is_fixed: Option<bool>,
    pub target_allocation: f64,
    #[serde(rename = "traitID")]
    pub trait_id: i64,
    /// Watch on which construction completes. Absent once built.
    pub build_complete: Option<i64>,
    pub work_units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rebellion {
    /// Positive values are rebel support, negative values imperial support.
    pub popular_support: f64,
    pub rebel_forces: f64,
    pub rebellion_start: i64,
    #[serde(rename = "traitID")]
    pub trait_id: i64,
}

/// One entry of a world's trait list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorldTrait {
    Id(i64),
    Structure(Trait),
    Rebellion(Rebellion),
}

impl WorldTrait {
    pub fn trait_id(&self) -> i64 {
        match self {
            WorldTrait::Id(id) => *id,
            WorldTrait::Structure(structure) => structure.trait_id,
            WorldTrait::Rebellion(rebellion) => rebellion.trait_id,
        }
    }

    fn borrowed(&self) -> TraitRef<'_> {
        match self {
            WorldTrait::Id(id) => TraitRef::Id(*id),
            WorldTrait::Structure(structure) => TraitRef::Structure(structure),
            WorldTrait::Rebellion(rebellion) => TraitRef::Rebellion(rebellion),
        }
    }
}

/// Borrowed view of a [`WorldTrait`], as returned by [`World::trait_map`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraitRef<'a> {
    Id(i64),
    Structure(&'a Trait),
    Rebellion(&'a Rebellion),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRoute {
    /// `[resId, pct, optimal, actual, ...]`
    pub imports: Option<Vec<Option<f64>>>,
    pub exports: Option<Vec<Option<f64>>>,
    /// `[desired, actual]` tech levels, with an optional reason it is capped.
    pub import_tech: Option<Vec<Value>>,
    pub export_tech: Option<Vec<Value>>,
    #[serde(rename = "partnerObjID")]
    pub partner_obj_id: i64,
    /// The flow data for this route lives on the partner world.
    #[serde(rename = "return")]
    pub reciprocal: Option<bool>,
}

impl TradeRoute {
    pub fn is_reciprocal(&self) -> bool {
        self.reciprocal.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: i64,
    /// Trait id describing the population.
    pub culture: i64,
    /// Trait id of the world's designation.
    pub designation: i64,
    pub efficiency: f64,
    pub name: String,
    /// Fleets stationed at this world.
    #[serde(rename = "nearObjIDs")]
    pub near_obj_ids: Option<Vec<i64>>,
    pub orbit: Vec<f64>,
    pub population: i64,
    pub pos: Location,
    pub resources: Option<Vec<i64>>,
    #[serde(rename = "sovereignID")]
    pub sovereign_id: i64,
    pub tech_level: i64,
    pub traits: Vec<WorldTrait>,
    pub world_class: i64,
    pub trade_routes: Option<Vec<TradeRoute>>,
    pub rev_index: Option<RevIndex>,
    pub battle_plan: Option<BattlePlanDetails>,
    #[serde(default)]
    pub region: NebulaType,
}

impl World {
    /// Resource id to stockpiled quantity.
    pub fn resource_map(&self) -> BTreeMap<i64, i64> {
        flat_pairs(self.resources.as_deref().unwrap_or_default()).collect()
    }

    /// Trait id to the trait entry, bare or structured.
    pub fn trait_map(&self) -> BTreeMap<i64, TraitRef<'_>> {
        self.traits
            .iter()
            .map(|entry| (entry.trait_id(), entry.borrowed()))
            .collect()
    }

    /// Partner world id to trade route, or `None` when the world has no routes.
    pub fn trade_partners(&self) -> Option<BTreeMap<i64, &TradeRoute>> {
        self.trade_routes.as_ref().map(|routes| {
            routes
                .iter()
                .map(|route| (route.partner_obj_id, route))
                .collect()
        })
    }

    /// Whether the world has `target` or a trait that inherits from it.
    ///
    /// With `include_characteristics`, the world class, designation and culture
    /// count as traits too.
    pub fn has_trait(
        &self,
        ruleset: &Ruleset,
        target: i64,
        include_characteristics: bool,
    ) -> Result<bool, RulesetError> {
        for entry in &self.traits {
            let trait_id = entry.trait_id();
            if trait_id == target || ruleset.trait_inherits_from(trait_id, target)? {
                return Ok(true);
            }
        }

        if include_characteristics {
            for characteristic in [self.world_class, self.designation, self.culture] {
                if characteristic == target
                    || ruleset.trait_inherits_from(characteristic, target)?
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// True only when the world has `trait_id` and it is still being built.
    pub fn trait_under_construction(&self, trait_id: i64) -> bool {
        self.traits.iter().any(|entry| match entry {
            WorldTrait::Structure(structure) => {
                structure.trait_id == trait_id && structure.build_complete.is_some()
            }
            _ => false,
        })
    }

    /// Inheritance-aware: a world with an upgraded structure has fully built
    /// the structure it replaced.
    pub fn has_fully_built_trait(&self, ruleset: &Ruleset, target: i64) -> Result<bool, RulesetError> {
        Ok(self.has_trait(ruleset, target, true)? && !self.trait_under_construction(target))
    }

    /// Resource ids produced by the designation's primary industry, or `None`
    /// when the designation produces nothing.
    pub fn primary_industry_products(&self) -> Option<Vec<i64>> {
        let primary = self.traits.iter().find_map(|entry| match entry {
            WorldTrait::Structure(structure) if structure.is_primary == Some(true) => {
                Some(structure)
            }
            _ => None,
        })?;
        primary.production_data.as_ref()?;

        Some(
            primary
                .build_data
                .chunks_exact(3)
                .filter_map(|group| group[0].as_i64())
                .collect(),
        )
    }
}

impl Validate for World {
    fn validate(&self) -> Result<(), VariantError> {
        if !(0.0..=100.0).contains(&self.efficiency) {
            return Err(VariantError::invalid(
                "efficiency",
                format!("{} is outside 0..=100", self.efficiency),
            ));
        }
        check_tech_level("techLevel", self.tech_level)?;
        if let Some(plan) = &self.battle_plan {
            plan.validate()?;
        }
        Ok(())
    }
}

/// A world belonging to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedWorld {
    #[serde(flatten)]
    pub world: World,
    /// `[resId, optimal, actual, ...]` consumed by the population.
    pub base_consumption: Vec<Option<f64>>,
    pub news: Option<Vec<News>>,
    pub trade_route_max: i64,
}

impl OwnedWorld {
    pub fn rev_index(&self) -> Option<RevIndex> {
        self.world.rev_index
    }
}

impl Validate for OwnedWorld {
    fn validate(&self) -> Result<(), VariantError> {
        self.world.validate()?;
        if self.world.rev_index.is_none() {
            return Err(VariantError::invalid("revIndex", "required on owned worlds"));
        }
        Ok(())
    }
}
