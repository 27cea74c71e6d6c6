//! Typed model of the objects returned by the Anacreon API.
//!
//! Every element of a state update carries a `class` discriminator. The
//! [`resolve`] module maps each discriminator to an ordered list of variant
//! parsers and falls back to a [`RawObject`] when none of them accepts the
//! element, so unknown shapes are never discarded.

pub mod combat;
pub mod events;
pub mod flat;
pub mod fleet;
pub mod resolve;
pub mod scenario;
pub mod sovereign;
pub mod world;

#[cfg(test)]
pub(crate) mod fixtures;

pub use combat::{BattleObjective, BattlePlanDetails, BattlePlanObject, Siege};
pub use events::{
    AuthenticationResponse, DestroyedSpaceObject, History, HistoryElement, News, RegionObject,
    RegionShape, Relationship, Selection, UpdateObject,
};
pub use flat::{dist, flat_chunks, flat_pairs};
pub use fleet::Fleet;
pub use resolve::{decode_batch, resolve, AnacreonObject, RawObject, SpaceObject};
pub use scenario::{
    Category, GameInfo, Ruleset, RulesetError, ScenarioInfoElement, UserInfo, ROLE_TECH_ADVANCE,
};
pub use sovereign::{
    ExplorationGrid, MesophonTrait, OwnSovereign, ReigningSovereign, Sovereign, SovereignActions,
    SovereignObject, SovereignRelationship, SovereignStats,
};
pub use world::{
    NebulaType, OwnedWorld, Rebellion, RevIndex, TradeRoute, Trait, TraitRef, World,
    WorldTrait,
};

use thiserror::Error;

/// An `(x, y)` position on the galactic map.
pub type Location = (f64, f64);

pub const MIN_TECH_LEVEL: i64 = 1;
pub const MAX_TECH_LEVEL: i64 = 10;

/// Why a variant parser rejected an object.
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("object does not have the variant's shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("field `{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl VariantError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        VariantError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Checks that go beyond the presence and type of fields.
pub trait Validate {
    fn validate(&self) -> Result<(), VariantError> {
        Ok(())
    }
}

pub(crate) fn check_tech_level(field: &'static str, level: i64) -> Result<(), VariantError> {
    if (MIN_TECH_LEVEL..=MAX_TECH_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(VariantError::invalid(
            field,
            format!("{level} is outside {MIN_TECH_LEVEL}..={MAX_TECH_LEVEL}"),
        ))
    }
}
