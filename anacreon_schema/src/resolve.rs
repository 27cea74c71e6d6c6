//! Tagged-union resolution of wire objects.
//!
//! Each `class` discriminator maps to a fixed, most-specific-first list of
//! variant parsers. A parser either returns the typed object or a
//! [`VariantError`]; the first success wins. Objects with an unknown or
//! missing class, or that no parser accepts, are kept as [`RawObject`].
//!
//! | class                  | variants tried, in order                              |
//! |------------------------|-------------------------------------------------------|
//! | `world`                | [`OwnedWorld`], [`World`]                             |
//! | `fleet`                | [`Fleet`]                                             |
//! | `sovereign`            | [`OwnSovereign`], [`ReigningSovereign`], [`Sovereign`] |
//! | `siege`                | [`Siege`]                                             |
//! | `history`              | [`History`]                                           |
//! | `battlePlan`           | [`BattlePlanObject`]                                  |
//! | `destroyedSpaceObject` | [`DestroyedSpaceObject`]                              |
//! | `update`               | [`UpdateObject`]                                      |
//! | `region`               | [`RegionObject`]                                      |
//! | `relationship`         | [`Relationship`]                                      |
//! | `selection`            | [`Selection`]                                         |

use anacreon_wire::{decode_large_integers, encode_large_integers, to_wire_name};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::combat::{BattlePlanDetails, BattlePlanObject, Siege};
use crate::events::{
    DestroyedSpaceObject, History, RegionObject, Relationship, Selection, UpdateObject,
};
use crate::fleet::Fleet;
use crate::sovereign::{OwnSovereign, ReigningSovereign, Sovereign, SovereignObject};
use crate::world::{OwnedWorld, World};
use crate::{Location, Validate, VariantError};

pub const CLASS_FIELD: &str = "class";

/// A world or fleet; the objects that move, fight and get destroyed.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceObject {
    World(World),
    OwnedWorld(OwnedWorld),
    Fleet(Fleet),
}

impl SpaceObject {
    pub fn id(&self) -> i64 {
        match self {
            SpaceObject::World(world) => world.id,
            SpaceObject::OwnedWorld(owned) => owned.world.id,
            SpaceObject::Fleet(fleet) => fleet.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SpaceObject::World(world) => &world.name,
            SpaceObject::OwnedWorld(owned) => &owned.world.name,
            SpaceObject::Fleet(fleet) => &fleet.name,
        }
    }

    pub fn sovereign_id(&self) -> i64 {
        match self {
            SpaceObject::World(world) => world.sovereign_id,
            SpaceObject::OwnedWorld(owned) => owned.world.sovereign_id,
            SpaceObject::Fleet(fleet) => fleet.sovereign_id,
        }
    }

    pub fn pos(&self) -> Location {
        match self {
            SpaceObject::World(world) => world.pos,
            SpaceObject::OwnedWorld(owned) => owned.world.pos,
            SpaceObject::Fleet(fleet) => fleet.pos,
        }
    }

    pub fn resources(&self) -> Option<&[i64]> {
        match self {
            SpaceObject::World(world) => world.resources.as_deref(),
            SpaceObject::OwnedWorld(owned) => owned.world.resources.as_deref(),
            SpaceObject::Fleet(fleet) => Some(&fleet.resources),
        }
    }

    pub fn battle_plan(&self) -> Option<&BattlePlanDetails> {
        match self {
            SpaceObject::World(world) => world.battle_plan.as_ref(),
            SpaceObject::OwnedWorld(owned) => owned.world.battle_plan.as_ref(),
            SpaceObject::Fleet(fleet) => fleet.battle_plan.as_ref(),
        }
    }

    pub fn set_battle_plan(&mut self, plan: BattlePlanDetails) {
        let slot = match self {
            SpaceObject::World(world) => &mut world.battle_plan,
            SpaceObject::OwnedWorld(owned) => &mut owned.world.battle_plan,
            SpaceObject::Fleet(fleet) => &mut fleet.battle_plan,
        };
        *slot = Some(plan);
    }

    /// The world view of a world or owned world.
    pub fn as_world(&self) -> Option<&World> {
        match self {
            SpaceObject::World(world) => Some(world),
            SpaceObject::OwnedWorld(owned) => Some(&owned.world),
            SpaceObject::Fleet(_) => None,
        }
    }

    pub fn as_owned_world(&self) -> Option<&OwnedWorld> {
        match self {
            SpaceObject::OwnedWorld(owned) => Some(owned),
            _ => None,
        }
    }

    pub fn as_fleet(&self) -> Option<&Fleet> {
        match self {
            SpaceObject::Fleet(fleet) => Some(fleet),
            _ => None,
        }
    }
}

/// An object no variant accepted, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObject(pub Value);

impl RawObject {
    pub fn class(&self) -> Option<&str> {
        self.0.get(CLASS_FIELD).and_then(Value::as_str)
    }

    /// Looks up a field by its snake_case name, e.g. `field("sovereign_id")`
    /// reads `sovereignID`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(to_wire_name(name))
    }

    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }
}

/// One decoded element of a state update.
#[derive(Debug, Clone, PartialEq)]
pub enum AnacreonObject {
    Space(SpaceObject),
    Sovereign(SovereignObject),
    Siege(Siege),
    History(History),
    BattlePlan(BattlePlanObject),
    Destroyed(DestroyedSpaceObject),
    Update(UpdateObject),
    Region(RegionObject),
    Relationship(Relationship),
    Selection(Selection),
    Raw(RawObject),
}

impl AnacreonObject {
    pub fn class(&self) -> Option<&str> {
        let class = match self {
            AnacreonObject::Space(SpaceObject::World(_) | SpaceObject::OwnedWorld(_)) => "world",
            AnacreonObject::Space(SpaceObject::Fleet(_)) => "fleet",
            AnacreonObject::Sovereign(_) => "sovereign",
            AnacreonObject::Siege(_) => "siege",
            AnacreonObject::History(_) => "history",
            AnacreonObject::BattlePlan(_) => "battlePlan",
            AnacreonObject::Destroyed(_) => "destroyedSpaceObject",
            AnacreonObject::Update(_) => "update",
            AnacreonObject::Region(_) => "region",
            AnacreonObject::Relationship(_) => "relationship",
            AnacreonObject::Selection(_) => "selection",
            AnacreonObject::Raw(raw) => return raw.class(),
        };
        Some(class)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, AnacreonObject::Raw(_))
    }

    /// Re-encodes the object in wire form: `class` restored and large
    /// integers packed again.
    pub fn to_wire(&self) -> Result<Value, serde_json::Error> {
        let mut value = match self {
            AnacreonObject::Space(SpaceObject::World(world)) => serde_json::to_value(world)?,
            AnacreonObject::Space(SpaceObject::OwnedWorld(owned)) => serde_json::to_value(owned)?,
            AnacreonObject::Space(SpaceObject::Fleet(fleet)) => serde_json::to_value(fleet)?,
            AnacreonObject::Sovereign(sovereign) => serde_json::to_value(sovereign)?,
            AnacreonObject::Siege(siege) => serde_json::to_value(siege)?,
            AnacreonObject::History(history) => serde_json::to_value(history)?,
            AnacreonObject::BattlePlan(plan) => serde_json::to_value(plan)?,
            AnacreonObject::Destroyed(destroyed) => serde_json::to_value(destroyed)?,
            AnacreonObject::Update(update) => serde_json::to_value(update)?,
            AnacreonObject::Region(region) => serde_json::to_value(region)?,
            AnacreonObject::Relationship(relationship) => serde_json::to_value(relationship)?,
            AnacreonObject::Selection(selection) => serde_json::to_value(selection)?,
            AnacreonObject::Raw(raw) => raw.0.clone(),
        };
        if let (Some(class), Value::Object(map)) = (self.class(), &mut value) {
            if !map.contains_key(CLASS_FIELD) {
                map.insert(CLASS_FIELD.to_string(), Value::from(class));
            }
        }
        encode_large_integers(&mut value);
        Ok(value)
    }
}

type VariantParser = fn(&Value) -> Result<AnacreonObject, VariantError>;

const WORLD_VARIANTS: &[VariantParser] = &[parse_owned_world, parse_world];
const FLEET_VARIANTS: &[VariantParser] = &[parse_fleet];
const SOVEREIGN_VARIANTS: &[VariantParser] = &[parse_sovereign_object];
const SIEGE_VARIANTS: &[VariantParser] = &[parse_siege];
const HISTORY_VARIANTS: &[VariantParser] = &[parse_history];
const BATTLE_PLAN_VARIANTS: &[VariantParser] = &[parse_battle_plan];
const DESTROYED_VARIANTS: &[VariantParser] = &[parse_destroyed];
const UPDATE_VARIANTS: &[VariantParser] = &[parse_update];
const REGION_VARIANTS: &[VariantParser] = &[parse_region];
const RELATIONSHIP_VARIANTS: &[VariantParser] = &[parse_relationship];
const SELECTION_VARIANTS: &[VariantParser] = &[parse_selection];

fn variants_for(class: &str) -> &'static [VariantParser] {
    match class {
        "world" => WORLD_VARIANTS,
        "fleet" => FLEET_VARIANTS,
        "sovereign" => SOVEREIGN_VARIANTS,
        "siege" => SIEGE_VARIANTS,
        "history" => HISTORY_VARIANTS,
        "battlePlan" => BATTLE_PLAN_VARIANTS,
        "destroyedSpaceObject" => DESTROYED_VARIANTS,
        "update" => UPDATE_VARIANTS,
        "region" => REGION_VARIANTS,
        "relationship" => RELATIONSHIP_VARIANTS,
        "selection" => SELECTION_VARIANTS,
        _ => &[],
    }
}

fn parse<T: DeserializeOwned + Validate>(value: &Value) -> Result<T, VariantError> {
    let parsed = T::deserialize(value)?;
    parsed.validate()?;
    Ok(parsed)
}

fn parse_owned_world(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(|owned| AnacreonObject::Space(SpaceObject::OwnedWorld(owned)))
}

fn parse_world(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(|world| AnacreonObject::Space(SpaceObject::World(world)))
}

fn parse_fleet(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(|fleet| AnacreonObject::Space(SpaceObject::Fleet(fleet)))
}

fn parse_sovereign_object(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse_sovereign(value).map(AnacreonObject::Sovereign)
}

/// Resolves a sovereign record, most specific variant first.
pub(crate) fn parse_sovereign(value: &Value) -> Result<SovereignObject, VariantError> {
    parse::<OwnSovereign>(value)
        .map(SovereignObject::Own)
        .or_else(|_| parse::<ReigningSovereign>(value).map(SovereignObject::Reigning))
        .or_else(|_| parse::<Sovereign>(value).map(SovereignObject::Sovereign))
}

fn parse_siege(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::Siege)
}

fn parse_history(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::History)
}

fn parse_battle_plan(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::BattlePlan)
}

fn parse_destroyed(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::Destroyed)
}

fn parse_update(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::Update)
}

fn parse_region(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::Region)
}

fn parse_relationship(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::Relationship)
}

fn parse_selection(value: &Value) -> Result<AnacreonObject, VariantError> {
    parse(value).map(AnacreonObject::Selection)
}

/// Decodes one wire element. Never fails: anything that does not resolve is
/// returned as [`AnacreonObject::Raw`].
pub fn resolve(mut value: Value) -> AnacreonObject {
    if let Err(err) = decode_large_integers(&mut value) {
        tracing::debug!(
            target: "anacreon::schema",
            error = %err,
            "resolve.fallback=ip_integer"
        );
        return AnacreonObject::Raw(RawObject(value));
    }

    let parsers = match value.get(CLASS_FIELD).and_then(Value::as_str) {
        Some(class) => variants_for(class),
        None => &[],
    };
    let mut last_error = None;
    for parser in parsers {
        match parser(&value) {
            Ok(object) => return object,
            Err(err) => last_error = Some(err),
        }
    }

    let class = value
        .get(CLASS_FIELD)
        .and_then(|class| class.as_str())
        .unwrap_or("<none>");
    tracing::debug!(
        target: "anacreon::schema",
        class,
        error = %last_error.map(|err| err.to_string()).unwrap_or_default(),
        "resolve.fallback=raw"
    );
    AnacreonObject::Raw(RawObject(value))
}

/// Decodes every element of a state update, preserving order.
pub fn decode_batch(elements: Vec<Value>) -> Vec<AnacreonObject> {
    elements.into_iter().map(resolve).collect()
}
