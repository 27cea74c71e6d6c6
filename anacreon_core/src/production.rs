//! Per-resource flows through a world during the last watch.

use std::collections::BTreeMap;
use std::ops::{Add, Sub};

use anacreon_schema::{flat_chunks, flat_pairs, TradeRoute, World, WorldTrait};
use serde::Serialize;

use crate::error::{CalcError, LookupError};
use crate::store::GameState;

/// Flows of one resource on one world. The `_optimal` fields are what the
/// flow would have been without shortages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProductionInfo {
    /// Stockpiled on the world.
    pub available: f64,
    pub consumed: f64,
    pub exported: f64,
    pub imported: f64,
    pub produced: f64,
    pub consumed_optimal: f64,
    pub exported_optimal: f64,
    pub imported_optimal: f64,
    pub produced_optimal: f64,
}

impl ProductionInfo {
    /// Produced plus imported, less consumed and exported.
    pub fn net(&self) -> f64 {
        self.produced + self.imported - self.consumed - self.exported
    }

    fn zip_with(self, other: Self, op: impl Fn(f64, f64) -> f64) -> Self {
        ProductionInfo {
            available: op(self.available, other.available),
            consumed: op(self.consumed, other.consumed),
            exported: op(self.exported, other.exported),
            imported: op(self.imported, other.imported),
            produced: op(self.produced, other.produced),
            consumed_optimal: op(self.consumed_optimal, other.consumed_optimal),
            exported_optimal: op(self.exported_optimal, other.exported_optimal),
            imported_optimal: op(self.imported_optimal, other.imported_optimal),
            produced_optimal: op(self.produced_optimal, other.produced_optimal),
        }
    }
}

impl Add for ProductionInfo {
    type Output = ProductionInfo;

    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Sub for ProductionInfo {
    type Output = ProductionInfo;

    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

/// Resource id to [`ProductionInfo`] for world `world_id`.
///
/// Sources are the population's base consumption (owned worlds only), the
/// production data of every structure, and every trade route. A reciprocal
/// route is read from the partner's copy, with its imports and exports
/// swapped.
pub fn production_info(
    state: &GameState,
    world_id: i64,
) -> Result<BTreeMap<i64, ProductionInfo>, CalcError> {
    let object = state.space_object(world_id)?;
    let world = object.as_world().ok_or(LookupError::NotAWorld(world_id))?;
    let mut result: BTreeMap<i64, ProductionInfo> = BTreeMap::new();

    if let Some(owned) = object.as_owned_world() {
        for [resource, optimal, actual] in flat_chunks::<3, _>(&owned.base_consumption) {
            let (Some(resource), Some(optimal)) = (resource, optimal) else {
                continue;
            };
            let entry = result.entry(resource as i64).or_default();
            entry.consumed_optimal += optimal;
            entry.consumed += actual.unwrap_or(optimal);
        }
    }

    for structure in world.traits.iter().filter_map(|entry| match entry {
        WorldTrait::Structure(structure) => Some(structure),
        _ => None,
    }) {
        let Some(data) = structure.production_data.as_deref() else {
            continue;
        };
        for [resource, optimal, actual] in flat_chunks::<3, _>(data) {
            let (Some(resource), Some(optimal)) = (resource, optimal) else {
                continue;
            };
            let entry = result.entry(resource as i64).or_default();
            let actual = actual.unwrap_or(optimal);
            if optimal > 0.0 {
                entry.produced_optimal += optimal;
                entry.produced += actual;
            } else {
                entry.consumed_optimal -= optimal;
                entry.consumed -= actual;
            }
        }
    }

    for route in world.trade_routes.iter().flatten() {
        let (imports, exports) = if route.is_reciprocal() {
            let partner = reciprocal_partner(state, world, route.partner_obj_id)?;
            (partner.exports.as_deref(), partner.imports.as_deref())
        } else {
            (route.imports.as_deref(), route.exports.as_deref())
        };

        for (resource, optimal, actual) in trade_flows(exports) {
            let entry = result.entry(resource).or_default();
            entry.exported_optimal += optimal;
            entry.exported += actual;
        }
        for (resource, optimal, actual) in trade_flows(imports) {
            let entry = result.entry(resource).or_default();
            entry.imported_optimal += optimal;
            entry.imported += actual;
        }
    }

    for (resource, quantity) in flat_pairs(world.resources.as_deref().unwrap_or_default()) {
        if quantity > 0 {
            result.entry(resource).or_default().available = quantity as f64;
        }
    }

    tracing::trace!(
        target: "anacreon::calc",
        world = world_id,
        resources = result.len(),
        "production.computed"
    );
    Ok(result)
}

/// The partner's copy of the route that points back at `world`.
fn reciprocal_partner<'a>(
    state: &'a GameState,
    world: &World,
    partner_id: i64,
) -> Result<&'a TradeRoute, CalcError> {
    let partner = state
        .space_object(partner_id)
        .ok()
        .and_then(|object| object.as_world())
        .ok_or(CalcError::MissingTradePartner {
            world: world.id,
            partner: partner_id,
        })?;
    partner
        .trade_routes
        .iter()
        .flatten()
        .find(|route| route.partner_obj_id == world.id)
        .ok_or(CalcError::MissingReciprocalRoute {
            world: world.id,
            partner: partner_id,
        })
}

/// `(resource, optimal, actual)` from a `[resId, pct, optimal, actual, ...]`
/// list; a missing actual means the optimal amount moved.
fn trade_flows(list: Option<&[Option<f64>]>) -> impl Iterator<Item = (i64, f64, f64)> + '_ {
    flat_chunks::<4, _>(list.unwrap_or_default()).filter_map(|[resource, _, optimal, actual]| {
        let (resource, optimal) = (resource?, optimal?);
        Some((resource as i64, optimal, actual.unwrap_or(optimal)))
    })
}
