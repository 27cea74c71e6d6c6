use std::collections::HashMap;

use ahash::RandomState;
use anacreon_runtime::{ActionError, IdValueMapping};
use anacreon_schema::{flat_pairs, Category, Ruleset, SpaceObject};

/// Units whose attack is delivered by missiles rather than beams.
pub const MISSILE_UNIT_UNIDS: [&str; 10] = [
    "core.GDM",
    "core.hypersonicMissile",
    "core.armoredSatellite",
    "core.battlestationTitan",
    "core.jumpcruiserAdamant",
    "core.jumpcruiserUndine",
    "core.starcruiserBehemoth",
    "core.starcruiserMegathere",
    "core.starcruiserTyphon",
    "core.starcruiserVictory",
];

/// Force totals as the game UI shows them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MilitaryForces {
    pub space_forces: f64,
    pub ground_forces: f64,
    /// Part of the space forces that comes from ships.
    pub maneuvering_unit_forces: f64,
    /// Part of the space forces that comes from missile units.
    pub missile_forces: f64,
}

type AttackTable = HashMap<i64, f64, RandomState>;

/// Attack values per unit type, split by what kind of force they add to.
/// Built once per ruleset.
#[derive(Debug, Clone, Default)]
pub struct ForceCalculator {
    space: AttackTable,
    ground: AttackTable,
    maneuvering: AttackTable,
    missile: AttackTable,
}

impl ForceCalculator {
    pub fn from_ruleset(ruleset: &Ruleset) -> Self {
        let mut calculator = ForceCalculator::default();
        for element in ruleset.iter() {
            let (Some(id), Some(attack)) = (element.id, element.attack_value) else {
                continue;
            };
            match &element.category {
                Some(Category::FixedUnit | Category::OrbitalUnit | Category::ManeuveringUnit)
                    if element.cargo_space.is_none() =>
                {
                    calculator.space.insert(id, attack);
                    if element.category == Some(Category::ManeuveringUnit) {
                        calculator.maneuvering.insert(id, attack);
                    }
                    let is_missile = element
                        .unid
                        .as_deref()
                        .is_some_and(|unid| MISSILE_UNIT_UNIDS.contains(&unid));
                    if is_missile {
                        calculator.missile.insert(id, attack);
                    }
                }
                Some(Category::GroundUnit) => {
                    calculator.ground.insert(id, attack);
                }
                _ => {}
            }
        }
        calculator
    }

    /// Totals over a flat `[unitId, count, ...]` list. Unknown ids add nothing.
    pub fn forces(&self, resources: &[i64]) -> MilitaryForces {
        let mut totals = MilitaryForces::default();
        for (id, count) in flat_pairs(resources) {
            let count = count as f64;
            let attack = |table: &AttackTable| table.get(&id).copied().unwrap_or(0.0) * count;
            totals.space_forces += attack(&self.space);
            totals.ground_forces += attack(&self.ground);
            totals.maneuvering_unit_forces += attack(&self.maneuvering);
            totals.missile_forces += attack(&self.missile);
        }
        MilitaryForces {
            space_forces: totals.space_forces / 100.0,
            ground_forces: totals.ground_forces / 100.0,
            maneuvering_unit_forces: totals.maneuvering_unit_forces / 100.0,
            missile_forces: totals.missile_forces / 100.0,
        }
    }

    pub fn forces_of_mapping(
        &self,
        resources: &IdValueMapping<i64>,
    ) -> Result<MilitaryForces, ActionError> {
        Ok(self.forces(&resources.to_flat()?))
    }

    /// An object without a resource list has no forces.
    pub fn forces_of(&self, object: &SpaceObject) -> MilitaryForces {
        object
            .resources()
            .map(|resources| self.forces(resources))
            .unwrap_or_default()
    }
}
