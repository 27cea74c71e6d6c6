use anacreon_schema::{Category, Ruleset, ScenarioInfoElement, World, ROLE_TECH_ADVANCE};

use crate::error::CalcError;

/// Improvements a player could start building on `world` right now, in
/// ruleset order.
///
/// An improvement qualifies when it is player-buildable at the world's tech
/// level, is not already present, has its predecessor (for upgrades) and
/// requirements fully built, is not excluded by anything on the world, and
/// would not downgrade an existing structure. Tech advances must also raise
/// the world above its current tech level.
pub fn valid_improvements<'r>(
    ruleset: &'r Ruleset,
    world: &World,
) -> Result<Vec<&'r ScenarioInfoElement>, CalcError> {
    let existing = world.trait_map();
    let mut valid = Vec::new();

    for improvement in ruleset.iter() {
        let Some(id) = improvement.id else {
            continue;
        };
        let buildable = improvement.category == Some(Category::Improvement)
            && !existing.contains_key(&id)
            && improvement.build_time.is_some()
            && improvement.npe_only != Some(true)
            && improvement.designation_only != Some(true)
            && improvement
                .min_tech_level
                .map_or(true, |min| world.tech_level >= min);
        if !buildable {
            continue;
        }

        if let Some(predecessors) = improvement.build_upgrade.as_deref().filter(|p| !p.is_empty()) {
            if !any_built(ruleset, world, predecessors)? {
                continue;
            }
        }
        if let Some(requirements) = &improvement.build_requirements {
            if !all_built(ruleset, world, requirements)? {
                continue;
            }
        }
        if let Some(exclusions) = &improvement.build_exclusions {
            if any_present(ruleset, world, exclusions)? {
                continue;
            }
        }
        if is_downgrade(ruleset, existing.keys().copied(), id)? {
            continue;
        }
        if improvement.role.as_deref() == Some(ROLE_TECH_ADVANCE)
            && improvement.tech_level_advance.unwrap_or(0) <= world.tech_level
        {
            continue;
        }
        valid.push(improvement);
    }

    tracing::trace!(
        target: "anacreon::calc",
        world = world.id,
        count = valid.len(),
        "improvements.listed"
    );
    Ok(valid)
}

fn built(ruleset: &Ruleset, world: &World, id: i64) -> Result<bool, CalcError> {
    Ok(world.has_trait(ruleset, id, true)? && !world.trait_under_construction(id))
}

fn any_built(ruleset: &Ruleset, world: &World, ids: &[i64]) -> Result<bool, CalcError> {
    for &id in ids {
        if built(ruleset, world, id)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn all_built(ruleset: &Ruleset, world: &World, ids: &[i64]) -> Result<bool, CalcError> {
    for &id in ids {
        if !built(ruleset, world, id)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_present(ruleset: &Ruleset, world: &World, ids: &[i64]) -> Result<bool, CalcError> {
    for &id in ids {
        if world.has_trait(ruleset, id, true)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether something already on the world is an upgrade of `candidate`.
fn is_downgrade(
    ruleset: &Ruleset,
    mut existing: impl Iterator<Item = i64>,
    candidate: i64,
) -> Result<bool, CalcError> {
    existing.try_fold(false, |found, trait_id| {
        Ok(found || ruleset.trait_depends_on(trait_id, candidate)?)
    })
}
