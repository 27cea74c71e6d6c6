use anacreon_schema::{flat_pairs, Fleet, Ruleset};

use crate::error::CalcError;

/// Cargo capacity a fleet has left. Transports add `cargoSpace` per unit and
/// carried goods take `mass` per unit, so an overloaded fleet goes negative.
pub fn remaining_cargo_space(ruleset: &Ruleset, fleet: &Fleet) -> Result<f64, CalcError> {
    let mut remaining = 0.0;
    for (resource, quantity) in flat_pairs(&fleet.resources) {
        let element = ruleset.require(resource)?;
        let quantity = quantity as f64;
        if let Some(space) = element.cargo_space.filter(|space| *space != 0.0) {
            remaining += space * quantity;
        } else if element.is_cargo == Some(true) {
            if let Some(mass) = element.mass {
                remaining -= mass * quantity;
            }
        }
    }
    Ok(remaining)
}
