//! Folding a decoded state update into [`GameState`].
//!
//! | element              | effect                                        |
//! |----------------------|-----------------------------------------------|
//! | world, fleet         | replace by id                                 |
//! | sovereign, siege     | replace by id                                 |
//! | relationship         | overwrite the sovereign's relationship field  |
//! | battle plan          | overwrite the space object's battle plan      |
//! | destroyed object     | remove by id, absent ids are fine             |
//! | history              | replace the whole history table               |
//! | update               | replace the tick cursor, keep its sequence    |
//! | region               | ignored                                       |
//! | selection            | returned to the caller, not stored            |
//! | raw                  | counted, otherwise ignored                    |
//!
//! Patches are checked against the store before anything is applied, so a
//! batch that patches an unknown object leaves the store untouched.

use std::collections::HashSet;

use ahash::RandomState;
use anacreon_schema::{AnacreonObject, Selection, UpdateObject};
use thiserror::Error;

use crate::store::GameState;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("relationship patch for unknown sovereign {0}")]
    UnknownSovereign(i64),
    #[error("battle plan patch for unknown space object {0}")]
    UnknownSpaceObject(i64),
}

/// What one batch did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Object the request created or affected, if the server named one.
    pub selection: Option<Selection>,
    pub upserted: usize,
    pub patched: usize,
    pub removed: usize,
    /// Elements kept as raw JSON because no variant accepted them.
    pub opaque: usize,
    /// Sequence after the batch.
    pub sequence: Option<i64>,
}

pub fn apply_batch(
    state: &mut GameState,
    batch: Vec<AnacreonObject>,
) -> Result<BatchOutcome, ReconcileError> {
    check_patch_targets(state, &batch)?;

    let mut outcome = BatchOutcome::default();
    for object in batch {
        match object {
            AnacreonObject::Space(space) => {
                state.space_objects.insert(space.id(), space);
                outcome.upserted += 1;
            }
            AnacreonObject::Sovereign(sovereign) => {
                state.sovereigns.insert(sovereign.id(), sovereign);
                outcome.upserted += 1;
            }
            AnacreonObject::Siege(siege) => {
                state.sieges.insert(siege.id, siege);
                outcome.upserted += 1;
            }
            AnacreonObject::Relationship(patch) => {
                let sovereign = state
                    .sovereigns
                    .get_mut(&patch.id)
                    .ok_or(ReconcileError::UnknownSovereign(patch.id))?;
                sovereign.base_mut().relationship = Some(patch.relationship);
                outcome.patched += 1;
            }
            AnacreonObject::BattlePlan(patch) => {
                let object = state
                    .space_objects
                    .get_mut(&patch.id)
                    .ok_or(ReconcileError::UnknownSpaceObject(patch.id))?;
                object.set_battle_plan(patch.battle_plan);
                outcome.patched += 1;
            }
            AnacreonObject::Destroyed(destroyed) => {
                if state.space_objects.remove(&destroyed.id).is_some() {
                    outcome.removed += 1;
                }
            }
            AnacreonObject::History(history) => {
                state.history = history
                    .history
                    .into_iter()
                    .map(|element| (element.id, element))
                    .collect();
            }
            AnacreonObject::Update(update) => {
                record_update(state, update);
            }
            AnacreonObject::Region(region) => {
                tracing::trace!(target: "anacreon::reconcile", id = region.id, "region.skipped");
            }
            AnacreonObject::Selection(selection) => {
                outcome.selection = Some(selection);
            }
            AnacreonObject::Raw(raw) => {
                tracing::debug!(
                    target: "anacreon::reconcile",
                    class = raw.class().unwrap_or("<none>"),
                    id = ?raw.id(),
                    "raw.skipped"
                );
                outcome.opaque += 1;
            }
        }
    }

    outcome.sequence = state.sequence;
    tracing::debug!(
        target: "anacreon::reconcile",
        upserted = outcome.upserted,
        patched = outcome.patched,
        removed = outcome.removed,
        opaque = outcome.opaque,
        sequence = ?outcome.sequence,
        "batch.applied"
    );
    Ok(outcome)
}

/// The server's sequence only moves forward; an older cursor is logged and
/// does not roll the sequence back.
fn record_update(state: &mut GameState, update: UpdateObject) {
    match state.sequence {
        Some(current) if update.sequence < current => {
            tracing::warn!(
                target: "anacreon::reconcile",
                current,
                received = update.sequence,
                "sequence.regressed"
            );
        }
        _ => state.sequence = Some(update.sequence),
    }
    state.update = Some(update);
}

/// Simulates the batch's inserts and removals to make sure every patch will
/// find its target at the point it is applied.
fn check_patch_targets(state: &GameState, batch: &[AnacreonObject]) -> Result<(), ReconcileError> {
    let mut added_objects = HashSet::with_hasher(RandomState::new());
    let mut removed_objects = HashSet::with_hasher(RandomState::new());
    let mut added_sovereigns = HashSet::with_hasher(RandomState::new());

    for object in batch {
        match object {
            AnacreonObject::Space(space) => {
                added_objects.insert(space.id());
                removed_objects.remove(&space.id());
            }
            AnacreonObject::Destroyed(destroyed) => {
                added_objects.remove(&destroyed.id);
                removed_objects.insert(destroyed.id);
            }
            AnacreonObject::Sovereign(sovereign) => {
                added_sovereigns.insert(sovereign.id());
            }
            AnacreonObject::Relationship(patch) => {
                if !added_sovereigns.contains(&patch.id) && !state.sovereigns.contains_key(&patch.id) {
                    return Err(ReconcileError::UnknownSovereign(patch.id));
                }
            }
            AnacreonObject::BattlePlan(patch) => {
                let present = added_objects.contains(&patch.id)
                    || (!removed_objects.contains(&patch.id)
                        && state.space_objects.contains_key(&patch.id));
                if !present {
                    return Err(ReconcileError::UnknownSpaceObject(patch.id));
                }
            }
            _ => {}
        }
    }
    Ok(())
}
