//! The long-lived client-side picture of the game.
//!
//! Objects are replaced whole when the server sends a fresh copy, so any view
//! derived from an object (trait maps, resource maps) has to be recomputed
//! from the current entry rather than kept across a batch.

use std::collections::HashMap;

use ahash::RandomState;
use anacreon_schema::{
    Fleet, HistoryElement, Siege, SovereignObject, SpaceObject, UpdateObject, World,
};

use crate::error::LookupError;

type IdMap<V> = HashMap<i64, V, RandomState>;

#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub(crate) space_objects: IdMap<SpaceObject>,
    pub(crate) sovereigns: IdMap<SovereignObject>,
    pub(crate) sieges: IdMap<Siege>,
    pub(crate) history: IdMap<HistoryElement>,
    pub(crate) update: Option<UpdateObject>,
    pub(crate) sequence: Option<i64>,
}

impl GameState {
    /// Seeds the sovereign table from `getGameInfo`.
    pub fn with_sovereigns(sovereigns: impl IntoIterator<Item = SovereignObject>) -> Self {
        GameState {
            sovereigns: sovereigns
                .into_iter()
                .map(|sovereign| (sovereign.id(), sovereign))
                .collect(),
            ..GameState::default()
        }
    }

    pub fn space_object(&self, id: i64) -> Result<&SpaceObject, LookupError> {
        self.space_objects
            .get(&id)
            .ok_or(LookupError::UnknownObject(id))
    }

    pub fn world(&self, id: i64) -> Result<&World, LookupError> {
        self.space_object(id)?
            .as_world()
            .ok_or(LookupError::NotAWorld(id))
    }

    pub fn fleet(&self, id: i64) -> Result<&Fleet, LookupError> {
        self.space_object(id)?
            .as_fleet()
            .ok_or(LookupError::NotAFleet(id))
    }

    /// First space object with exactly this name. Names are not unique, so
    /// prefer ids where one is at hand.
    pub fn object_by_name(&self, name: &str) -> Result<&SpaceObject, LookupError> {
        self.space_objects
            .values()
            .find(|object| object.name() == name)
            .ok_or_else(|| LookupError::UnknownName(name.to_string()))
    }

    pub fn sovereign(&self, id: i64) -> Result<&SovereignObject, LookupError> {
        self.sovereigns
            .get(&id)
            .ok_or(LookupError::UnknownSovereign(id))
    }

    pub fn siege(&self, id: i64) -> Result<&Siege, LookupError> {
        self.sieges.get(&id).ok_or(LookupError::UnknownSiege(id))
    }

    pub fn space_objects(&self) -> impl Iterator<Item = &SpaceObject> {
        self.space_objects.values()
    }

    pub fn sovereigns(&self) -> impl Iterator<Item = &SovereignObject> {
        self.sovereigns.values()
    }

    pub fn sieges(&self) -> impl Iterator<Item = &Siege> {
        self.sieges.values()
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryElement> {
        self.history.values()
    }

    pub fn history_element(&self, id: i64) -> Option<&HistoryElement> {
        self.history.get(&id)
    }

    pub fn update(&self) -> Option<&UpdateObject> {
        self.update.as_ref()
    }

    /// Sequence to send with the next request.
    pub fn sequence(&self) -> Option<i64> {
        self.sequence
    }

    /// Watches until the fleet arrives, `None` once it has.
    pub fn fleet_eta(&self, id: i64) -> Result<Option<f64>, LookupError> {
        let fleet = self.fleet(id)?;
        let now = self.update.as_ref().map_or(0.0, |update| update.update);
        Ok(fleet.eta.map(|eta| eta as f64 - now))
    }

    pub(crate) fn remove_history(&mut self, id: i64) -> Option<HistoryElement> {
        self.history.remove(&id)
    }
}
