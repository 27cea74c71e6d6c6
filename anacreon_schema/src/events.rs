use serde::{Deserialize, Serialize};

use crate::sovereign::SovereignRelationship;
use crate::{Validate, VariantError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub auth_token: String,
    pub rights: Vec<String>,
    pub scoped_credentials: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub subject: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryElement {
    /// Passed to `setHistoryRead` to dismiss this entry.
    pub id: i64,
    #[serde(rename = "objID")]
    pub obj_id: i64,
    pub subject: i64,
    pub text: String,
}

/// The complete set of unread history entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub history: Vec<HistoryElement>,
}

impl Validate for History {}

/// The server tick cursor. Not keyed by id; at most one is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObject {
    /// Milliseconds until the next watch.
    pub next_update_time: i64,
    /// Echoed back on every request so the server can send only what changed.
    pub sequence: i64,
    /// Watches elapsed since the game started.
    pub update: f64,
    /// Calendar year in which the game started.
    pub year0: i64,
}

impl Validate for UpdateObject {
    fn validate(&self) -> Result<(), VariantError> {
        if self.next_update_time < 0 {
            return Err(VariantError::invalid("nextUpdateTime", "negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionShape {
    pub holes: Option<Vec<Vec<f64>>>,
    pub outline: Vec<f64>,
}

/// Nebulae, rift zones and clear space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionObject {
    pub id: i64,
    pub shape: Vec<RegionShape>,
    /// Scenario info id of the region type.
    #[serde(rename = "type")]
    pub region_type: i64,
}

impl Validate for RegionObject {}

/// Partial update of a sovereign's relationship to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,
    pub relationship: SovereignRelationship,
}

impl Validate for Relationship {}

/// Names the object a request created or affected, e.g. a freshly deployed fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: i64,
}

impl Validate for Selection {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedSpaceObject {
    pub id: i64,
}

impl Validate for DestroyedSpaceObject {}
