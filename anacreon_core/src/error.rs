use anacreon_runtime::ActionError;
use anacreon_schema::RulesetError;
use anacreon_wire::ApiError;
use thiserror::Error;

use crate::config::ClientConfigError;
use crate::reconcile::ReconcileError;
use crate::transport::TransportError;

/// A local lookup that missed; never involves the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no space object with id {0}")]
    UnknownObject(i64),
    #[error("no space object named `{0}`")]
    UnknownName(String),
    #[error("object {0} is not a world")]
    NotAWorld(i64),
    #[error("object {0} is not a fleet")]
    NotAFleet(i64),
    #[error("no sovereign with id {0}")]
    UnknownSovereign(i64),
    #[error("no siege with id {0}")]
    UnknownSiege(i64),
}

/// Failures of the derived calculators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Ruleset(#[from] RulesetError),
    #[error("world {world} has a reciprocal route to {partner}, which is not a known world")]
    MissingTradePartner { world: i64, partner: i64 },
    #[error("world {partner} carries no trade route back to world {world}")]
    MissingReciprocalRoute { world: i64, partner: i64 },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("local state diverged from the server: {0}")]
    InconsistentPatch(#[from] ReconcileError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response from `{endpoint}`: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
    #[error("invalid request: {0}")]
    Action(#[from] ActionError),
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error(transparent)]
    Config(#[from] ClientConfigError),
}

impl ClientError {
    pub(crate) fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        ClientError::Decode {
            endpoint,
            message: message.into(),
        }
    }
}
