//! Session layer of the Anacreon client.
//!
//! [`AnacreonClient`] logs in, loads the ruleset and keeps a [`GameState`]
//! in step with the server: every response that carries update objects is
//! folded in by [`reconcile::apply_batch`] and announced to waiters. The
//! calculators in [`forces`], [`production`], [`cargo`] and
//! [`improvements`] read that state without touching the network.

pub mod cargo;
pub mod client;
pub mod config;
pub mod error;
pub mod forces;
pub mod improvements;
pub mod metrics;
pub mod production;
pub mod reconcile;
pub mod signal;
pub mod store;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use cargo::remaining_cargo_space;
pub use client::{AnacreonClient, RefreshHandle};
pub use config::{
    load_client_config_from_env, ClientConfig, ClientConfigError, ClientConfigMetadata,
    BUILTIN_CLIENT_CONFIG, CLIENT_CONFIG_PATH_ENV,
};
pub use error::{CalcError, ClientError, LookupError};
pub use forces::{ForceCalculator, MilitaryForces, MISSILE_UNIT_UNIDS};
pub use improvements::valid_improvements;
pub use metrics::SessionMetrics;
pub use production::{production_info, ProductionInfo};
pub use reconcile::{apply_batch, BatchOutcome, ReconcileError};
pub use signal::{SignalWaiter, StateSignal};
pub use store::GameState;
pub use transport::{HttpTransport, Transport, TransportError};
