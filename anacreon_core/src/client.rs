//! The session handle: owns the transport, the ruleset and the live game
//! state, and turns every API call into a store update.
//!
//! Every response that carries update objects is decoded, folded and
//! announced under the state lock, so a reader never sees half a batch and
//! every waiter sees the batch that woke it.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anacreon_runtime::{
    AbortAttack, Action, AlterImprovement, Attack, BattleObjective, BuyItem, DeployFleet,
    DesignateWorld, DisbandFleet, GetTactical, IdValueMapping, LaunchLams, LoginRequest,
    RenameObject, SellFleet, SendMessage, SessionFields, SetFleetDestination, SetHistoryRead,
    SetIndustryAlloc, SetProductAlloc, SetTradeRoute, StopTradeRoute, TacticalOrder,
    TransferFleet,
};
use anacreon_schema::{
    decode_batch, AuthenticationResponse, Fleet, GameInfo, HistoryElement, Ruleset,
    ScenarioInfoElement, Selection, Siege, SovereignObject, SpaceObject, UpdateObject, UserInfo,
    World,
};
use anacreon_wire::{check_error_envelope, decode_large_integers};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cargo::remaining_cargo_space;
use crate::config::{load_client_config_from_env, ClientConfig};
use crate::error::{CalcError, ClientError, LookupError};
use crate::forces::{ForceCalculator, MilitaryForces};
use crate::improvements::valid_improvements;
use crate::metrics::SessionMetrics;
use crate::production::{production_info, ProductionInfo};
use crate::reconcile::{apply_batch, BatchOutcome};
use crate::signal::{SignalWaiter, StateSignal};
use crate::store::GameState;
use crate::transport::{HttpTransport, Transport};

const LOGIN: &str = "login";
const GAME_LIST: &str = "gameList";
const GET_GAME_INFO: &str = "getGameInfo";

#[derive(Debug, Default)]
struct LiveState {
    game: GameState,
    metrics: SessionMetrics,
}

struct ClientInner<T> {
    transport: T,
    config: Arc<ClientConfig>,
    auth_token: String,
    game_id: String,
    ruleset: Ruleset,
    user_info: UserInfo,
    forces: ForceCalculator,
    live: Mutex<LiveState>,
    /// Fires after each full refresh.
    refreshed: StateSignal,
    /// Fires after every batch, refreshes included.
    changed: StateSignal,
}

/// A logged-in session for one game. Cheap to clone; clones share state.
pub struct AnacreonClient<T: Transport = HttpTransport> {
    inner: Arc<ClientInner<T>>,
}

impl<T: Transport> Clone for AnacreonClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AnacreonClient<HttpTransport> {
    /// Logs in over HTTP with the configuration found through
    /// [`load_client_config_from_env`].
    pub async fn connect(game_id: &str, username: &str, password: &str) -> Result<Self, ClientError> {
        let (config, metadata) = load_client_config_from_env();
        tracing::info!(
            target: "anacreon::client",
            game_id,
            config_source = %metadata.source(),
            base_url = %config.base_url(),
            "session.connecting"
        );
        let transport = HttpTransport::from_config(&config)?;
        Self::log_in(transport, config, game_id, username, password).await
    }
}

impl<T: Transport> AnacreonClient<T> {
    /// Exchanges credentials for an auth token.
    pub async fn authenticate(
        transport: &T,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResponse, ClientError> {
        let request = serde_json::to_value(LoginRequest::new(username, password))
            .map_err(|err| ClientError::decode(LOGIN, err.to_string()))?;
        let body = transport.post(LOGIN, request).await?;
        if let Err(rejected) = check_error_envelope(&body) {
            return Err(ClientError::Authentication(rejected.message().to_string()));
        }
        if body.get("authToken").and_then(Value::as_str).is_none() {
            return Err(ClientError::Authentication(
                "login response carried no auth token".to_string(),
            ));
        }
        let response: AuthenticationResponse = serde_json::from_value(body)
            .map_err(|err| ClientError::decode(LOGIN, err.to_string()))?;
        tracing::info!(
            target: "anacreon::client",
            username = %response.username,
            "session.authenticated"
        );
        Ok(response)
    }

    pub async fn log_in(
        transport: T,
        config: Arc<ClientConfig>,
        game_id: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let auth = Self::authenticate(&transport, username, password).await?;
        Self::from_auth_token(transport, config, game_id, &auth.auth_token).await
    }

    /// Bootstraps a session from an existing token: fetches the game info,
    /// then the full state, before returning.
    pub async fn from_auth_token(
        transport: T,
        config: Arc<ClientConfig>,
        game_id: &str,
        auth_token: &str,
    ) -> Result<Self, ClientError> {
        let query = vec![
            ("authToken", auth_token.to_string()),
            ("gameID", game_id.to_string()),
        ];
        let mut body = transport.get(GET_GAME_INFO, query).await?;
        check_error_envelope(&body)?;
        decode_large_integers(&mut body)
            .map_err(|err| ClientError::decode(GET_GAME_INFO, err.to_string()))?;
        let info: GameInfo = serde_json::from_value(body)
            .map_err(|err| ClientError::decode(GET_GAME_INFO, err.to_string()))?;

        let ruleset = Ruleset::new(info.scenario_info);
        let client = Self {
            inner: Arc::new(ClientInner {
                transport,
                config,
                auth_token: auth_token.to_string(),
                game_id: game_id.to_string(),
                forces: ForceCalculator::from_ruleset(&ruleset),
                ruleset,
                user_info: info.user_info,
                live: Mutex::new(LiveState {
                    game: GameState::with_sovereigns(info.sovereigns),
                    metrics: SessionMetrics::default(),
                }),
                refreshed: StateSignal::new(),
                changed: StateSignal::new(),
            }),
        };

        client.get_objects().await?;
        tracing::info!(
            target: "anacreon::client",
            game_id,
            sovereign_id = client.sovereign_id(),
            scenario_elements = client.inner.ruleset.len(),
            "session.bootstrapped"
        );
        Ok(client)
    }

    /// Games visible to the token's account, as the server describes them.
    pub async fn game_list(transport: &T, auth_token: &str) -> Result<Value, ClientError> {
        let body = transport
            .get(GAME_LIST, vec![("authToken", auth_token.to_string())])
            .await?;
        check_error_envelope(&body)?;
        Ok(body)
    }

    pub fn game_id(&self) -> &str {
        &self.inner.game_id
    }

    pub fn sovereign_id(&self) -> i64 {
        self.inner.user_info.sovereign_id
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.inner.user_info
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.inner.ruleset
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    fn session(&self) -> SessionFields {
        SessionFields {
            auth_token: self.inner.auth_token.clone(),
            game_id: self.inner.game_id.clone(),
            sovereign_id: self.sovereign_id(),
            sequence: self.inner.live.lock().game.sequence(),
        }
    }

    /// Decodes a state update, folds it into the store and wakes waiters,
    /// all under one lock.
    fn apply_response(
        &self,
        endpoint: &'static str,
        body: Value,
        full_refresh: bool,
    ) -> Result<BatchOutcome, ClientError> {
        check_error_envelope(&body)?;
        let Value::Array(elements) = body else {
            return Err(ClientError::decode(endpoint, "expected an array of update objects"));
        };

        let mut live = self.inner.live.lock();
        let outcome = apply_batch(&mut live.game, decode_batch(elements))?;
        live.metrics.record(&outcome, full_refresh);
        if full_refresh {
            self.inner.refreshed.notify();
        }
        self.inner.changed.notify();
        Ok(outcome)
    }

    async fn send(&self, action: &Action) -> Result<Value, ClientError> {
        let body = action.to_wire_body(&self.session())?;
        Ok(self.inner.transport.post(action.endpoint(), body).await?)
    }

    async fn do_action(&self, action: Action) -> Result<Option<Selection>, ClientError> {
        let response = self.send(&action).await?;
        let outcome = self.apply_response(action.endpoint(), response, false)?;
        Ok(outcome.selection)
    }

    async fn acknowledged(&self, action: Action) -> Result<bool, ClientError> {
        let response = self.send(&action).await?;
        check_error_envelope(&response)?;
        response.as_bool().ok_or_else(|| {
            ClientError::decode(action.endpoint(), format!("expected a boolean, got {response}"))
        })
    }

    async fn opaque(&self, action: Action) -> Result<Value, ClientError> {
        let response = self.send(&action).await?;
        check_error_envelope(&response)?;
        Ok(response)
    }

    /// Fetches the full game state and wakes both refresh and change waiters.
    pub async fn get_objects(&self) -> Result<BatchOutcome, ClientError> {
        let action = Action::GetObjects;
        let response = self.send(&action).await?;
        self.apply_response(action.endpoint(), response, true)
    }

    /// Deploys a fleet from a world or fleet and returns it, if the server
    /// pointed at the new fleet.
    pub async fn deploy_fleet(
        &self,
        source_obj_id: i64,
        resources: impl Into<IdValueMapping<i64>>,
    ) -> Result<Option<Fleet>, ClientError> {
        let selection = self
            .do_action(
                DeployFleet {
                    source_obj_id,
                    resources: resources.into(),
                }
                .into(),
            )
            .await?;
        let Some(selection) = selection else {
            return Ok(None);
        };
        Ok(self.state(|state| state.fleet(selection.id).ok().cloned()))
    }

    pub async fn transfer_fleet(
        &self,
        fleet_obj_id: i64,
        dest_obj_id: i64,
        resources: impl Into<IdValueMapping<i64>>,
    ) -> Result<(), ClientError> {
        self.do_action(
            TransferFleet {
                fleet_obj_id,
                dest_obj_id,
                resources: resources.into(),
            }
            .into(),
        )
        .await
        .map(drop)
    }

    /// Merges a fleet into the world or fleet `dest_obj_id`.
    pub async fn disband_fleet(&self, fleet_obj_id: i64, dest_obj_id: i64) -> Result<(), ClientError> {
        self.do_action(
            DisbandFleet {
                fleet_obj_id,
                dest_obj_id,
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn rename_object(&self, obj_id: i64, name: &str) -> Result<(), ClientError> {
        self.do_action(
            RenameObject {
                obj_id,
                name: name.to_string(),
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn set_fleet_destination(&self, fleet_id: i64, dest: i64) -> Result<(), ClientError> {
        self.do_action(SetFleetDestination { fleet_id, dest }.into())
            .await
            .map(drop)
    }

    pub async fn attack(
        &self,
        battlefield_id: i64,
        objective: BattleObjective,
        enemy_sovereign_ids: Vec<i64>,
    ) -> Result<(), ClientError> {
        self.do_action(Attack::on(battlefield_id, objective, enemy_sovereign_ids).into())
            .await
            .map(drop)
    }

    pub async fn abort_attack(&self, battlefield_id: i64) -> Result<(), ClientError> {
        self.do_action(AbortAttack { battlefield_id }.into())
            .await
            .map(drop)
    }

    pub async fn launch_lams(&self, source_obj_id: i64, target_obj_id: i64) -> Result<(), ClientError> {
        self.do_action(
            LaunchLams {
                source_obj_id,
                target_obj_id,
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn designate_world(&self, world_id: i64, new_designation: i64) -> Result<(), ClientError> {
        self.do_action(
            DesignateWorld {
                world_id,
                new_designation,
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn build_improvement(&self, world_id: i64, improvement_id: i64) -> Result<(), ClientError> {
        self.do_action(Action::BuildImprovement(AlterImprovement {
            world_id,
            improvement_id,
        }))
        .await
        .map(drop)
    }

    pub async fn destroy_improvement(
        &self,
        world_id: i64,
        improvement_id: i64,
    ) -> Result<(), ClientError> {
        self.do_action(Action::DestroyImprovement(AlterImprovement {
            world_id,
            improvement_id,
        }))
        .await
        .map(drop)
    }

    pub async fn set_industry_alloc(
        &self,
        world_id: i64,
        industry_id: i64,
        alloc_value: f64,
    ) -> Result<(), ClientError> {
        self.do_action(
            SetIndustryAlloc {
                world_id,
                industry_id,
                alloc_value,
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn set_product_alloc(
        &self,
        world_id: i64,
        industry_id: i64,
        alloc: impl Into<IdValueMapping<f64>>,
    ) -> Result<(), ClientError> {
        self.do_action(
            SetProductAlloc {
                world_id,
                industry_id,
                alloc: alloc.into(),
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn set_trade_route(&self, route: SetTradeRoute) -> Result<(), ClientError> {
        self.do_action(route.into()).await.map(drop)
    }

    pub async fn stop_trade_route(&self, world_a: i64, world_b: i64) -> Result<(), ClientError> {
        self.do_action(StopTradeRoute { world_a, world_b }.into())
            .await
            .map(drop)
    }

    pub async fn buy_item(
        &self,
        source_obj_id: i64,
        item_id: i64,
        item_count: i64,
    ) -> Result<(), ClientError> {
        self.do_action(
            BuyItem {
                source_obj_id,
                item_id,
                item_count,
            }
            .into(),
        )
        .await
        .map(drop)
    }

    pub async fn sell_fleet(
        &self,
        fleet_id: i64,
        buyer_obj_id: i64,
        resources: impl Into<IdValueMapping<i64>>,
    ) -> Result<(), ClientError> {
        self.do_action(
            SellFleet {
                fleet_id,
                buyer_obj_id,
                resources: resources.into(),
            }
            .into(),
        )
        .await
        .map(drop)
    }

    /// Squadron positions and battle groups on a battlefield, as raw JSON.
    pub async fn get_tactical(&self, battlefield_id: i64) -> Result<Value, ClientError> {
        self.opaque(GetTactical { battlefield_id }.into()).await
    }

    /// Whether the server accepted the order.
    pub async fn tactical_order(&self, order: TacticalOrder) -> Result<bool, ClientError> {
        self.acknowledged(order.into()).await
    }

    /// Dismisses a history popup; the entry leaves the store once the server
    /// acknowledges it.
    pub async fn set_history_read(&self, history_id: i64) -> Result<bool, ClientError> {
        let cleared = self.acknowledged(SetHistoryRead { history_id }.into()).await?;
        if cleared {
            let mut live = self.inner.live.lock();
            live.game.remove_history(history_id);
            self.inner.changed.notify();
        }
        Ok(cleared)
    }

    pub async fn send_message(&self, recipient_id: i64, message_text: &str) -> Result<Value, ClientError> {
        self.opaque(
            SendMessage {
                recipient_id,
                message_text: message_text.to_string(),
            }
            .into(),
        )
        .await
    }

    /// Runs `read` against the current state under the state lock.
    pub fn state<R>(&self, read: impl FnOnce(&GameState) -> R) -> R {
        read(&self.inner.live.lock().game)
    }

    pub fn space_object(&self, id: i64) -> Result<SpaceObject, LookupError> {
        self.state(|state| state.space_object(id).cloned())
    }

    pub fn world(&self, id: i64) -> Result<World, LookupError> {
        self.state(|state| state.world(id).cloned())
    }

    pub fn fleet(&self, id: i64) -> Result<Fleet, LookupError> {
        self.state(|state| state.fleet(id).cloned())
    }

    pub fn object_by_name(&self, name: &str) -> Result<SpaceObject, LookupError> {
        self.state(|state| state.object_by_name(name).cloned())
    }

    pub fn sovereign(&self, id: i64) -> Result<SovereignObject, LookupError> {
        self.state(|state| state.sovereign(id).cloned())
    }

    pub fn siege(&self, id: i64) -> Result<Siege, LookupError> {
        self.state(|state| state.siege(id).cloned())
    }

    pub fn history(&self) -> Vec<HistoryElement> {
        self.state(|state| state.history().cloned().collect())
    }

    pub fn update(&self) -> Option<UpdateObject> {
        self.state(|state| state.update().cloned())
    }

    /// Watches until the fleet arrives, or `None` if it already has.
    pub fn fleet_eta(&self, fleet_id: i64) -> Result<Option<f64>, LookupError> {
        self.state(|state| state.fleet_eta(fleet_id))
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.inner.live.lock().metrics.clone()
    }

    pub fn forces(&self, object_id: i64) -> Result<MilitaryForces, LookupError> {
        self.state(|state| {
            state
                .space_object(object_id)
                .map(|object| self.inner.forces.forces_of(object))
        })
    }

    pub fn force_calculator(&self) -> &ForceCalculator {
        &self.inner.forces
    }

    pub fn production_info(&self, world_id: i64) -> Result<BTreeMap<i64, ProductionInfo>, CalcError> {
        self.state(|state| production_info(state, world_id))
    }

    pub fn remaining_cargo_space(&self, fleet_id: i64) -> Result<f64, CalcError> {
        let fleet = self.fleet(fleet_id)?;
        remaining_cargo_space(&self.inner.ruleset, &fleet)
    }

    pub fn valid_improvements(&self, world_id: i64) -> Result<Vec<&ScenarioInfoElement>, CalcError> {
        let world = self.world(world_id)?;
        valid_improvements(&self.inner.ruleset, &world)
    }

    /// A waiter for full refreshes published after this call.
    pub fn subscribe_refreshes(&self) -> SignalWaiter {
        self.inner.refreshed.subscribe()
    }

    /// A waiter for any state change published after this call.
    pub fn subscribe_changes(&self) -> SignalWaiter {
        self.inner.changed.subscribe()
    }

    /// Resolves after the next full refresh, whoever triggered it. The
    /// subscription is taken when this is called, not when the future is
    /// first polled.
    pub fn wait_for_get_objects(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut waiter = self.subscribe_refreshes();
        async move {
            waiter.changed().await;
        }
    }

    /// Resolves after the next batch of any kind, subscribed at call time.
    pub fn wait_for_any_update(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut waiter = self.subscribe_changes();
        async move {
            waiter.changed().await;
        }
    }

    /// How long the refresh loop sleeps before its next fetch.
    fn next_refresh_delay(&self) -> Duration {
        self.state(|state| state.update().map(|update| update.next_update_time))
            .filter(|millis| *millis > 0)
            .map(|millis| Duration::from_millis(millis as u64))
            .unwrap_or_else(|| self.inner.config.refresh_fallback())
    }

    /// Spawns a task that refreshes the full state once per watch until the
    /// returned handle is stopped or dropped. A failed refresh is logged and
    /// retried on the next tick.
    pub fn spawn_periodic_refresh(&self) -> RefreshHandle {
        let (stop, mut stopped) = watch::channel(false);
        let client = self.clone();
        let task = tokio::spawn(async move {
            loop {
                if let Err(err) = client.get_objects().await {
                    tracing::warn!(
                        target: "anacreon::client",
                        error = %err,
                        "refresh.failed"
                    );
                }
                let delay = client.next_refresh_delay();
                tracing::trace!(
                    target: "anacreon::client",
                    delay_ms = delay.as_millis() as u64,
                    "refresh.sleeping"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = stopped.changed() => break,
                }
                if *stopped.borrow() {
                    break;
                }
            }
            tracing::debug!(target: "anacreon::client", "refresh.stopped");
        });
        RefreshHandle { stop, task }
    }
}

/// Control for a task started by [`AnacreonClient::spawn_periodic_refresh`].
#[derive(Debug)]
pub struct RefreshHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stops the loop at its next sleep and waits for it to exit. A fetch
    /// already in flight runs to completion first.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(err) = self.task.await {
            tracing::warn!(target: "anacreon::client", error = %err, "refresh.join_failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
