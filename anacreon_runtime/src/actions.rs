use anacreon_schema::BattleObjective;
use anacreon_wire::encode_large_integers;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::mapping::IdValueMapping;

pub const MIN_ALLOCATION: f64 = 0.0;
pub const MAX_ALLOCATION: f64 = 100.0;

/// Fields every authenticated request carries next to its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFields {
    pub auth_token: String,
    #[serde(rename = "gameID")]
    pub game_id: String,
    #[serde(rename = "sovereignID")]
    pub sovereign_id: i64,
    /// Sequence of the latest update seen; `None` before the first refresh.
    pub sequence: Option<i64>,
}

/// Body of `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub actual: bool,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            actual: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployFleet {
    #[serde(rename = "sourceObjID")]
    pub source_obj_id: i64,
    pub resources: IdValueMapping<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFleet {
    #[serde(rename = "fleetObjID")]
    pub fleet_obj_id: i64,
    #[serde(rename = "destObjID")]
    pub dest_obj_id: i64,
    pub resources: IdValueMapping<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbandFleet {
    #[serde(rename = "fleetObjID")]
    pub fleet_obj_id: i64,
    #[serde(rename = "destObjID")]
    pub dest_obj_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameObject {
    #[serde(rename = "objID")]
    pub obj_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetFleetDestination {
    #[serde(rename = "objID")]
    pub fleet_id: i64,
    pub dest: i64,
}

/// Battle plan submitted with an attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattlePlanRequest {
    #[serde(rename = "battleFieldID")]
    pub battlefield_id: i64,
    pub objective: BattleObjective,
    #[serde(rename = "enemySovereignIDs")]
    pub enemy_sovereign_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    #[serde(rename = "attackerObjID")]
    pub attacker_obj_id: i64,
    pub battle_plan: BattlePlanRequest,
}

impl Attack {
    /// The attacking object is the battlefield itself, as in the game UI.
    pub fn on(battlefield_id: i64, objective: BattleObjective, enemies: Vec<i64>) -> Self {
        Self {
            attacker_obj_id: battlefield_id,
            battle_plan: BattlePlanRequest {
                battlefield_id,
                objective,
                enemy_sovereign_ids: enemies,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbortAttack {
    #[serde(rename = "battleFieldID")]
    pub battlefield_id: i64,
}

/// Fire jump missiles from a citadel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchLams {
    #[serde(rename = "objID")]
    pub source_obj_id: i64,
    #[serde(rename = "targetObjID")]
    pub target_obj_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignateWorld {
    #[serde(rename = "sourceObjID")]
    pub world_id: i64,
    pub new_designation: i64,
}

/// Shared body of `buildImprovement` and `destroyImprovement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlterImprovement {
    #[serde(rename = "sourceObjID")]
    pub world_id: i64,
    #[serde(rename = "improvementID")]
    pub improvement_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIndustryAlloc {
    #[serde(rename = "objID")]
    pub world_id: i64,
    #[serde(rename = "industryID")]
    pub industry_id: i64,
    /// Percent of the world's labor, 0 to 100.
    pub alloc_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetProductAlloc {
    #[serde(rename = "objID")]
    pub world_id: i64,
    #[serde(rename = "industryID")]
    pub industry_id: i64,
    /// Percent of the industry's labor per product, 0 to 100.
    pub alloc: IdValueMapping<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TradeRouteType {
    Tech,
    Consumption,
    /// One-way route as the game UI sets it up between unconnected worlds.
    #[default]
    AddDefaultRoute,
    AddExportRoute,
    SetExportQuota,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TradeAllocValue {
    Percent(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTradeRoute {
    #[serde(rename = "objID")]
    pub importer_id: i64,
    #[serde(rename = "sourceObjID")]
    pub exporter_id: i64,
    pub alloc_type: TradeRouteType,
    pub alloc_value: Option<TradeAllocValue>,
    #[serde(rename = "resType")]
    pub resource_id: Option<i64>,
}

impl SetTradeRoute {
    pub fn default_route(importer_id: i64, exporter_id: i64) -> Self {
        Self {
            importer_id,
            exporter_id,
            alloc_type: TradeRouteType::AddDefaultRoute,
            alloc_value: None,
            resource_id: None,
        }
    }
}

/// Stops all trade between two worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopTradeRoute {
    #[serde(rename = "objID")]
    pub world_a: i64,
    #[serde(rename = "sourceObjID")]
    pub world_b: i64,
}

/// Buy ships from the Mesophons at a world where a fleet is stationed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyItem {
    #[serde(rename = "sourceObjID")]
    pub source_obj_id: i64,
    #[serde(rename = "itemID")]
    pub item_id: i64,
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellFleet {
    #[serde(rename = "objID")]
    pub fleet_id: i64,
    #[serde(rename = "buyerObjID")]
    pub buyer_obj_id: i64,
    pub resources: IdValueMapping<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GetTactical {
    #[serde(rename = "objID")]
    pub battlefield_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TacticalOrderType {
    Orbit,
    Land,
    Target,
}

impl std::fmt::Display for TacticalOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TacticalOrderType::Orbit => "orbit",
            TacticalOrderType::Land => "land",
            TacticalOrderType::Target => "target",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TacticalOrder {
    #[serde(rename = "objID")]
    pub battlefield_id: i64,
    pub order: TacticalOrderType,
    #[serde(rename = "tacticalID")]
    pub squadron_id: i64,
    /// New orbit altitude for [`TacticalOrderType::Orbit`].
    pub orbit: Option<f64>,
    /// Squadron to engage for [`TacticalOrderType::Target`].
    #[serde(rename = "targetID")]
    pub target_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetHistoryRead {
    #[serde(rename = "historyID")]
    pub history_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    #[serde(rename = "recipientID")]
    pub recipient_id: i64,
    pub message_text: String,
}

/// What the server sends back for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// An array of tagged objects to fold into the state store.
    StateUpdate,
    /// A bare boolean.
    Acknowledgement,
    /// Untyped JSON handed back to the caller.
    Opaque,
}

/// Authenticated requests, one variant per endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    GetObjects,
    DeployFleet(DeployFleet),
    TransferFleet(TransferFleet),
    DisbandFleet(DisbandFleet),
    RenameObject(RenameObject),
    SetFleetDestination(SetFleetDestination),
    Attack(Attack),
    AbortAttack(AbortAttack),
    LaunchLams(LaunchLams),
    DesignateWorld(DesignateWorld),
    BuildImprovement(AlterImprovement),
    DestroyImprovement(AlterImprovement),
    SetIndustryAlloc(SetIndustryAlloc),
    SetProductAlloc(SetProductAlloc),
    SetTradeRoute(SetTradeRoute),
    StopTradeRoute(StopTradeRoute),
    BuyItem(BuyItem),
    SellFleet(SellFleet),
    GetTactical(GetTactical),
    TacticalOrder(TacticalOrder),
    SetHistoryRead(SetHistoryRead),
    SendMessage(SendMessage),
}

/// Error returned when an action fails local validation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("{field} = {value} is outside 0..=100")]
    AllocationOutOfRange { field: &'static str, value: f64 },
    #[error("enemy sovereigns may only be omitted when reinforcing a siege")]
    MissingEnemySovereigns,
    #[error("id/value list has odd length {len}")]
    OddFlatList { len: usize },
    #[error("tactical order `{order}` requires `{field}`")]
    MissingOrderArgument {
        order: TacticalOrderType,
        field: &'static str,
    },
    #[error("request body could not be serialized: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for ActionError {
    fn from(error: serde_json::Error) -> Self {
        ActionError::Serialize(error.to_string())
    }
}

fn check_allocation(field: &'static str, value: f64) -> Result<(), ActionError> {
    if (MIN_ALLOCATION..=MAX_ALLOCATION).contains(&value) {
        Ok(())
    } else {
        Err(ActionError::AllocationOutOfRange { field, value })
    }
}

impl Action {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Action::GetObjects => "getObjects",
            Action::DeployFleet(_) => "deployFleet",
            Action::TransferFleet(_) => "transferFleet",
            Action::DisbandFleet(_) => "disbandFleet",
            Action::RenameObject(_) => "renameObject",
            Action::SetFleetDestination(_) => "setDestination",
            Action::Attack(_) => "attack",
            Action::AbortAttack(_) => "abortAttack",
            Action::LaunchLams(_) => "launchLAMs",
            Action::DesignateWorld(_) => "designateWorld",
            Action::BuildImprovement(_) => "buildImprovement",
            Action::DestroyImprovement(_) => "destroyImprovement",
            Action::SetIndustryAlloc(_) => "setIndustryAlloc",
            Action::SetProductAlloc(_) => "setProductAlloc",
            Action::SetTradeRoute(_) => "setTradeRoute",
            Action::StopTradeRoute(_) => "stopTradeRoute",
            Action::BuyItem(_) => "buyItem",
            Action::SellFleet(_) => "sellFleet",
            Action::GetTactical(_) => "getTactical",
            Action::TacticalOrder(_) => "tacticalOrder",
            Action::SetHistoryRead(_) => "setHistoryRead",
            Action::SendMessage(_) => "sendMessage",
        }
    }

    pub fn response_kind(&self) -> ResponseKind {
        match self {
            Action::TacticalOrder(_) | Action::SetHistoryRead(_) => ResponseKind::Acknowledgement,
            Action::GetTactical(_) | Action::SendMessage(_) => ResponseKind::Opaque,
            _ => ResponseKind::StateUpdate,
        }
    }

    /// Local checks run before anything is sent.
    pub fn validate(&self) -> Result<(), ActionError> {
        match self {
            Action::DeployFleet(action) => action.resources.to_flat().map(drop),
            Action::TransferFleet(action) => action.resources.to_flat().map(drop),
            Action::SellFleet(action) => action.resources.to_flat().map(drop),
            Action::SetIndustryAlloc(action) => check_allocation("allocValue", action.alloc_value),
            Action::SetProductAlloc(action) => {
                let flat = action.alloc.to_flat()?;
                flat.chunks_exact(2)
                    .try_for_each(|pair| check_allocation("alloc", pair[1]))
            }
            Action::Attack(action) => {
                let plan = &action.battle_plan;
                if plan.enemy_sovereign_ids.is_empty()
                    && plan.objective != BattleObjective::ReinforceSiege
                {
                    return Err(ActionError::MissingEnemySovereigns);
                }
                Ok(())
            }
            Action::TacticalOrder(action) => match action.order {
                TacticalOrderType::Orbit if action.orbit.is_none() => {
                    Err(ActionError::MissingOrderArgument {
                        order: action.order,
                        field: "orbit",
                    })
                }
                TacticalOrderType::Target if action.target_id.is_none() => {
                    Err(ActionError::MissingOrderArgument {
                        order: action.order,
                        field: "targetID",
                    })
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            Action::GetObjects => Ok(Value::Object(Map::new())),
            Action::DeployFleet(action) => serde_json::to_value(action),
            Action::TransferFleet(action) => serde_json::to_value(action),
            Action::DisbandFleet(action) => serde_json::to_value(action),
            Action::RenameObject(action) => serde_json::to_value(action),
            Action::SetFleetDestination(action) => serde_json::to_value(action),
            Action::Attack(action) => serde_json::to_value(action),
            Action::AbortAttack(action) => serde_json::to_value(action),
            Action::LaunchLams(action) => serde_json::to_value(action),
            Action::DesignateWorld(action) => serde_json::to_value(action),
            Action::BuildImprovement(action) | Action::DestroyImprovement(action) => {
                serde_json::to_value(action)
            }
            Action::SetIndustryAlloc(action) => serde_json::to_value(action),
            Action::SetProductAlloc(action) => serde_json::to_value(action),
            Action::SetTradeRoute(action) => serde_json::to_value(action),
            Action::StopTradeRoute(action) => serde_json::to_value(action),
            Action::BuyItem(action) => serde_json::to_value(action),
            Action::SellFleet(action) => serde_json::to_value(action),
            Action::GetTactical(action) => serde_json::to_value(action),
            Action::TacticalOrder(action) => serde_json::to_value(action),
            Action::SetHistoryRead(action) => serde_json::to_value(action),
            Action::SendMessage(action) => serde_json::to_value(action),
        }
    }

    /// Validates the action and builds the JSON body sent to the server:
    /// payload fields plus session fields, with large integers packed.
    pub fn to_wire_body(&self, session: &SessionFields) -> Result<Value, ActionError> {
        self.validate()?;
        let mut body = match self.payload()? {
            Value::Object(map) => map,
            other => {
                return Err(ActionError::Serialize(format!(
                    "payload is not an object: {other}"
                )))
            }
        };
        if let Value::Object(fields) = serde_json::to_value(session)? {
            body.extend(fields);
        }
        let mut body = Value::Object(body);
        encode_large_integers(&mut body);
        tracing::trace!(
            target: "anacreon::actions",
            endpoint = self.endpoint(),
            sequence = ?session.sequence,
            "action.body_built"
        );
        Ok(body)
    }
}

macro_rules! impl_from_payload {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for Action {
                fn from(payload: $payload) -> Self {
                    Action::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload! {
    DeployFleet => DeployFleet,
    TransferFleet => TransferFleet,
    DisbandFleet => DisbandFleet,
    RenameObject => RenameObject,
    SetFleetDestination => SetFleetDestination,
    Attack => Attack,
    AbortAttack => AbortAttack,
    LaunchLams => LaunchLams,
    DesignateWorld => DesignateWorld,
    SetIndustryAlloc => SetIndustryAlloc,
    SetProductAlloc => SetProductAlloc,
    SetTradeRoute => SetTradeRoute,
    StopTradeRoute => StopTradeRoute,
    BuyItem => BuyItem,
    SellFleet => SellFleet,
    GetTactical => GetTactical,
    TacticalOrder => TacticalOrder,
    SetHistoryRead => SetHistoryRead,
    SendMessage => SendMessage,
}
