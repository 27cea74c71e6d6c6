//! Typed requests for the Anacreon API.
//!
//! Each mutating endpoint has a payload struct; [`Action`] ties them to their
//! endpoint and response shape and builds the JSON body, merged with the
//! [`SessionFields`] every authenticated call carries.

pub mod actions;
pub mod mapping;

pub use actions::{
    AbortAttack, Action, ActionError, AlterImprovement, Attack, BattlePlanRequest, BuyItem,
    DeployFleet, DesignateWorld, DisbandFleet, GetTactical, LaunchLams, LoginRequest,
    RenameObject, ResponseKind, SellFleet, SendMessage, SessionFields, SetFleetDestination,
    SetHistoryRead, SetIndustryAlloc, SetProductAlloc, SetTradeRoute, StopTradeRoute,
    TacticalOrder, TacticalOrderType, TradeAllocValue, TradeRouteType, TransferFleet,
    MAX_ALLOCATION, MIN_ALLOCATION,
};
pub use mapping::{FlatEntry, IdValueMapping};

pub use anacreon_schema::BattleObjective;
