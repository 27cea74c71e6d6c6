//! A small game used by the unit tests: two worlds trading with each other,
//! one fleet, three sovereigns and a ruleset with enough units and
//! improvements to exercise the calculators.

use anacreon_schema::{decode_batch, GameInfo, Ruleset};
use serde_json::{json, Value};

use crate::reconcile::apply_batch;
use crate::store::GameState;

pub fn scenario_info() -> Value {
    json!([
        { "class": "resourceType", "id": 30, "unid": "core.GDM", "category": "maneuveringUnit", "attackValue": 3 },
        { "class": "resourceType", "id": 31, "unid": "core.infantry", "category": "groundUnit", "attackValue": 4 },
        { "class": "resourceType", "id": 32, "unid": "core.jumptransport", "category": "maneuveringUnit", "attackValue": 1, "cargoSpace": 100 },
        { "class": "resourceType", "id": 33, "unid": "core.goods", "category": "commodity", "isCargo": true, "mass": 2 },
        { "class": "resourceType", "id": 34, "unid": "core.defenseSatellite", "category": "orbitalUnit", "attackValue": 5 },
        { "class": "trait", "id": 50, "unid": "core.abundantOre", "category": "feature", "inheritFrom": [56] },
        { "class": "trait", "id": 56, "unid": "core.ore", "category": "feature" },
        { "class": "trait", "id": 88, "unid": "core.domedCity", "category": "improvement", "buildTime": 10, "minTechLevel": 3 },
        { "class": "trait", "id": 218, "unid": "core.sealedArcology", "category": "improvement", "buildTime": 20, "buildUpgrade": [88], "minTechLevel": 5 },
        { "class": "trait", "id": 220, "unid": "core.megastructure", "category": "improvement", "buildTime": 30, "buildUpgrade": [218], "minTechLevel": 7 },
        { "class": "trait", "id": 230, "unid": "core.university", "category": "improvement", "buildTime": 10, "role": "techAdvance", "techLevelAdvance": 6 },
        { "class": "trait", "id": 231, "unid": "core.academy", "category": "improvement", "buildTime": 10, "role": "techAdvance", "techLevelAdvance": 5 },
        { "class": "trait", "id": 240, "unid": "core.smelter", "category": "improvement", "buildTime": 5, "buildRequirements": [56] },
        { "class": "trait", "id": 241, "unid": "core.nature", "category": "improvement", "buildTime": 5, "buildExclusions": [50] },
        { "class": "trait", "id": 242, "unid": "core.tutorialDepot", "category": "improvement", "buildTime": 5, "npeOnly": true },
        { "class": "trait", "id": 243, "unid": "core.capitalPalace", "category": "improvement", "buildTime": 5, "designationOnly": true },
        { "class": "trait", "id": 244, "unid": "core.ruins", "category": "improvement" },
        { "class": "trait", "id": 245, "unid": "core.starGate", "category": "improvement", "buildTime": 50, "minTechLevel": 9 },
        { "class": "trait", "id": 300, "unid": "core.rebellion", "category": "rebellion" },
        { "class": "trait", "id": 400, "unid": "core.foundry", "category": "designation" },
        { "class": "trait", "id": 401, "unid": "core.desertWorld", "category": "worldClass" },
        { "class": "trait", "id": 402, "unid": "core.sapiens", "category": "culture" }
    ])
}

pub fn ruleset() -> Ruleset {
    let info: GameInfo = serde_json::from_value(game_info()).expect("game info fixture");
    Ruleset::new(info.scenario_info)
}

fn sovereign(id: i64) -> Value {
    json!({
        "class": "sovereign",
        "id": id,
        "imperialMight": 2,
        "name": format!("Empire {id}"),
        "relationship": null,
        "doctrine": null,
        "traits": null
    })
}

fn reigning(id: i64, capital: i64) -> Value {
    let mut value = sovereign(id);
    value["capitalID"] = json!(capital);
    value["stats"] = json!({ "fleets": 1, "population": 9000, "resources": null, "techLevel": 5, "worlds": 1 });
    value["foundedOn"] = json!(1000);
    value["territory"] = Value::Null;
    value
}

fn own(id: i64, capital: i64) -> Value {
    let mut value = reigning(id, capital);
    value["adminRange"] = json!([[10.0, 20.0, 120.0]]);
    value["explorationGrid"] = json!({ "radius": 300.0, "exploredOutline": [] });
    value["funds"] = json!([1, 90000]);
    value["secessionChance"] = json!(0.5);
    value
}

pub fn game_info() -> Value {
    json!({
        "scenarioInfo": scenario_info(),
        "sovereigns": [own(7, 1002), reigning(8, 1001), sovereign(9)],
        "userInfo": {
            "capitalObjID": 1002,
            "gameID": "8JNJ7FNZ",
            "mapBookmarks": [],
            "sovereignID": 7,
            "uiOptions": null,
            "username": "tester"
        }
    })
}

pub fn world(id: i64, sovereign_id: i64) -> Value {
    json!({
        "class": "world",
        "id": id,
        "culture": 402,
        "designation": 400,
        "efficiency": 90.0,
        "name": format!("World {id}"),
        "orbit": [0.0, 0.0, 1.0],
        "population": 3000,
        "pos": [10.0, 20.0],
        "resources": [30, 200],
        "sovereignID": sovereign_id,
        "techLevel": 4,
        "traits": [56],
        "worldClass": 401,
        "tradeRoutes": [{
            "partnerObjID": 1002,
            "imports": [31, 10, 2.0, null],
            "exports": [30, 10, 6.0, 6.0]
        }]
    })
}

/// The player's capital: builds, consumes, and trades with 1001 (data held by
/// 1001) and with 1003 (data held here).
pub fn owned_world(id: i64, sovereign_id: i64) -> Value {
    json!({
        "class": "world",
        "id": id,
        "culture": 402,
        "designation": 400,
        "efficiency": 100.0,
        "name": format!("Capital {id}"),
        "orbit": [0.0, 0.0, 2.0],
        "population": 8000,
        "pos": [12.0, 24.0],
        "resources": [30, 1000, 31, 0, 33, 50],
        "sovereignID": sovereign_id,
        "techLevel": 5,
        "traits": [
            50,
            {
                "allocation": 20.0,
                "buildData": [31, 100, false],
                "isPrimary": true,
                "productionData": [31, 12.0, null, 33, -4.0, -3.0],
                "targetAllocation": 20.0,
                "traitID": 88,
                "workUnits": 40.0
            },
            { "popularSupport": -10.0, "rebelForces": 0.0, "rebellionStart": 1400, "traitID": 300 }
        ],
        "worldClass": 401,
        "tradeRoutes": [
            { "partnerObjID": 1001, "return": true },
            { "partnerObjID": 1003, "imports": [33, 50, 10.0, 8.0], "exports": [31, 20, 5.0, null] }
        ],
        "revIndex": "content",
        "baseConsumption": [30, 100, null],
        "news": null,
        "tradeRouteMax": 4
    })
}

pub fn fleet(id: i64, sovereign_id: i64) -> Value {
    json!({
        "class": "fleet",
        "id": id,
        "ftlType": "jump",
        "name": format!("Fleet {id}"),
        "sovereignID": sovereign_id,
        "resources": [30, 10, 31, 5],
        "anchorObjID": null,
        "pos": [11.0, 21.0],
        "dest": [10.0, 20.0],
        "destID": 1001,
        "eta": 1510
    })
}

pub fn battle_plan(id: i64) -> Value {
    json!({
        "class": "battlePlan",
        "id": id,
        "battlePlan": {
            "enemySovereignIDs": [8],
            "objective": "invasion",
            "sovereignID": 7,
            "status": "deploying"
        }
    })
}

pub fn update(sequence: i64) -> Value {
    json!({
        "class": "update",
        "nextUpdateTime": 30000,
        "sequence": sequence,
        "update": 1500.5,
        "year0": 4021
    })
}

pub fn initial_batch() -> Vec<Value> {
    vec![
        update(42),
        world(1001, 8),
        owned_world(1002, 7),
        fleet(2001, 7),
        json!({
            "class": "siege",
            "id": 3001,
            "anchorObjID": 1001,
            "attackForces": 50.0,
            "defenseForces": 20.0,
            "name": "Siege of World 1001",
            "pos": [10.0, 20.0],
            "sovereignID": 7,
            "status": "attacking",
            "timeLeft": 12
        }),
        json!({
            "class": "history",
            "history": [{ "id": 501, "objID": 1002, "subject": 1, "text": "Construction complete." }]
        }),
    ]
}

pub fn populated_state() -> GameState {
    let info: GameInfo = serde_json::from_value(game_info()).expect("game info fixture");
    let mut state = GameState::with_sovereigns(info.sovereigns);
    apply_batch(&mut state, decode_batch(initial_batch())).expect("initial batch");
    state
}
