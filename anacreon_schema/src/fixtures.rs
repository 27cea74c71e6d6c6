//! Wire-shaped sample objects shared by the unit tests.

use serde_json::{json, Value};

use crate::scenario::{Ruleset, ScenarioInfoElement};

pub fn world(id: i64, sovereign_id: i64) -> Value {
    json!({
        "class": "world",
        "id": id,
        "culture": 402,
        "designation": 400,
        "efficiency": 80.0,
        "name": format!("World {id}"),
        "nearObjIDs": [2001],
        "orbit": [1.0, 2.0, 0.5],
        "population": 5000,
        "pos": [10.0, 20.0],
        "resources": [30, 1000, 31, 0],
        "sovereignID": sovereign_id,
        "techLevel": 5,
        "traits": [
            50,
            {
                "allocation": 10.0,
                "buildData": [30, 50, false, 31, 50, false],
                "isPrimary": true,
                "productionData": [30, 12.0, null, 31, -4.0, 3.0],
                "isFixed": false,
                "targetAllocation": 10.0,
                "traitID": 88,
                "buildComplete": 1600,
                "workUnits": 100.0
            },
            {
                "popularSupport": -5.0,
                "rebelForces": 1.5,
                "rebellionStart": 1200,
                "traitID": 300
            }
        ],
        "worldClass": 401,
        "tradeRoutes": [
            {
                "imports": null,
                "exports": null,
                "importTech": null,
                "exportTech": null,
                "partnerObjID": 1002,
                "return": true
            }
        ],
        "revIndex": null,
        "battlePlan": null,
        "region": 1
    })
}

pub fn owned_world(id: i64, sovereign_id: i64) -> Value {
    let mut value = world(id, sovereign_id);
    value["name"] = json!(format!("Owned {id}"));
    value["revIndex"] = json!("content");
    value["baseConsumption"] = json!([30, 100, null]);
    value["news"] = json!([{ "subject": 1, "text": "Population grew." }]);
    value["tradeRouteMax"] = json!(3);
    value
}

pub fn fleet(id: i64, sovereign_id: i64) -> Value {
    json!({
        "class": "fleet",
        "id": id,
        "ftlType": "jump",
        "name": format!("Fleet {id}"),
        "sovereignID": sovereign_id,
        "resources": [30, 10, 31, 5],
        "news": null,
        "anchorObjID": null,
        "battlePlan": null,
        "pos": [11.0, 21.0],
        "dest": [30.0, 40.0],
        "destID": 1001,
        "eta": 1510,
        "region": 1
    })
}

pub fn sovereign(id: i64) -> Value {
    json!({
        "class": "sovereign",
        "id": id,
        "imperialMight": 3,
        "name": format!("Sovereign {id}"),
        "relationship": null,
        "doctrine": null,
        "traits": null
    })
}

pub fn reigning_sovereign(id: i64) -> Value {
    let mut value = sovereign(id);
    value["capitalID"] = json!(1002);
    value["stats"] = json!({
        "fleets": 4,
        "population": 12000,
        "resources": [30, 1000],
        "techLevel": 5,
        "worlds": 3
    });
    value["foundedOn"] = Value::Null;
    value["territory"] = json!([[10.0, 20.0, 50.0]]);
    value
}

pub fn own_sovereign(id: i64) -> Value {
    let mut value = reigning_sovereign(id);
    value["adminRange"] = json!([[10.0, 20.0, 100.0]]);
    value["explorationGrid"] = json!({
        "radius": 250.0,
        "exploredOutline": [[0.0, 0.0, 1.0, 1.0]]
    });
    value["funds"] = json!([1, 250000]);
    value["secessionChance"] = json!(0.0);
    value
}

pub fn siege(id: i64) -> Value {
    json!({
        "class": "siege",
        "id": id,
        "anchorObjID": 1001,
        "attackForces": 120.0,
        "defenseForces": 80.0,
        "name": "Siege of World 1001",
        "news": null,
        "pos": [10.0, 20.0],
        "resources": [30, 50],
        "sovereignID": 8,
        "status": "attacking",
        "timeLeft": 20
    })
}

pub fn history() -> Value {
    json!({
        "class": "history",
        "history": [
            { "id": 501, "objID": 1002, "subject": 1, "text": "Construction complete." },
            { "id": 502, "objID": 2001, "subject": 2, "text": "Fleet arrived." }
        ]
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

pub fn relationship(id: i64) -> Value {
    json!({
        "class": "relationship",
        "id": id,
        "relationship": {
            "firstContact": 1000,
            "ourActions": { "attacksInitiated": 1, "offensivesInitiated": 0, "worldsConquered": 0 },
            "theirActions": { "attacksInitiated": 0, "offensivesInitiated": 0, "worldsConquered": 2 }
        }
    })
}

pub fn update(sequence: i64) -> Value {
    json!({
        "class": "update",
        "nextUpdateTime": 45000,
        "sequence": sequence,
        "update": 1500.5,
        "year0": 4021
    })
}

pub fn mixed_batch() -> Vec<Value> {
    vec![
        update(42),
        own_sovereign(7),
        reigning_sovereign(8),
        sovereign(9),
        world(1001, 8),
        owned_world(1002, 7),
        fleet(2001, 7),
        siege(3001),
        history(),
        battle_plan(1001),
        relationship(8),
        json!({
            "class": "region",
            "id": 4001,
            "shape": [{ "holes": null, "outline": [0.0, 0.0, 5.0, 5.0] }],
            "type": 60
        }),
        json!({ "class": "selection", "id": 2001 }),
        json!({ "class": "destroyedSpaceObject", "id": 2002 }),
    ]
}

pub fn scenario_elements() -> Value {
    json!([
        { "class": "resourceType", "id": 30, "unid": "core.GDM", "category": "maneuveringUnit", "attackValue": 3 },
        { "class": "resourceType", "id": 31, "unid": "core.infantry", "category": "groundUnit", "attackValue": 4 },
        { "class": "resourceType", "id": 32, "unid": "core.jumptransport", "category": "maneuveringUnit", "attackValue": 1, "cargoSpace": 100 },
        { "class": "resourceType", "id": 33, "unid": "core.goods", "category": "commodity", "isCargo": true, "mass": 2.0 },
        { "class": "trait", "id": 50, "unid": "core.abundantDeposits", "category": "feature", "inheritFrom": [56] },
        { "class": "trait", "id": 56, "unid": "core.deposits", "category": "feature" },
        { "class": "trait", "id": 88, "unid": "core.domedCity", "category": "improvement", "buildTime": 10, "minTechLevel": 3 },
        { "class": "trait", "id": 218, "unid": "core.sealedArcology", "category": "improvement", "buildTime": 20, "buildUpgrade": [88], "minTechLevel": 5 },
        { "class": "trait", "id": 220, "unid": "core.megastructure", "category": "improvement", "buildTime": 30, "buildUpgrade": [218], "minTechLevel": 7 },
        { "class": "trait", "id": 300, "unid": "core.rebellion", "category": "rebellion" },
        { "class": "trait", "id": 400, "unid": "core.agricultural", "category": "designation" },
        { "class": "trait", "id": 401, "unid": "core.terrestrial", "category": "worldClass" },
        { "class": "trait", "id": 402, "unid": "core.human", "category": "culture" }
    ])
}

pub fn ruleset() -> Ruleset {
    let elements: Vec<ScenarioInfoElement> =
        serde_json::from_value(scenario_elements()).expect("scenario fixture");
    Ruleset::new(elements)
}

pub fn game_info() -> Value {
    json!({
        "scenarioInfo": scenario_elements(),
        "sovereigns": [own_sovereign(7), reigning_sovereign(8), sovereign(9)],
        "userInfo": {
            "capitalObjID": 1002,
            "gameID": "8JNJ7FNZ",
            "mapBookmarks": [[0.0, 0.0]],
            "sovereignID": 7,
            "uiOptions": null,
            "username": "tester"
        }
    })
}
