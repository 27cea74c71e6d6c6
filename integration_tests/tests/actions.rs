mod common;

use anacreon_core::{ClientError, ReconcileError, TransportError};
use anacreon_runtime::{ActionError, TacticalOrder, TacticalOrderType};
use anacreon_schema::BattleObjective;
use common::{bootstrap, AUTH_TOKEN, GAME_ID};
use serde_json::{json, Value};

fn update(sequence: i64) -> Value {
    json!({
        "class": "update",
        "nextUpdateTime": 30000,
        "sequence": sequence,
        "update": 1501.0,
        "year0": 4021
    })
}

fn new_fleet(id: i64) -> Value {
    json!({
        "class": "fleet",
        "id": id,
        "ftlType": "jump",
        "name": "Strike Group",
        "sovereignID": 7,
        "resources": [30, 10],
        "anchorObjID": 1002,
        "pos": [12.0, 24.0]
    })
}

fn rejection(message: &str) -> Value {
    json!(["AEON2011:hexeError:v1", "Error", message, ""])
}

#[tokio::test]
async fn deploy_fleet_returns_the_selected_fleet() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond(
        "deployFleet",
        json!([update(43), new_fleet(2002), { "class": "selection", "id": 2002 }]),
    );

    let fleet = client
        .deploy_fleet(1002, [(30, 10)])
        .await?
        .expect("server selected the new fleet");
    assert_eq!(fleet.id, 2002);
    assert!(fleet.eta.is_none());
    assert_eq!(client.fleet_eta(2002)?, None);

    let body = transport.requests_to("deployFleet")[0].body.clone();
    assert_eq!(
        body,
        Some(json!({
            "sourceObjID": 1002,
            "resources": [30, 10],
            "authToken": AUTH_TOKEN,
            "gameID": GAME_ID,
            "sovereignID": 7,
            "sequence": 42
        }))
    );
    assert_eq!(client.state(|state| state.sequence()), Some(43));
    Ok(())
}

#[tokio::test]
async fn later_requests_carry_the_latest_sequence() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport
        .respond("setDestination", json!([update(43)]))
        .respond("renameObject", json!([update(44)]));

    client.set_fleet_destination(2001, 1001).await?;
    client.rename_object(2001, "Vanguard Hunters").await?;

    let rename = transport.requests_to("renameObject")[0].body.clone().expect("body");
    assert_eq!(rename["sequence"], json!(43));
    assert_eq!(rename["objID"], json!(2001));
    assert_eq!(rename["name"], json!("Vanguard Hunters"));
    Ok(())
}

#[tokio::test]
async fn api_errors_leave_the_store_alone() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("sellFleet", rejection("You do not have those resources."));
    let mut changes = client.subscribe_changes();

    let result = client.sell_fleet(2001, 1001, vec![30, 500]).await;
    match result {
        Err(ClientError::Api(rejected)) => {
            assert_eq!(rejected.message(), "You do not have those resources.")
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    assert_eq!(client.metrics().batches_applied, 1);
    assert_eq!(client.fleet(2001)?.resources, vec![30, 10, 31, 5]);

    let woke = tokio::time::timeout(std::time::Duration::from_millis(20), changes.changed()).await;
    assert!(woke.is_err(), "a rejected action publishes nothing");
    Ok(())
}

#[tokio::test]
async fn invalid_actions_are_never_sent() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;

    let result = client.set_industry_alloc(1002, 88, 140.0).await;
    assert!(matches!(
        result,
        Err(ClientError::Action(ActionError::AllocationOutOfRange { .. }))
    ));

    let result = client.attack(1001, BattleObjective::Invasion, Vec::new()).await;
    assert!(matches!(
        result,
        Err(ClientError::Action(ActionError::MissingEnemySovereigns))
    ));

    assert!(transport.requests_to("setIndustryAlloc").is_empty());
    assert!(transport.requests_to("attack").is_empty());
    Ok(())
}

#[tokio::test]
async fn reinforcing_a_siege_needs_no_enemies() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("attack", json!([update(43)]));

    client
        .attack(1001, BattleObjective::ReinforceSiege, Vec::new())
        .await?;

    let body = transport.requests_to("attack")[0].body.clone().expect("body");
    assert_eq!(body["attackerObjID"], json!(1001));
    assert_eq!(body["battlePlan"]["battleFieldID"], json!(1001));
    assert_eq!(body["battlePlan"]["enemySovereignIDs"], json!([]));
    Ok(())
}

#[tokio::test]
async fn patch_for_unknown_object_is_an_inconsistency() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond(
        "abortAttack",
        json!([
            update(43),
            {
                "class": "battlePlan",
                "id": 9999,
                "battlePlan": {
                    "enemySovereignIDs": [8],
                    "objective": "invasion",
                    "sovereignID": 7,
                    "status": "deploying"
                }
            }
        ]),
    );

    let result = client.abort_attack(9999).await;
    assert!(matches!(
        result,
        Err(ClientError::InconsistentPatch(ReconcileError::UnknownSpaceObject(9999)))
    ));
    // nothing from the rejected batch was applied
    assert_eq!(client.state(|state| state.sequence()), Some(42));
    Ok(())
}

#[tokio::test]
async fn history_entry_leaves_once_acknowledged() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport
        .respond("setHistoryRead", json!(false))
        .respond("setHistoryRead", json!(true));

    assert!(!client.set_history_read(501).await?);
    assert_eq!(client.history().len(), 1);

    assert!(client.set_history_read(501).await?);
    assert!(client.history().is_empty());

    let body = transport.requests_to("setHistoryRead")[1].body.clone().expect("body");
    assert_eq!(body["historyID"], json!(501));
    Ok(())
}

#[tokio::test]
async fn tactical_calls_return_the_server_answer() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    let tactical = json!([{ "id": 1, "class": "squadron", "orbit": 1.5 }]);
    transport
        .respond("getTactical", tactical.clone())
        .respond("tacticalOrder", json!(true));

    assert_eq!(client.get_tactical(1001).await?, tactical);

    let accepted = client
        .tactical_order(TacticalOrder {
            battlefield_id: 1001,
            order: TacticalOrderType::Target,
            squadron_id: 1,
            orbit: None,
            target_id: Some(2),
        })
        .await?;
    assert!(accepted);

    let body = transport.requests_to("tacticalOrder")[0].body.clone().expect("body");
    assert_eq!(body["order"], json!("target"));
    assert_eq!(body["targetID"], json!(2));
    Ok(())
}

#[tokio::test]
async fn non_boolean_acknowledgement_is_a_decode_error() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("setHistoryRead", json!({ "ok": true }));

    let result = client.set_history_read(501).await;
    assert!(matches!(
        result,
        Err(ClientError::Decode { endpoint: "setHistoryRead", .. })
    ));
    assert_eq!(client.history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn transport_failures_propagate_unchanged() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    let failure = TransportError::Http {
        endpoint: "buyItem".to_string(),
        message: "connection reset".to_string(),
    };
    transport.fail("buyItem", failure.clone());

    match client.buy_item(2001, 30, 5).await {
        Err(ClientError::Transport(err)) => assert_eq!(err, failure),
        other => panic!("expected a transport error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn product_allocation_is_flattened_in_order() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("setProductAlloc", json!([update(43)]));

    client
        .set_product_alloc(1002, 88, [(33, 25.0), (31, 75.0)])
        .await?;

    let body = transport.requests_to("setProductAlloc")[0].body.clone().expect("body");
    assert_eq!(body["alloc"], json!([33, 25.0, 31, 75.0]));
    assert!(body["alloc"][0].is_i64());
    assert_eq!(body["industryID"], json!(88));
    Ok(())
}
