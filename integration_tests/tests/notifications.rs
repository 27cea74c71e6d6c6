mod common;

use std::time::Duration;

use common::{bootstrap, fixture};
use serde_json::json;

const QUIET: Duration = Duration::from_millis(30);

#[tokio::test]
async fn concurrent_waiters_each_wake_once_per_batch() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("getObjects", fixture("get_objects.json"));

    let mut first = client.subscribe_changes();
    let mut second = client.subscribe_changes();
    let waiters = tokio::spawn(async move {
        let woke = (first.changed().await, second.changed().await);
        let again = tokio::time::timeout(QUIET, first.changed()).await;
        (woke, again.is_err())
    });

    client.get_objects().await?;
    let ((first_wake, second_wake), quiet_after) = waiters.await?;
    assert!(first_wake.is_some());
    assert_eq!(first_wake, second_wake);
    assert!(quiet_after, "no second wake without a second batch");
    Ok(())
}

#[tokio::test]
async fn actions_do_not_count_as_full_refreshes() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport
        .respond("designateWorld", json!([]))
        .respond("getObjects", fixture("get_objects.json"));

    let mut refreshes = client.subscribe_refreshes();
    let mut changes = client.subscribe_changes();

    client.designate_world(1002, 400).await?;
    assert!(changes.changed().await.is_some());
    assert!(tokio::time::timeout(QUIET, refreshes.changed()).await.is_err());

    client.get_objects().await?;
    assert!(refreshes.changed().await.is_some());
    assert!(changes.changed().await.is_some());
    Ok(())
}

#[tokio::test]
async fn wait_for_get_objects_resolves_on_someone_elses_refresh() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("getObjects", fixture("get_objects.json"));

    let waiter = tokio::spawn(client.wait_for_get_objects());
    client.get_objects().await?;
    tokio::time::timeout(Duration::from_secs(1), waiter).await??;
    Ok(())
}

#[tokio::test]
async fn waiter_created_before_refresh_sees_it_without_being_polled() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("getObjects", fixture("get_objects.json"));

    let refreshed = client.wait_for_get_objects();
    let changed = client.wait_for_any_update();
    client.get_objects().await?;

    tokio::time::timeout(Duration::from_millis(500), refreshed).await?;
    tokio::time::timeout(Duration::from_millis(500), changed).await?;
    Ok(())
}

#[tokio::test]
async fn any_update_waiter_resolves_on_action() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.respond("designateWorld", json!([]));

    let changed = client.wait_for_any_update();
    let refreshed = client.wait_for_get_objects();
    client.designate_world(1002, 400).await?;

    tokio::time::timeout(Duration::from_millis(500), changed).await?;
    assert!(tokio::time::timeout(QUIET, refreshed).await.is_err());
    Ok(())
}

#[tokio::test]
async fn periodic_refresh_runs_until_stopped() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    transport.always("getObjects", fixture("get_objects.json"));

    let mut refreshes = client.subscribe_refreshes();
    let handle = client.spawn_periodic_refresh();
    assert!(refreshes.changed().await.is_some());

    // the next tick is a full watch away, so stopping interrupts the sleep
    handle.stop().await;
    let fetched = transport.requests_to("getObjects").len();
    assert_eq!(fetched, 2);

    tokio::time::sleep(QUIET).await;
    assert_eq!(transport.requests_to("getObjects").len(), fetched);
    assert_eq!(client.metrics().full_refreshes, 2);
    Ok(())
}

#[tokio::test]
async fn failed_refresh_is_logged_and_the_loop_keeps_its_handle() -> anyhow::Result<()> {
    let (client, transport) = bootstrap().await?;
    let mut changes = client.subscribe_changes();

    // nothing scripted for getObjects: the tick fails and the loop goes to sleep
    let handle = client.spawn_periodic_refresh();
    tokio::time::sleep(QUIET).await;
    assert!(!handle.is_finished());
    assert!(tokio::time::timeout(QUIET, changes.changed()).await.is_err());

    handle.stop().await;
    assert_eq!(transport.requests_to("getObjects").len(), 2);
    Ok(())
}
