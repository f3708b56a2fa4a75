//! End-to-end tests for walks, workers, and the dedup store

use crate::common::{
    create_test_config, mount_farm, mount_listing, mount_recents, wait_for_farms,
};
use farmstats::{DedupGate, FarmId, Pipeline, SqliteDedupGate, Villager};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_range_walk_stores_every_farm() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 1, &["1AAAAA", "1BBBBB"]).await;
    mount_listing(&mock_server, 0, &["1CCCCC", "1AAAAA"]).await;
    mount_farm(&mock_server, "1AAAAA", &[("Abigail", "7"), ("Sam", "2")]).await;
    mount_farm(&mock_server, "1BBBBB", &[("Abigail", "3")]).await;
    mount_farm(&mock_server, "1CCCCC", &[("Wizard", "10")]).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("farm_ids.db");

    let mut config = create_test_config(&mock_server.uri());
    config.spider.dedup_database_path = Some(db_path.to_string_lossy().to_string());

    let pipeline = Pipeline::from_config(config).expect("Failed to build pipeline");
    let handle = pipeline.handle();

    let summary = handle.spider.start_range(1).await.unwrap();
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.farms_queued, 4);
    assert!(!summary.stopped);

    wait_for_farms(&handle, 3).await;
    pipeline.shutdown().await;

    let first = handle.store.get(&FarmId::new("1AAAAA")).unwrap();
    assert_eq!(first.score(Villager::Abigail), 7);
    assert_eq!(first.score(Villager::Sam), 2);
    assert_eq!(
        handle
            .store
            .get(&FarmId::new("1CCCCC"))
            .unwrap()
            .score(Villager::Wizard),
        10
    );
    assert_eq!(handle.store.len(), 3);

    let gate = SqliteDedupGate::new(&db_path).expect("Failed to reopen dedup store");
    assert_eq!(gate.count().unwrap(), 3);
}

#[tokio::test]
async fn test_dedup_store_survives_restart() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 0, &["1AAAAA", "1BBBBB"]).await;
    mount_farm(&mock_server, "1AAAAA", &[("Abigail", "1")]).await;
    mount_farm(&mock_server, "1BBBBB", &[("Abigail", "2")]).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("farm_ids.db");
    let mut config = create_test_config(&mock_server.uri());
    config.spider.dedup_database_path = Some(db_path.to_string_lossy().to_string());

    let first_run = Pipeline::from_config(config.clone()).unwrap();
    let outcome = first_run.handle().spider.fetch_page(0).await.unwrap();
    assert_eq!(outcome.fresh, 2);
    first_run.shutdown().await;

    let second_run = Pipeline::from_config(config).unwrap();
    let handle = second_run.handle();
    let outcome = handle.spider.fetch_page(0).await.unwrap();
    assert_eq!(outcome.fresh, 0);
    assert_eq!(outcome.queued, 2, "known ids are still queued");

    wait_for_farms(&handle, 2).await;
    second_run.shutdown().await;
}

#[tokio::test]
async fn test_bad_pairs_are_dropped() {
    let mock_server = MockServer::start().await;
    mount_farm(
        &mock_server,
        "1AAAAA",
        &[("Gunther", "5"), ("Abigail", "11"), ("Sam", "4")],
    )
    .await;

    let pipeline = Pipeline::from_config(create_test_config(&mock_server.uri())).unwrap();
    let handle = pipeline.handle();
    handle.submit("1AAAAA").await.unwrap();

    wait_for_farms(&handle, 1).await;
    pipeline.shutdown().await;

    let record = handle.store.get(&FarmId::new("1AAAAA")).unwrap();
    assert_eq!(record.score(Villager::Abigail), 0);
    assert_eq!(record.score(Villager::Sam), 4);
}

#[tokio::test]
async fn test_failed_farm_is_dropped() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 0, &["1BROKE", "1GOOD0"]).await;
    mount_farm(&mock_server, "1GOOD0", &[("Leah", "6")]).await;
    Mock::given(method("GET"))
        .and(path("/1BROKE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let pipeline = Pipeline::from_config(create_test_config(&mock_server.uri())).unwrap();
    let handle = pipeline.handle();
    handle.spider.start_latest().await.unwrap();

    wait_for_farms(&handle, 1).await;
    pipeline.shutdown().await;

    assert!(handle.store.contains(&FarmId::new("1GOOD0")));
    assert!(!handle.store.contains(&FarmId::new("1BROKE")));
}

#[tokio::test]
async fn test_stored_farm_is_not_fetched_again() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1AAAAA"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(crate::common::farm_page(&[("Abigail", "5")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline = Pipeline::from_config(create_test_config(&mock_server.uri())).unwrap();
    let handle = pipeline.handle();

    handle.submit("1AAAAA").await.unwrap();
    wait_for_farms(&handle, 1).await;

    handle.submit("1AAAAA").await.unwrap();
    handle.submit("1AAAAA").await.unwrap();
    while !handle.queue.is_empty() {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    pipeline.shutdown().await;
    assert_eq!(handle.store.len(), 1);
    // MockServer verifies the single expected fetch on drop
}

#[tokio::test]
async fn test_recents_polled_at_startup() {
    let mock_server = MockServer::start().await;
    mount_recents(&mock_server, &["1REC01.save", "", "XREC02"]).await;
    mount_farm(&mock_server, "1REC01", &[("Penny", "8")]).await;

    let mut config = create_test_config(&mock_server.uri());
    config.spider.recents_poll_count = 1;

    let pipeline = Pipeline::from_config(config).unwrap();
    let handle = pipeline.handle();
    pipeline.serve().await.unwrap();

    wait_for_farms(&handle, 1).await;
    pipeline.shutdown().await;

    let record = handle.store.get(&FarmId::new("1REC01")).unwrap();
    assert_eq!(record.score(Villager::Penny), 8);
    assert_eq!(handle.store.len(), 1);
}

#[tokio::test]
async fn test_empty_listing_page_is_not_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing</html>"))
        .mount(&mock_server)
        .await;

    let pipeline = Pipeline::from_config(create_test_config(&mock_server.uri())).unwrap();
    let outcome = pipeline.handle().spider.fetch_page(4).await.unwrap();
    assert_eq!(outcome.found, 0);
    assert_eq!(outcome.queued, 0);
    pipeline.shutdown().await;
}
