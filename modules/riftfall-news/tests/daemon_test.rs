//! End-to-end runs of NewsDaemon against mocks.
//!
//! Each test: set up the fake backend, store, notifier and writer, call
//! `NewsDaemon::run`, then assert on what was persisted and what side
//! effects fired. No network.

use std::sync::Arc;

use riftfall_common::{ContinentStatus, NewsItemType, RiftfallError};
use riftfall_news::cycle::CycleOrchestrator;
use riftfall_news::daemon::NewsDaemon;
use riftfall_news::synthesis::{DraftItem, NewsSynthesizer};
use riftfall_news::testing::*;
use riftfall_news::traits::NewsWriter;

struct World {
    store: Arc<MockNewsStore>,
    resetter: Arc<MockResetter>,
    notifier: Arc<RecordingNotifier>,
    daemon: NewsDaemon,
}

fn world(
    source: MockGameSource,
    store: MockNewsStore,
    writer: Option<Arc<dyn NewsWriter>>,
    max_items: usize,
) -> World {
    let store = Arc::new(store);
    let resetter = Arc::new(MockResetter::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let daemon = NewsDaemon::new(
        Arc::new(source),
        store.clone(),
        NewsSynthesizer::new(writer),
        CycleOrchestrator::new(resetter.clone(), notifier.clone()),
        max_items,
    );
    World {
        store,
        resetter,
        notifier,
        daemon,
    }
}

fn three_continents_one_fallen() -> MockGameSource {
    MockGameSource::new(game_state(vec![
        continent(1, "NA", "North Aster", 70.0, ContinentStatus::Ok),
        continent(2, "SV", "Sunder Vale", 0.0, ContinentStatus::Fallen),
        continent(3, "EM", "Ember March", 45.0, ContinentStatus::Ok),
    ]))
}

fn all_fallen() -> MockGameSource {
    let mut state = game_state(vec![
        continent(1, "NA", "North Aster", 0.0, ContinentStatus::Fallen),
        continent(2, "SV", "Sunder Vale", -4.0, ContinentStatus::Ok),
    ]);
    state.top_defenders = vec![top_defender(1, Some("kira"), 310)];
    MockGameSource::new(state)
}

// ---------------------------------------------------------------------------
// Partial collapse, AI disabled
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_fallen_continent_appends_single_fallback_summary() {
    let history = news_file(vec![titled_item("earlier"), titled_item("earlier still")]);
    let w = world(
        three_continents_one_fallen(),
        MockNewsStore::with_file(history),
        None,
        200,
    );

    let stats = w.daemon.run().await.unwrap();

    assert_eq!(stats.appended, 1);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.cycle_number, 1);
    assert!(!stats.reset_performed);
    assert!(stats.used_fallback);

    let saved = w.store.current().unwrap();
    assert_eq!(saved.items.len(), 3);
    let summary = saved.items.last().unwrap();
    assert_eq!(summary.item_type, NewsItemType::Summary);
    assert_eq!(summary.title, "Crisis across 1 front");
    assert!(summary.body.contains("Sunder Vale"));
    assert_eq!(summary.meta.fallen_continents, Some(vec!["SV".to_string()]));

    assert!(w.resetter.calls().is_empty());
    assert!(w.notifier.messages().is_empty());
}

// ---------------------------------------------------------------------------
// Full collapse, AI disabled
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_collapse_closes_cycle_and_resets() {
    let history = news_file(vec![
        news_item(NewsItemType::Summary),
        news_item(NewsItemType::CycleEnd),
        news_item(NewsItemType::CycleReset),
    ]);
    let w = world(all_fallen(), MockNewsStore::with_file(history), None, 200);

    let stats = w.daemon.run().await.unwrap();

    assert_eq!(stats.appended, 3);
    assert_eq!(stats.total, 6);
    assert_eq!(stats.cycle_number, 2);
    assert!(stats.reset_performed);

    let saved = w.store.current().unwrap();
    let appended = &saved.items[3..];
    assert_eq!(appended[0].item_type, NewsItemType::Summary);
    assert_eq!(appended[1].item_type, NewsItemType::CycleEnd);
    assert_eq!(appended[1].title, "Cycle 2 collapse");
    assert_eq!(
        appended[1].meta.fallen_continents,
        Some(vec!["NA".to_string(), "SV".to_string()])
    );
    assert_eq!(appended[2].item_type, NewsItemType::CycleReset);
    assert_eq!(appended[2].title, "Cycle 3 begins");
    assert_eq!(appended[2].meta.cycle_number, Some(3));

    let defenders = appended[0].meta.top_defenders.as_ref().unwrap();
    assert_eq!(defenders[0].username.as_deref(), Some("kira"));
    assert_eq!(defenders[0].continent_code, "NA");

    assert_eq!(w.resetter.calls(), vec![vec!["NA".to_string(), "SV".to_string()]]);
    assert_eq!(
        w.notifier.messages(),
        vec![
            "Riftfall cycle 2 ended. All continents have fallen.".to_string(),
            "Riftfall cycle 3 has begun after reset.".to_string(),
        ]
    );
}

#[tokio::test]
async fn next_run_after_collapse_counts_the_new_cycle() {
    let w = world(all_fallen(), MockNewsStore::empty(), None, 200);
    w.daemon.run().await.unwrap();

    let next = world(
        three_continents_one_fallen(),
        MockNewsStore::with_file(w.store.current().unwrap()),
        None,
        200,
    );
    let stats = next.daemon.run().await.unwrap();
    assert_eq!(stats.cycle_number, 2);
}

// ---------------------------------------------------------------------------
// AI path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ai_drafts_are_used_when_available() {
    let writer = Arc::new(ScriptedWriter::returning(vec![
        DraftItem {
            title: "Sunder Vale burns".into(),
            body: "The vale fell at dawn.".into(),
        },
        DraftItem {
            title: "North Aster steady".into(),
            body: "Defenders held.".into(),
        },
    ]));
    let w = world(
        three_continents_one_fallen(),
        MockNewsStore::empty(),
        Some(writer.clone()),
        200,
    );

    let stats = w.daemon.run().await.unwrap();

    assert_eq!(stats.appended, 2);
    assert!(!stats.used_fallback);
    assert_eq!(writer.calls(), 1);
    let saved = w.store.current().unwrap();
    assert_eq!(saved.items[0].title, "Sunder Vale burns");
    assert_eq!(saved.items[0].created_at, saved.items[1].created_at);
}

#[tokio::test]
async fn ai_failure_falls_back_without_failing_run() {
    let w = world(
        three_continents_one_fallen(),
        MockNewsStore::empty(),
        Some(Arc::new(ScriptedWriter::failing("timeout"))),
        200,
    );

    let stats = w.daemon.run().await.unwrap();

    assert!(stats.used_fallback);
    assert_eq!(w.store.current().unwrap().items[0].title, "Crisis across 1 front");
}

// ---------------------------------------------------------------------------
// History window
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_is_trimmed_to_max_items() {
    let history = news_file((0..5).map(|i| titled_item(&format!("old {i}"))).collect());
    let w = world(all_fallen(), MockNewsStore::with_file(history), None, 4);

    let stats = w.daemon.run().await.unwrap();

    assert_eq!(stats.appended, 3);
    assert_eq!(stats.total, 4);
    let titles: Vec<_> = w
        .store
        .current()
        .unwrap()
        .items
        .iter()
        .map(|i| i.title.clone())
        .collect();
    assert_eq!(titles[0], "old 4");
    assert_eq!(titles[3], "Cycle 2 begins");
}

#[tokio::test]
async fn first_run_creates_the_file() {
    let w = world(three_continents_one_fallen(), MockNewsStore::empty(), None, 200);

    w.daemon.run().await.unwrap();

    let saves = w.store.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].version, 1);
    assert_eq!(saves[0].items.len(), 1);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn source_failure_aborts_before_any_write() {
    let history = news_file(vec![titled_item("kept")]);
    let w = world(
        MockGameSource::failing(),
        MockNewsStore::with_file(history.clone()),
        None,
        200,
    );

    let err = w.daemon.run().await.unwrap_err();

    assert!(matches!(err.downcast_ref::<RiftfallError>(), Some(RiftfallError::Source(_))));
    assert!(w.store.saves().is_empty());
    assert_eq!(w.store.current().unwrap(), history);
}

#[tokio::test]
async fn store_load_failure_aborts() {
    let w = world(
        three_continents_one_fallen(),
        MockNewsStore::empty().failing_loads(),
        None,
        200,
    );
    assert!(w.daemon.run().await.is_err());
    assert!(w.store.saves().is_empty());
}

#[tokio::test]
async fn reset_failure_aborts_without_persisting() {
    let store = Arc::new(MockNewsStore::empty());
    let notifier = Arc::new(RecordingNotifier::new());
    let daemon = NewsDaemon::new(
        Arc::new(all_fallen()),
        store.clone(),
        NewsSynthesizer::fallback_only(),
        CycleOrchestrator::new(Arc::new(MockResetter::failing()), notifier.clone()),
        200,
    );

    assert!(daemon.run().await.is_err());
    assert!(store.saves().is_empty());
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn notification_failure_does_not_fail_run() {
    let store = Arc::new(MockNewsStore::empty());
    let resetter = Arc::new(MockResetter::new());
    let daemon = NewsDaemon::new(
        Arc::new(all_fallen()),
        store.clone(),
        NewsSynthesizer::fallback_only(),
        CycleOrchestrator::new(resetter.clone(), Arc::new(RecordingNotifier::failing())),
        200,
    );

    let stats = daemon.run().await.unwrap();

    assert!(stats.reset_performed);
    assert_eq!(resetter.calls().len(), 1);
    assert_eq!(store.saves().len(), 1);
}

#[tokio::test]
async fn concurrent_write_is_rejected_as_conflict() {
    let theirs = news_file(vec![titled_item("someone else")]);
    let w = world(
        three_continents_one_fallen(),
        MockNewsStore::with_file(theirs.clone()).racing(),
        None,
        200,
    );

    let err = w.daemon.run().await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RiftfallError>(),
        Some(RiftfallError::StoreConflict { .. })
    ));
    assert!(w.store.saves().is_empty());
    assert_eq!(w.store.current().unwrap(), theirs);
}

#[tokio::test]
async fn repeated_runs_over_same_state_append_distinct_items() {
    let w = world(three_continents_one_fallen(), MockNewsStore::empty(), None, 200);

    w.daemon.run().await.unwrap();
    let stats = w.daemon.run().await.unwrap();

    assert_eq!(stats.total, 2);
    let items = w.store.current().unwrap().items;
    assert_ne!(items[0].id, items[1].id);
    assert_eq!(items[0].title, items[1].title);
}
