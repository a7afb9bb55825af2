//! Leaderboard integration tests.

use std::sync::Arc;

use salesdesk_core::config::leaderboard::AscendingRankMode;
use salesdesk_core::config::store::StoreConfig;
use salesdesk_core::types::{RankMetric, SortDirection};
use salesdesk_entity::performer::Performer;
use salesdesk_entity::user::{UserRecord, UserRole};
use salesdesk_service::{LeaderboardStatus, RankAggregator};
use salesdesk_store::traits::PerformanceStore;
use salesdesk_store::{MemoryDocumentStore, StoreFixture};

use crate::helpers::TestApp;

fn rows(performers: &[Performer]) -> Vec<(String, u32)> {
    performers
        .iter()
        .map(|p| (p.name.clone(), p.rank))
        .collect()
}

#[tokio::test]
async fn test_competition_ranking_with_gaps() {
    let app = TestApp::new();
    let roster = [
        ("Eve", 80.0),
        ("Ann", 100.0),
        ("Kim", 50.0),
        ("Lee", 100.0),
        ("Ola", 80.0),
    ];
    for (name, revenue) in roster {
        app.sales_user(name, &[revenue], 0);
    }
    let aggregator = app.aggregator();
    aggregator.refresh().await.unwrap();

    let ranked = aggregator.ranked_performers().await;
    let revenues: Vec<f64> = ranked.iter().map(|p| p.revenue).collect();
    let ranks: Vec<u32> = ranked.iter().map(|p| p.rank).collect();
    assert_eq!(revenues, vec![100.0, 100.0, 80.0, 80.0, 50.0]);
    assert_eq!(ranks, vec![1, 1, 3, 3, 5]);
}

#[tokio::test]
async fn test_zero_deals_has_zero_conversion() {
    let app = TestApp::new();
    let idle = app.sales_user("Idle", &[], 0);
    app.sales_user("Busy", &[400.0], 3);

    let aggregator = app.aggregator();
    aggregator.refresh().await.unwrap();
    aggregator.sort_by(RankMetric::ConversionRate).await;

    let ranked = aggregator.ranked_performers().await;
    let idle_row = ranked.iter().find(|p| p.user_id == idle).unwrap();
    assert_eq!(idle_row.deals_total, 0);
    assert_eq!(idle_row.conversion_rate, 0.0);
    assert!(idle_row.conversion_rate.is_finite());
    assert_eq!(ranked[0].name, "Busy");
    assert_eq!(ranked[0].conversion_rate, 25.0);
}

#[tokio::test]
async fn test_ranks_are_written_back_for_roster_only() {
    let app = TestApp::new();
    let alice = app.sales_user("Alice", &[5000.0], 0);
    let bob = app.sales_user("Bob", &[5000.0], 0);
    let carol = app.sales_user("Carol", &[3000.0], 0);
    let marketer = UserRecord::new("Mia", UserRole::Marketing);
    let marketer_id = marketer.id;
    app.store.put_user(marketer);

    let aggregator = app.aggregator();
    let report = aggregator.refresh().await.unwrap();
    assert_eq!(report.attempted, 3);
    assert!(report.is_complete());

    for (id, rank) in [(alice, 1), (bob, 1), (carol, 3)] {
        let user = app.store.find_user(id).await.unwrap().unwrap();
        assert_eq!(user.rank, Some(rank));
    }
    let untouched = app.store.find_user(marketer_id).await.unwrap().unwrap();
    assert_eq!(untouched.rank, None);
    assert!(untouched.rank_updated_at.is_none());
}

#[tokio::test]
async fn test_same_metric_twice_reverses_and_renumbers() {
    let app = TestApp::new();
    app.sales_user("Alice", &[100.0, 100.0, 100.0], 0);
    app.sales_user("Bob", &[50.0, 50.0, 50.0], 0);
    let carol = app.sales_user("Carol", &[900.0], 0);

    let aggregator = app.aggregator();
    aggregator.refresh().await.unwrap();

    aggregator.sort_by(RankMetric::DealsClosed).await;
    let desc = aggregator.ranked_performers().await;
    assert_eq!(
        rows(&desc),
        vec![("Alice".into(), 1), ("Bob".into(), 1), ("Carol".into(), 3)]
    );

    aggregator.sort_by(RankMetric::DealsClosed).await;
    assert_eq!(aggregator.sort_state().await.direction, SortDirection::Asc);
    let asc = aggregator.ranked_performers().await;
    assert_eq!(
        rows(&asc),
        vec![("Carol".into(), 1), ("Bob".into(), 2), ("Alice".into(), 3)]
    );

    let stored = app.store.find_user(carol).await.unwrap().unwrap();
    assert_eq!(stored.rank, Some(1));
}

#[tokio::test]
async fn test_ascending_competition_mode_shares_ties() {
    let mut app = TestApp::new();
    app.config.leaderboard.ascending_rank_mode = AscendingRankMode::Competition;
    app.sales_user("Alice", &[100.0, 100.0, 100.0], 0);
    app.sales_user("Bob", &[50.0, 50.0, 50.0], 0);
    app.sales_user("Carol", &[900.0], 0);

    let aggregator = app.aggregator();
    aggregator.refresh().await.unwrap();
    aggregator.sort_by(RankMetric::DealsClosed).await;
    aggregator.sort_by(RankMetric::DealsClosed).await;

    let ranks: Vec<u32> = aggregator
        .ranked_performers()
        .await
        .iter()
        .map(|p| p.rank)
        .collect();
    assert_eq!(ranks, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_rows() {
    let app = TestApp::new();
    app.sales_user("Alice", &[10.0], 0);
    let aggregator = app.aggregator();
    aggregator.refresh().await.unwrap();

    app.store.faults().set_fail_reads(true);
    assert!(aggregator.refresh().await.is_err());
    assert_eq!(aggregator.status().await, LeaderboardStatus::Failed);
    assert_eq!(aggregator.ranked_performers().await.len(), 1);

    app.store.faults().heal();
    aggregator.refresh().await.unwrap();
    assert_eq!(aggregator.status().await, LeaderboardStatus::Ready);
}

#[tokio::test]
async fn test_demo_fixture_leaderboard() {
    let fixture = StoreFixture::load("data/demo.json").await.unwrap();
    let config = salesdesk_core::config::AppConfig::default();
    let store = MemoryDocumentStore::with_fixture(&StoreConfig::default(), fixture);
    let aggregator = RankAggregator::new(Arc::new(store), config.leaderboard);
    aggregator.refresh().await.unwrap();

    let ranked = aggregator.ranked_performers().await;
    assert_eq!(ranked.len(), 3);
    let ranks: Vec<u32> = ranked.iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 1, 3]);
    assert_eq!(ranked[2].name, "Carol Jensen");
}
