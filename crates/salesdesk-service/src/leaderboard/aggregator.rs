//! Rank aggregator: fetch, compute, rank, and write back.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use salesdesk_core::config::leaderboard::LeaderboardConfig;
use salesdesk_core::error::AppError;
use salesdesk_core::result::AppResult;
use salesdesk_core::types::id::UserId;
use salesdesk_core::types::{RankMetric, SortDirection};
use salesdesk_entity::performer::Performer;
use salesdesk_entity::user::UserRole;
use salesdesk_store::traits::PerformanceStore;

use super::metrics::compute_performer;
use super::ranking;

/// Lifecycle of the leaderboard data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardStatus {
    /// No fetch has completed yet.
    Loading,
    /// Performers are ranked and current.
    Ready,
    /// The last fetch failed.
    Failed,
}

/// Active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// Metric to sort and rank by.
    pub metric: RankMetric,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortState {
    /// The state after the user selects `metric`: the same metric flips
    /// direction, a new metric starts descending.
    pub fn select(self, metric: RankMetric) -> Self {
        if metric == self.metric {
            Self {
                metric,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                metric,
                direction: SortDirection::Desc,
            }
        }
    }
}

/// Outcome of writing ranks back onto user records.
#[derive(Debug, Clone, Default)]
pub struct RankPersistReport {
    /// Number of writes issued.
    pub attempted: usize,
    /// Number of writes that succeeded.
    pub succeeded: usize,
    /// Writes that failed, with their errors.
    pub failed: Vec<(UserId, AppError)>,
}

impl RankPersistReport {
    /// Whether every write succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
struct LeaderboardState {
    performers: Vec<Performer>,
    sort: SortState,
    status: LeaderboardStatus,
}

/// Computes and ranks the sales leaderboard.
#[derive(Debug)]
pub struct RankAggregator {
    /// Users and deals store.
    store: Arc<dyn PerformanceStore>,
    /// Ranking settings.
    config: LeaderboardConfig,
    /// Current ranked list and sort.
    state: RwLock<LeaderboardState>,
}

impl RankAggregator {
    /// Create an aggregator sorted by the configured default metric.
    pub fn new(store: Arc<dyn PerformanceStore>, config: LeaderboardConfig) -> Self {
        let sort = SortState {
            metric: config.default_metric,
            direction: SortDirection::Desc,
        };
        Self {
            store,
            config,
            state: RwLock::new(LeaderboardState {
                performers: Vec::new(),
                sort,
                status: LeaderboardStatus::Loading,
            }),
        }
    }

    /// The ranked performers in display order.
    pub async fn ranked_performers(&self) -> Vec<Performer> {
        self.state.read().await.performers.clone()
    }

    /// Current data status.
    pub async fn status(&self) -> LeaderboardStatus {
        self.state.read().await.status
    }

    /// Current sort.
    pub async fn sort_state(&self) -> SortState {
        self.state.read().await.sort
    }

    /// Fetch the roster and deals, compute metrics, rank with the active
    /// sort, and write ranks back.
    ///
    /// A fetch failure is logged, marks the leaderboard failed, and is
    /// returned; the previous list stays in place.
    pub async fn refresh(&self) -> AppResult<RankPersistReport> {
        let performers = match self.fetch_performers().await {
            Ok(p) => p,
            Err(e) => {
                error!("Leaderboard refresh failed: {}", e);
                self.state.write().await.status = LeaderboardStatus::Failed;
                return Err(e);
            }
        };

        let ranked = {
            let mut state = self.state.write().await;
            state.performers = ranking::rank(
                performers,
                state.sort.metric,
                state.sort.direction,
                self.config.ascending_rank_mode,
            );
            state.status = LeaderboardStatus::Ready;
            info!(
                performers = state.performers.len(),
                metric = %state.sort.metric,
                direction = %state.sort.direction,
                "Leaderboard refreshed"
            );
            state.performers.clone()
        };

        Ok(self.persist_ranks(&ranked).await)
    }

    /// Re-sort by `metric`. Selecting the active metric again flips the
    /// direction. Ranks are recomputed and written back, whatever the
    /// status, so the rows always match the sort state.
    pub async fn sort_by(&self, metric: RankMetric) -> RankPersistReport {
        let ranked = {
            let mut state = self.state.write().await;
            state.sort = state.sort.select(metric);
            debug!(
                metric = %state.sort.metric,
                direction = %state.sort.direction,
                "Leaderboard sort changed"
            );

            // Rows kept from before a failed refresh are re-sorted too.
            if state.performers.is_empty() {
                return RankPersistReport::default();
            }

            let current = std::mem::take(&mut state.performers);
            state.performers = ranking::rank(
                current,
                state.sort.metric,
                state.sort.direction,
                self.config.ascending_rank_mode,
            );
            state.performers.clone()
        };

        self.persist_ranks(&ranked).await
    }

    async fn fetch_performers(&self) -> AppResult<Vec<Performer>> {
        let roster = self
            .store
            .list_users_by_role(UserRole::Sales, self.config.roster_limit)
            .await?;
        debug!(count = roster.len(), "Fetched leaderboard roster");

        let deal_lists = join_all(roster.iter().map(|u| self.store.find_deals_for(u.id))).await;

        roster
            .iter()
            .zip(deal_lists)
            .map(|(user, deals)| deals.map(|deals| compute_performer(user, &deals)))
            .collect()
    }

    /// Write every rank concurrently. Failures are logged and reported,
    /// never retried.
    async fn persist_ranks(&self, ranked: &[Performer]) -> RankPersistReport {
        let updated_at = Utc::now();
        let handles: Vec<_> = ranked
            .iter()
            .map(|p| {
                let store = Arc::clone(&self.store);
                let (user_id, rank) = (p.user_id, p.rank);
                tokio::spawn(async move { store.update_rank(user_id, rank, updated_at).await })
            })
            .collect();
        let results = join_all(handles).await;

        let mut report = RankPersistReport {
            attempted: ranked.len(),
            ..Default::default()
        };
        for (p, result) in ranked.iter().zip(results) {
            let result = result.unwrap_or_else(|e| {
                Err(AppError::internal(format!("Rank write task failed: {e}")))
            });
            match result {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!(user_id = %p.user_id, rank = p.rank, "Failed to persist rank: {}", e);
                    report.failed.push((p.user_id, e));
                }
            }
        }
        if !report.is_complete() {
            warn!(
                succeeded = report.succeeded,
                failed = report.failed.len(),
                "Rank persistence partially failed"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesdesk_core::config::store::StoreConfig;
    use salesdesk_entity::deal::DealRecord;
    use salesdesk_entity::user::UserRecord;
    use salesdesk_store::MemoryDocumentStore;

    fn seeded() -> (MemoryDocumentStore, Vec<UserId>) {
        let store = MemoryDocumentStore::new(&StoreConfig::default());
        let mut ids = Vec::new();
        for (name, won, lost) in [("Alice", 5000.0, 1), ("Bob", 5000.0, 0), ("Carol", 3000.0, 3)] {
            let user = UserRecord::new(name, UserRole::Sales);
            ids.push(user.id);
            store.put_deal(DealRecord::new(user.id, "closed-won", won));
            for _ in 0..lost {
                store.put_deal(DealRecord::new(user.id, "closed-lost", 100.0));
            }
            store.put_user(user);
        }
        store.put_user(UserRecord::new("Mia", UserRole::Marketing));
        (store, ids)
    }

    #[tokio::test]
    async fn test_refresh_ranks_and_persists() {
        let (store, ids) = seeded();
        let aggregator = RankAggregator::new(Arc::new(store.clone()), LeaderboardConfig::default());
        assert_eq!(aggregator.status().await, LeaderboardStatus::Loading);

        let report = aggregator.refresh().await.unwrap();
        assert_eq!(report.attempted, 3);
        assert!(report.is_complete());

        let ranked = aggregator.ranked_performers().await;
        let rows: Vec<(&str, u32)> = ranked.iter().map(|p| (p.name.as_str(), p.rank)).collect();
        assert_eq!(rows, vec![("Alice", 1), ("Bob", 1), ("Carol", 3)]);

        let carol = store.find_user(ids[2]).await.unwrap().unwrap();
        assert_eq!(carol.rank, Some(3));
        assert!(carol.rank_updated_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_marks_failed() {
        let (store, _) = seeded();
        store.faults().set_fail_reads(true);
        let aggregator = RankAggregator::new(Arc::new(store), LeaderboardConfig::default());
        assert!(aggregator.refresh().await.is_err());
        assert_eq!(aggregator.status().await, LeaderboardStatus::Failed);
        assert!(aggregator.ranked_performers().await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_rank_write_failure_is_tolerated() {
        let (store, ids) = seeded();
        store.faults().fail_rank_write(ids[1]);
        let aggregator = RankAggregator::new(Arc::new(store.clone()), LeaderboardConfig::default());
        let report = aggregator.refresh().await.unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ids[1]);
        assert_eq!(store.find_user(ids[0]).await.unwrap().unwrap().rank, Some(1));
        assert_eq!(store.find_user(ids[1]).await.unwrap().unwrap().rank, None);
    }

    #[tokio::test]
    async fn test_sort_by_other_metric_starts_descending() {
        let (store, _) = seeded();
        let aggregator = RankAggregator::new(Arc::new(store), LeaderboardConfig::default());
        aggregator.refresh().await.unwrap();

        aggregator.sort_by(RankMetric::ConversionRate).await;
        let sort = aggregator.sort_state().await;
        assert_eq!(sort.direction, SortDirection::Desc);

        // Bob 100%, Alice 50%, Carol 25%.
        let ranked = aggregator.ranked_performers().await;
        let rows: Vec<(&str, u32)> = ranked.iter().map(|p| (p.name.as_str(), p.rank)).collect();
        assert_eq!(rows, vec![("Bob", 1), ("Alice", 2), ("Carol", 3)]);
    }

    #[tokio::test]
    async fn test_sort_after_failed_refresh_reorders_kept_rows() {
        let (store, ids) = seeded();
        let aggregator = RankAggregator::new(Arc::new(store.clone()), LeaderboardConfig::default());
        aggregator.refresh().await.unwrap();

        store.faults().set_fail_reads(true);
        assert!(aggregator.refresh().await.is_err());
        assert_eq!(aggregator.status().await, LeaderboardStatus::Failed);

        let report = aggregator.sort_by(RankMetric::Revenue).await;
        assert_eq!(report.attempted, 3);
        assert_eq!(aggregator.sort_state().await.direction, SortDirection::Asc);
        assert_eq!(aggregator.status().await, LeaderboardStatus::Failed);

        let ranked = aggregator.ranked_performers().await;
        let rows: Vec<(&str, u32)> = ranked.iter().map(|p| (p.name.as_str(), p.rank)).collect();
        assert_eq!(rows, vec![("Carol", 1), ("Bob", 2), ("Alice", 3)]);
        store.faults().heal();
        assert_eq!(store.find_user(ids[2]).await.unwrap().unwrap().rank, Some(1));
    }

    #[tokio::test]
    async fn test_sort_before_any_data_only_changes_state() {
        let (store, _) = seeded();
        let aggregator = RankAggregator::new(Arc::new(store), LeaderboardConfig::default());
        let report = aggregator.sort_by(RankMetric::DealsClosed).await;
        assert_eq!(report.attempted, 0);
        assert_eq!(aggregator.sort_state().await.metric, RankMetric::DealsClosed);
        assert!(aggregator.ranked_performers().await.is_empty());
    }

    #[test]
    fn test_select_toggles_same_metric() {
        let sort = SortState {
            metric: RankMetric::Revenue,
            direction: SortDirection::Desc,
        };
        let once = sort.select(RankMetric::Revenue);
        assert_eq!(once.direction, SortDirection::Asc);
        assert_eq!(once.select(RankMetric::Revenue).direction, SortDirection::Desc);
        assert_eq!(once.select(RankMetric::DealsClosed).direction, SortDirection::Desc);
    }
}
