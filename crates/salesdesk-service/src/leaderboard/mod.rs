//! Sales leaderboard: per-performer metrics, ranking, and rank write-back.

pub mod aggregator;
pub mod metrics;
pub mod ranking;

pub use aggregator::{LeaderboardStatus, RankAggregator, RankPersistReport, SortState};
