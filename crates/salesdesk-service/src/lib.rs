//! # salesdesk-service
//!
//! Business logic service layer for SalesDesk. Services receive their
//! store dependencies as `Arc` trait objects at construction time.

pub mod leaderboard;

pub use leaderboard::{LeaderboardStatus, RankAggregator, RankPersistReport, SortState};
