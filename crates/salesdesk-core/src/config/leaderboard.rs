//! Leaderboard ranking configuration.

use serde::{Deserialize, Serialize};

use crate::types::RankMetric;

/// How ranks are numbered when the leaderboard is sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AscendingRankMode {
    /// Reverse the descending list and number rows 1..n by position.
    Positional,
    /// Apply the same tie-sharing competition ranking used descending.
    Competition,
}

impl Default for AscendingRankMode {
    fn default() -> Self {
        Self::Positional
    }
}

/// Rank aggregator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Maximum number of performers fetched for the roster.
    #[serde(default = "default_roster_limit")]
    pub roster_limit: usize,
    /// Metric used before the user picks one.
    #[serde(default)]
    pub default_metric: RankMetric,
    /// Rank numbering for ascending order.
    #[serde(default)]
    pub ascending_rank_mode: AscendingRankMode,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            roster_limit: default_roster_limit(),
            default_metric: RankMetric::default(),
            ascending_rank_mode: AscendingRankMode::default(),
        }
    }
}

fn default_roster_limit() -> usize {
    50
}
