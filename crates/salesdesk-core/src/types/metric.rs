//! Leaderboard metric keys.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Metric a leaderboard is sorted and ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    /// Sum of closed-won deal budgets.
    Revenue,
    /// Number of closed-won deals.
    DealsClosed,
    /// Closed-won deals as a percentage of all deals.
    ConversionRate,
}

impl Default for RankMetric {
    fn default() -> Self {
        Self::Revenue
    }
}

impl RankMetric {
    /// Return the metric as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::DealsClosed => "deals_closed",
            Self::ConversionRate => "conversion_rate",
        }
    }
}

impl std::fmt::Display for RankMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RankMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "revenue" => Ok(Self::Revenue),
            "deals" | "deals_closed" => Ok(Self::DealsClosed),
            "conversion" | "conversion_rate" => Ok(Self::ConversionRate),
            other => Err(AppError::validation(format!(
                "Unknown leaderboard metric '{other}'"
            ))),
        }
    }
}
