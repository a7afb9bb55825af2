//! Performer model.

use serde::{Deserialize, Serialize};

use salesdesk_core::types::RankMetric;
use salesdesk_core::types::id::UserId;

/// A sales user's computed leaderboard row. Derived, never stored;
/// only `rank` is written back onto the user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    /// The underlying user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Sum of closed-won budgets.
    pub revenue: f64,
    /// Number of closed-won deals.
    pub deals_closed: u32,
    /// Number of deals regardless of status.
    pub deals_total: u32,
    /// `deals_closed / deals_total * 100`, or 0 with no deals.
    pub conversion_rate: f64,
    /// Assigned rank (1-based). Zero until ranked.
    pub rank: u32,
}

impl Performer {
    /// The value of the given metric for this performer.
    pub fn metric(&self, metric: RankMetric) -> f64 {
        match metric {
            RankMetric::Revenue => self.revenue,
            RankMetric::DealsClosed => f64::from(self.deals_closed),
            RankMetric::ConversionRate => self.conversion_rate,
        }
    }
}
