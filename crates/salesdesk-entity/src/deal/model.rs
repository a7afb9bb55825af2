//! Deal entity model.

use serde::{Deserialize, Serialize};

use salesdesk_core::types::id::{DealId, UserId};

use super::status::DealStatus;

/// A deal/lead document assigned to a sales user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    /// Unique deal identifier.
    pub id: DealId,
    /// The sales user who owns the deal.
    pub assigned_to: UserId,
    /// Pipeline status.
    pub status: DealStatus,
    /// Deal value. Missing budgets count as zero.
    #[serde(default)]
    pub budget: f64,
}

impl DealRecord {
    /// Create a deal for the given owner.
    pub fn new(assigned_to: UserId, status: impl Into<String>, budget: f64) -> Self {
        Self {
            id: DealId::new(),
            assigned_to,
            status: DealStatus::from(status.into()),
            budget,
        }
    }
}
