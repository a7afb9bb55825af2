//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salesdesk_core::types::id::UserId;

use super::role::UserRole;

/// A user document. Only the fields the leaderboard reads or writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Portal role.
    pub role: UserRole,
    /// Last leaderboard rank written back by the aggregator.
    #[serde(default)]
    pub rank: Option<u32>,
    /// When `rank` was last written.
    #[serde(default)]
    pub rank_updated_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Create a user with no rank yet.
    pub fn new(name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            role,
            rank: None,
            rank_updated_at: None,
        }
    }
}
