//! Users and deals contract used by the leaderboard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use salesdesk_core::result::AppResult;
use salesdesk_core::types::id::UserId;
use salesdesk_entity::deal::DealRecord;
use salesdesk_entity::user::{UserRecord, UserRole};

/// Access to the `users` and `deals` collections.
#[async_trait]
pub trait PerformanceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Users with the given role, at most `limit`, in store order.
    async fn list_users_by_role(&self, role: UserRole, limit: usize) -> AppResult<Vec<UserRecord>>;

    /// Fetch a single user.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// All deals assigned to the user, regardless of status.
    async fn find_deals_for(&self, user_id: UserId) -> AppResult<Vec<DealRecord>>;

    /// Write a computed rank and its timestamp onto the user record.
    async fn update_rank(
        &self,
        user_id: UserId,
        rank: u32,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;
}
