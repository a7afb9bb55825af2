//! Notification collection contract.

use async_trait::async_trait;

use salesdesk_core::result::AppResult;
use salesdesk_core::types::id::{NotificationId, UserId};
use salesdesk_entity::notification::{NotificationDocument, NotificationDraft};

use crate::live::LiveQuery;

/// Access to the `notifications` collection.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a live query for `userId == user_id`. Fails when the caller
    /// may not read the recipient's notifications.
    async fn subscribe_user(&self, user_id: UserId) -> AppResult<LiveQuery<NotificationDocument>>;

    /// One-shot fetch of the recipient's notifications, unordered.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<NotificationDocument>>;

    /// Set the read flag on one document. Setting the current value again
    /// succeeds without a change.
    async fn set_read(&self, id: NotificationId, read: bool) -> AppResult<()>;

    /// Create a notification on behalf of an external producer.
    async fn insert(&self, draft: NotificationDraft) -> AppResult<NotificationId>;
}
