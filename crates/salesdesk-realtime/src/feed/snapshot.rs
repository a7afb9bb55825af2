//! Feed snapshot: the normalised, ordered list and its unread count.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;

use salesdesk_core::types::id::NotificationId;
use salesdesk_entity::notification::{Notification, NotificationDocument};

/// One consistent view of a recipient's notifications.
///
/// Rebuilt from scratch on every live-query push: O(n log n) per push,
/// which is fine for the few hundred notifications a recipient holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Number of entries in `notifications` with `read == false`.
    pub unread_count: usize,
    /// Number of live-query pushes applied so far.
    pub revision: u64,
}

impl FeedSnapshot {
    /// The snapshot shown before the first push or after a failure.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild from the full result set of a live-query push.
    ///
    /// Missing timestamps become `now` and missing read flags become
    /// `false`. The store's order is ignored.
    pub fn rebuild(docs: Vec<NotificationDocument>, now: DateTime<Utc>, revision: u64) -> Self {
        let mut notifications: Vec<Notification> = docs
            .into_iter()
            .map(|doc| Notification::from_document(doc, now))
            .collect();
        notifications.sort_by_key(|n| Reverse(n.timestamp));
        let unread_count = count_unread(&notifications);
        Self {
            notifications,
            unread_count,
            revision,
        }
    }

    /// Ids of every unread notification, newest first.
    pub fn unread_ids(&self) -> Vec<NotificationId> {
        self.notifications
            .iter()
            .filter(|n| n.is_unread())
            .map(|n| n.id)
            .collect()
    }

    /// Look up a notification by id.
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Set the read flag on the given ids locally and recount. Used for
    /// optimistic updates; the next push overwrites it.
    pub fn apply_read(&mut self, ids: &[NotificationId], read: bool) {
        for n in self.notifications.iter_mut().filter(|n| ids.contains(&n.id)) {
            n.read = read;
        }
        self.unread_count = count_unread(&self.notifications);
    }

    /// Whether the snapshot has no notifications.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| n.is_unread()).count()
}
