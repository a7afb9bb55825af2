//! Simulated backend failures for the in-memory store.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashSet;

use salesdesk_core::types::id::{NotificationId, UserId};

/// Switchboard of failures the in-memory store reproduces.
#[derive(Debug, Default)]
pub struct FaultInjector {
    /// Recipients whose notifications may not be subscribed to.
    denied_users: DashSet<UserId>,
    /// Notification documents whose writes fail.
    failing_notifications: DashSet<NotificationId>,
    /// Users whose rank write-back fails.
    failing_rank_writes: DashSet<UserId>,
    /// Whether roster and deal reads fail.
    fail_reads: AtomicBool,
}

impl FaultInjector {
    /// Create an injector with no faults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny subscriptions to a recipient's notifications.
    pub fn deny_user(&self, user_id: UserId) {
        self.denied_users.insert(user_id);
    }

    /// Whether subscriptions to the recipient are denied.
    pub fn is_denied(&self, user_id: UserId) -> bool {
        self.denied_users.contains(&user_id)
    }

    /// Make writes to one notification fail.
    pub fn fail_notification_write(&self, id: NotificationId) {
        self.failing_notifications.insert(id);
    }

    /// Whether writes to the notification fail.
    pub fn notification_write_fails(&self, id: NotificationId) -> bool {
        self.failing_notifications.contains(&id)
    }

    /// Make rank write-back for one user fail.
    pub fn fail_rank_write(&self, user_id: UserId) {
        self.failing_rank_writes.insert(user_id);
    }

    /// Whether rank write-back for the user fails.
    pub fn rank_write_fails(&self, user_id: UserId) -> bool {
        self.failing_rank_writes.contains(&user_id)
    }

    /// Toggle failure of roster and deal reads.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Whether roster and deal reads fail.
    pub fn reads_fail(&self) -> bool {
        self.fail_reads.load(Ordering::SeqCst)
    }

    /// Clear every fault.
    pub fn heal(&self) {
        self.denied_users.clear();
        self.failing_notifications.clear();
        self.failing_rank_writes.clear();
        self.fail_reads.store(false, Ordering::SeqCst);
    }
}
