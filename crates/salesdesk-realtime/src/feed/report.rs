//! Outcome of a best-effort batch of writes.

use salesdesk_core::error::AppError;
use salesdesk_core::types::id::NotificationId;

/// Result of [`mark_all_read`](super::live::NotificationFeed::mark_all_read).
///
/// Failed writes are not rolled back; the succeeded ones stay applied.
#[derive(Debug, Clone, Default)]
pub struct BatchWriteReport {
    /// Number of writes issued.
    pub attempted: usize,
    /// Number of writes that succeeded.
    pub succeeded: usize,
    /// Writes that failed, with their errors.
    pub failed: Vec<(NotificationId, AppError)>,
}

impl BatchWriteReport {
    /// Whether every write succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
