//! Notification feed configuration.

use serde::{Deserialize, Serialize};

/// Live notification feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Default page size for the feed view.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Patch the local snapshot on read-state writes before the next
    /// live snapshot arrives.
    #[serde(default)]
    pub optimistic_updates: bool,
    /// Snapshot size above which a rebuild logs a warning.
    #[serde(default = "default_large_snapshot_warning")]
    pub large_snapshot_warning: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            optimistic_updates: false,
            large_snapshot_warning: default_large_snapshot_warning(),
        }
    }
}

fn default_page_size() -> u64 {
    20
}

fn default_large_snapshot_warning() -> usize {
    1000
}
