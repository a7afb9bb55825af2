//! Notification priority levels.

use serde::{Deserialize, Serialize};

/// Display priority attached by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// Background information.
    Low,
    /// Standard notification.
    Medium,
    /// Needs prompt attention.
    High,
}

impl NotificationPriority {
    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
