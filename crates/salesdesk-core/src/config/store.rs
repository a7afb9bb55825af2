//! Document store configuration.

use serde::{Deserialize, Serialize};

/// Settings for the document store backing feeds and the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Optional JSON fixture to seed the in-memory store from.
    #[serde(default)]
    pub fixture: Option<String>,
    /// Buffer size of the change-notification channel that drives live queries.
    #[serde(default = "default_change_buffer")]
    pub change_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            change_buffer: default_change_buffer(),
        }
    }
}

fn default_change_buffer() -> usize {
    256
}
