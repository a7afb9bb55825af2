//! JSON fixtures for seeding a store.

use serde::{Deserialize, Serialize};
use tracing::info;

use salesdesk_core::error::AppError;
use salesdesk_core::result::AppResult;
use salesdesk_entity::deal::DealRecord;
use salesdesk_entity::notification::NotificationDocument;
use salesdesk_entity::user::UserRecord;

/// Documents to preload into a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFixture {
    /// User documents.
    #[serde(default)]
    pub users: Vec<UserRecord>,
    /// Deal documents.
    #[serde(default)]
    pub deals: Vec<DealRecord>,
    /// Notification documents. `read` and `timestamp` may be omitted.
    #[serde(default)]
    pub notifications: Vec<NotificationDocument>,
}

impl StoreFixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a fixture file.
    pub async fn load(path: &str) -> AppResult<Self> {
        info!("Loading store fixture from '{}'", path);
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                salesdesk_core::error::ErrorKind::Configuration,
                format!("Cannot read fixture '{path}'"),
                e,
            )
        })?;
        Self::from_json(&text)
    }
}
