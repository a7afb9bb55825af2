//! Shared test helpers for integration tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use salesdesk_core::config::AppConfig;
use salesdesk_core::types::id::{NotificationId, UserId};
use salesdesk_entity::deal::DealRecord;
use salesdesk_entity::notification::NotificationDraft;
use salesdesk_entity::user::{UserRecord, UserRole};
use salesdesk_realtime::NotificationFeed;
use salesdesk_service::RankAggregator;
use salesdesk_store::MemoryDocumentStore;
use salesdesk_store::traits::NotificationStore;

/// Test application context
pub struct TestApp {
    /// Shared in-memory store
    pub store: MemoryDocumentStore,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create an app with an empty store and default config
    pub fn new() -> Self {
        let config = AppConfig::default();
        let store = MemoryDocumentStore::new(&config.store);
        Self { store, config }
    }

    /// Insert `count` unread notifications for `user`, oldest last
    pub async fn seed_unread(&self, user: UserId, count: usize) -> Vec<NotificationId> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let draft = NotificationDraft::new(user, "lead", format!("Lead #{i}"))
                .at(Utc::now() - Duration::minutes(10 * (i as i64 + 1)));
            ids.push(self.store.insert(draft).await.expect("insert notification"));
        }
        ids
    }

    /// Subscribe a feed and wait for its first snapshot
    pub async fn feed_for(&self, user: UserId) -> NotificationFeed {
        let feed = NotificationFeed::subscribe(
            Arc::new(self.store.clone()),
            user,
            self.config.feed.clone(),
        )
        .await;
        feed.wait_until(|s| s.revision >= 1).await;
        feed
    }

    /// Create a sales user whose closed-won deals sum to `revenue`
    pub fn sales_user(&self, name: &str, won_budgets: &[f64], other_deals: usize) -> UserId {
        let user = UserRecord::new(name, UserRole::Sales);
        let id = user.id;
        self.store.put_user(user);
        for budget in won_budgets {
            self.store.put_deal(DealRecord::new(id, "closed-won", *budget));
        }
        for _ in 0..other_deals {
            self.store.put_deal(DealRecord::new(id, "negotiation", 250.0));
        }
        id
    }

    /// Build a leaderboard aggregator over the store
    pub fn aggregator(&self) -> RankAggregator {
        RankAggregator::new(Arc::new(self.store.clone()), self.config.leaderboard.clone())
    }
}
