//! In-memory document store with live queries.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use salesdesk_core::config::store::StoreConfig;
use salesdesk_core::error::AppError;
use salesdesk_core::result::AppResult;
use salesdesk_core::types::id::{DealId, NotificationId, UserId};
use salesdesk_entity::deal::DealRecord;
use salesdesk_entity::notification::{NotificationDocument, NotificationDraft};
use salesdesk_entity::user::{UserRecord, UserRole};

use crate::fixture::StoreFixture;
use crate::live::LiveQuery;
use crate::traits::{NotificationStore, PerformanceStore};

use super::faults::FaultInjector;

/// Change events that drive live queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeEvent {
    /// The recipient's notification set changed.
    Notifications(UserId),
    /// Read access to the recipient's notifications was withdrawn.
    AccessRevoked(UserId),
}

/// A document plus its insertion sequence, used for stable store order.
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    doc: T,
}

#[derive(Debug)]
struct Inner {
    notifications: DashMap<NotificationId, Stored<NotificationDocument>>,
    users: DashMap<UserId, Stored<UserRecord>>,
    deals: DashMap<DealId, Stored<DealRecord>>,
    seq: AtomicU64,
    changes: broadcast::Sender<ChangeEvent>,
    faults: FaultInjector,
}

/// In-memory stand-in for the hosted document store.
///
/// Cloning is cheap; clones share the same collections.
#[derive(Debug, Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new(config: &StoreConfig) -> Self {
        let (changes, _) = broadcast::channel(config.change_buffer.max(1));
        Self {
            inner: Arc::new(Inner {
                notifications: DashMap::new(),
                users: DashMap::new(),
                deals: DashMap::new(),
                seq: AtomicU64::new(0),
                changes,
                faults: FaultInjector::new(),
            }),
        }
    }

    /// Create a store seeded from a fixture.
    pub fn with_fixture(config: &StoreConfig, fixture: StoreFixture) -> Self {
        let store = Self::new(config);
        store.seed(fixture);
        store
    }

    /// Load the configured fixture file, or start empty when none is set.
    pub async fn from_config(config: &StoreConfig) -> AppResult<Self> {
        match &config.fixture {
            Some(path) => {
                let fixture = StoreFixture::load(path).await?;
                Ok(Self::with_fixture(config, fixture))
            }
            None => Ok(Self::new(config)),
        }
    }

    /// Insert every document from a fixture, preserving fixture order.
    pub fn seed(&self, fixture: StoreFixture) {
        debug!(
            users = fixture.users.len(),
            deals = fixture.deals.len(),
            notifications = fixture.notifications.len(),
            "Seeding in-memory store"
        );
        for user in fixture.users {
            self.put_user(user);
        }
        for deal in fixture.deals {
            self.put_deal(deal);
        }
        for doc in fixture.notifications {
            self.put_notification(doc);
        }
    }

    /// Fault switchboard for this store.
    pub fn faults(&self) -> &FaultInjector {
        &self.inner.faults
    }

    /// Insert or replace a user document.
    pub fn put_user(&self, user: UserRecord) {
        let seq = self.next_seq();
        self.inner.users.insert(user.id, Stored { seq, doc: user });
    }

    /// Insert or replace a deal document.
    pub fn put_deal(&self, deal: DealRecord) {
        let seq = self.next_seq();
        self.inner.deals.insert(deal.id, Stored { seq, doc: deal });
    }

    /// Insert or replace a raw notification document and notify its
    /// recipient's live queries.
    pub fn put_notification(&self, doc: NotificationDocument) {
        let seq = self.next_seq();
        let user_id = doc.user_id;
        self.inner.notifications.insert(doc.id, Stored { seq, doc });
        self.publish(ChangeEvent::Notifications(user_id));
    }

    /// Withdraw read access to a recipient's notifications. Open live
    /// queries receive an error and end; new subscriptions are denied.
    pub fn revoke_access(&self, user_id: UserId) {
        self.inner.faults.deny_user(user_id);
        self.publish(ChangeEvent::AccessRevoked(user_id));
    }

    /// Current read flag of a stored notification, as stored.
    pub fn read_flag(&self, id: NotificationId) -> Option<Option<bool>> {
        self.inner.notifications.get(&id).map(|n| n.doc.read)
    }

    fn next_seq(&self) -> u64 {
        self.inner.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn publish(&self, event: ChangeEvent) {
        // No receivers simply means no live queries are open.
        let receivers = self.inner.changes.send(event).unwrap_or(0);
        trace!(?event, receivers, "Published store change");
    }

    fn query_user(&self, user_id: UserId) -> Vec<NotificationDocument> {
        let mut rows: Vec<Stored<NotificationDocument>> = self
            .inner
            .notifications
            .iter()
            .filter(|entry| entry.value().doc.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.seq);
        rows.into_iter().map(|row| row.doc).collect()
    }

    fn live_query(&self, user_id: UserId) -> LiveQuery<NotificationDocument> {
        struct LiveState {
            store: MemoryDocumentStore,
            user_id: UserId,
            rx: broadcast::Receiver<ChangeEvent>,
            primed: bool,
            done: bool,
        }

        // Subscribe before the first read so no change can slip between them.
        let state = LiveState {
            store: self.clone(),
            user_id,
            rx: self.inner.changes.subscribe(),
            primed: false,
            done: false,
        };

        futures::stream::unfold(state, |mut st| async move {
            if st.done {
                return None;
            }
            if !st.primed {
                st.primed = true;
                let docs = st.store.query_user(st.user_id);
                return Some((Ok(docs), st));
            }
            loop {
                match st.rx.recv().await {
                    Ok(ChangeEvent::Notifications(uid)) if uid == st.user_id => {
                        let docs = st.store.query_user(st.user_id);
                        return Some((Ok(docs), st));
                    }
                    Ok(ChangeEvent::AccessRevoked(uid)) if uid == st.user_id => {
                        st.done = true;
                        let err = AppError::authorization(format!(
                            "Read access to notifications of user {uid} was revoked"
                        ));
                        return Some((Err(err), st));
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(
                            user_id = %st.user_id,
                            skipped,
                            "Live query lagged; resending full result set"
                        );
                        let docs = st.store.query_user(st.user_id);
                        return Some((Ok(docs), st));
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

#[async_trait]
impl NotificationStore for MemoryDocumentStore {
    async fn subscribe_user(&self, user_id: UserId) -> AppResult<LiveQuery<NotificationDocument>> {
        if self.inner.faults.is_denied(user_id) {
            return Err(AppError::authorization(format!(
                "Missing or insufficient permissions to read notifications of user {user_id}"
            )));
        }
        debug!(%user_id, "Opening live notification query");
        Ok(self.live_query(user_id))
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<NotificationDocument>> {
        if self.inner.faults.is_denied(user_id) {
            return Err(AppError::authorization(format!(
                "Missing or insufficient permissions to read notifications of user {user_id}"
            )));
        }
        Ok(self.query_user(user_id))
    }

    async fn set_read(&self, id: NotificationId, read: bool) -> AppResult<()> {
        if self.inner.faults.notification_write_fails(id) {
            return Err(AppError::store(format!(
                "Write to notification {id} was rejected by the backend"
            )));
        }

        let (user_id, changed) = {
            let mut entry = self
                .inner
                .notifications
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
            let changed = entry.doc.read != Some(read);
            entry.doc.read = Some(read);
            (entry.doc.user_id, changed)
        };

        if changed {
            self.publish(ChangeEvent::Notifications(user_id));
        }
        Ok(())
    }

    async fn insert(&self, draft: NotificationDraft) -> AppResult<NotificationId> {
        let id = NotificationId::new();
        let mut doc = draft.into_document(id);
        if doc.timestamp.is_none() {
            doc.timestamp = Some(Utc::now());
        }
        self.put_notification(doc);
        Ok(id)
    }
}

#[async_trait]
impl PerformanceStore for MemoryDocumentStore {
    async fn list_users_by_role(&self, role: UserRole, limit: usize) -> AppResult<Vec<UserRecord>> {
        if self.inner.faults.reads_fail() {
            return Err(AppError::service_unavailable("User roster read failed"));
        }
        let mut rows: Vec<Stored<UserRecord>> = self
            .inner
            .users
            .iter()
            .filter(|entry| entry.value().doc.role == role)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.seq);
        Ok(rows.into_iter().take(limit).map(|row| row.doc).collect())
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        if self.inner.faults.reads_fail() {
            return Err(AppError::service_unavailable("User read failed"));
        }
        Ok(self.inner.users.get(&user_id).map(|u| u.doc.clone()))
    }

    async fn find_deals_for(&self, user_id: UserId) -> AppResult<Vec<DealRecord>> {
        if self.inner.faults.reads_fail() {
            return Err(AppError::service_unavailable(format!(
                "Deal read for user {user_id} failed"
            )));
        }
        let mut rows: Vec<Stored<DealRecord>> = self
            .inner
            .deals
            .iter()
            .filter(|entry| entry.value().doc.assigned_to == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.seq);
        Ok(rows.into_iter().map(|row| row.doc).collect())
    }

    async fn update_rank(
        &self,
        user_id: UserId,
        rank: u32,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.inner.faults.rank_write_fails(user_id) {
            return Err(AppError::store(format!(
                "Rank write for user {user_id} was rejected by the backend"
            )));
        }
        let mut entry = self
            .inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
        entry.doc.rank = Some(rank);
        entry.doc.rank_updated_at = Some(updated_at);
        Ok(())
    }
}
