//! Live notification feed for one recipient.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use dashmap::DashSet;
use futures::StreamExt;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use salesdesk_core::config::feed::FeedConfig;
use salesdesk_core::error::{AppError, ErrorKind};
use salesdesk_core::result::AppResult;
use salesdesk_core::types::PageResponse;
use salesdesk_core::types::id::{NotificationId, UserId};
use salesdesk_entity::notification::{Notification, NotificationDocument};
use salesdesk_store::live::LiveQuery;
use salesdesk_store::traits::NotificationStore;

use super::report::BatchWriteReport;
use super::snapshot::FeedSnapshot;
use super::view::{self, FeedQuery};

/// A recipient's live notification feed.
///
/// Holds the latest [`FeedSnapshot`], rebuilt in full on every live-query
/// push. Read-state writes go straight to the store; the resulting push
/// brings the snapshot back in line with server truth. Dropping the feed
/// tears down the live query.
#[derive(Debug)]
pub struct NotificationFeed {
    /// The recipient.
    user_id: UserId,
    /// Backing store.
    store: Arc<dyn NotificationStore>,
    /// Feed settings.
    config: FeedConfig,
    /// Latest snapshot; receivers observe every replacement.
    snapshot: Arc<watch::Sender<FeedSnapshot>>,
    /// Locally archived ids. Never persisted.
    archived: DashSet<NotificationId>,
    /// Cancels the live-query task.
    cancel: CancellationToken,
    /// The live-query task, if the subscription was established.
    task: Mutex<Option<JoinHandle<()>>>,
    /// Why the subscription failed, once it has.
    failure: Arc<Mutex<Option<AppError>>>,
}

impl NotificationFeed {
    /// Subscribe to the recipient's notifications.
    ///
    /// Never fails: if the store refuses the subscription the error is
    /// logged and the feed stays empty.
    pub async fn subscribe(
        store: Arc<dyn NotificationStore>,
        user_id: UserId,
        config: FeedConfig,
    ) -> Self {
        let (tx, _) = watch::channel(FeedSnapshot::empty());
        let snapshot = Arc::new(tx);
        let cancel = CancellationToken::new();
        let failure = Arc::new(Mutex::new(None));

        let task = match store.subscribe_user(user_id).await {
            Ok(live) => {
                info!(%user_id, "Notification feed subscribed");
                Some(tokio::spawn(run_live_query(
                    live,
                    Arc::clone(&snapshot),
                    Arc::clone(&failure),
                    cancel.clone(),
                    user_id,
                    config.large_snapshot_warning,
                )))
            }
            Err(e) => {
                error!(%user_id, "Failed to subscribe to notifications: {}", e);
                record_failure(&failure, user_id, e);
                None
            }
        };

        Self {
            user_id,
            store,
            config,
            snapshot,
            archived: DashSet::new(),
            cancel,
            task: Mutex::new(task),
            failure,
        }
    }

    /// The recipient this feed belongs to.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot.borrow().clone()
    }

    /// The current notifications, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.snapshot.borrow().notifications.clone()
    }

    /// The current unread count.
    pub fn unread_count(&self) -> usize {
        self.snapshot.borrow().unread_count
    }

    /// A receiver that observes every snapshot replacement.
    pub fn watch(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot.subscribe()
    }

    /// Wait until the snapshot satisfies `predicate` and return it.
    pub async fn wait_until<F>(&self, mut predicate: F) -> FeedSnapshot
    where
        F: FnMut(&FeedSnapshot) -> bool,
    {
        let mut rx = self.snapshot.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        match rx.wait_for(|s| predicate(s)).await {
            Ok(s) => s.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Whether the live query is still running.
    pub fn is_live(&self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// The subscription failure that emptied this feed, if any.
    pub fn subscription_error(&self) -> Option<AppError> {
        self.failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Mark one notification as read. Marking an already-read notification
    /// succeeds without effect.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.set_read(id, true).await
    }

    /// Mark one notification as unread. This is an explicit user action.
    pub async fn mark_unread(&self, id: NotificationId) -> AppResult<()> {
        self.set_read(id, false).await
    }

    /// Mark every currently unread notification as read.
    ///
    /// One write per notification, all issued concurrently. Failures are
    /// logged and reported but not retried or rolled back.
    pub async fn mark_all_read(&self) -> BatchWriteReport {
        let unread = self.snapshot.borrow().unread_ids();
        if unread.is_empty() {
            debug!(user_id = %self.user_id, "No unread notifications to mark");
            return BatchWriteReport::default();
        }

        if self.config.optimistic_updates {
            self.patch_local(&unread, true);
        }

        let handles: Vec<_> = unread
            .iter()
            .map(|id| spawn_write(Arc::clone(&self.store), *id, true))
            .collect();
        let results = join_all(handles).await;

        let mut report = BatchWriteReport {
            attempted: unread.len(),
            ..Default::default()
        };
        for (id, result) in unread.into_iter().zip(results) {
            let result = result.unwrap_or_else(|e| {
                Err(AppError::internal(format!("Write task for {id} failed: {e}")))
            });
            match result {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!(
                        user_id = %self.user_id,
                        notification_id = %id,
                        "Failed to mark notification read: {}",
                        e
                    );
                    report.failed.push((id, e));
                }
            }
        }

        if report.is_complete() {
            info!(
                user_id = %self.user_id,
                count = report.succeeded,
                "Marked all notifications read"
            );
        } else {
            warn!(
                user_id = %self.user_id,
                succeeded = report.succeeded,
                failed = report.failed.len(),
                "Mark-all-read partially failed"
            );
            if self.config.optimistic_updates {
                self.reconcile().await;
            }
        }
        report
    }

    /// Replace the snapshot with a one-shot fetch from the store.
    pub async fn reconcile(&self) {
        match self.store.find_by_user(self.user_id).await {
            Ok(docs) => {
                let revision = self.snapshot.borrow().revision;
                publish(
                    &self.snapshot,
                    docs,
                    revision,
                    self.config.large_snapshot_warning,
                    self.user_id,
                );
            }
            Err(e) => {
                warn!(user_id = %self.user_id, "Failed to reconcile notification feed: {}", e);
            }
        }
    }

    /// Hide a notification from the feed view. Local only.
    pub fn archive(&self, id: NotificationId) {
        self.archived.insert(id);
    }

    /// Show a previously archived notification again.
    pub fn unarchive(&self, id: NotificationId) {
        self.archived.remove(&id);
    }

    /// Whether the notification is archived locally.
    pub fn is_archived(&self, id: NotificationId) -> bool {
        self.archived.contains(&id)
    }

    /// One page of the feed, filtered and searched.
    pub fn view(&self, query: &FeedQuery) -> PageResponse<Notification> {
        let snapshot = self.snapshot.borrow();
        view::apply(&snapshot, &self.archived, query)
    }

    /// One page with the configured page size and no filter.
    pub fn first_page(&self) -> PageResponse<Notification> {
        self.view(&FeedQuery::with_page_size(self.config.page_size))
    }

    /// Tear down the live query. The current snapshot is kept; writes
    /// already in flight still complete.
    pub fn unsubscribe(&self) {
        if !self.cancel.is_cancelled() {
            debug!(user_id = %self.user_id, "Notification feed unsubscribed");
            self.cancel.cancel();
        }
    }

    async fn set_read(&self, id: NotificationId, read: bool) -> AppResult<()> {
        if self.config.optimistic_updates {
            self.patch_local(&[id], read);
        }

        let result = spawn_write(Arc::clone(&self.store), id, read)
            .await
            .unwrap_or_else(|e| {
                Err(AppError::internal(format!("Write task for {id} failed: {e}")))
            });

        match result {
            Ok(()) => {
                debug!(user_id = %self.user_id, notification_id = %id, read, "Updated read flag");
                Ok(())
            }
            Err(e) => {
                warn!(
                    user_id = %self.user_id,
                    notification_id = %id,
                    read,
                    "Failed to update read flag: {}",
                    e
                );
                if self.config.optimistic_updates {
                    self.reconcile().await;
                }
                Err(e)
            }
        }
    }

    fn patch_local(&self, ids: &[NotificationId], read: bool) {
        self.snapshot.send_modify(|s| s.apply_read(ids, read));
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Issue a read-flag write on its own task so it completes even if the
/// caller stops waiting.
fn spawn_write(
    store: Arc<dyn NotificationStore>,
    id: NotificationId,
    read: bool,
) -> JoinHandle<AppResult<()>> {
    tokio::spawn(async move { store.set_read(id, read).await })
}

fn publish(
    snapshot: &watch::Sender<FeedSnapshot>,
    docs: Vec<NotificationDocument>,
    revision: u64,
    warn_at: usize,
    user_id: UserId,
) {
    if docs.len() > warn_at {
        warn!(%user_id, size = docs.len(), "Notification snapshot is unusually large");
    }
    snapshot.send_replace(FeedSnapshot::rebuild(docs, Utc::now(), revision));
}

/// Keep a subscription failure as a [`ErrorKind::Subscription`] error
/// with the store error as its cause.
fn record_failure(failure: &Mutex<Option<AppError>>, user_id: UserId, cause: AppError) {
    let message = format!(
        "Notification subscription for user {user_id} failed: {}",
        cause.message
    );
    let err = AppError::with_source(ErrorKind::Subscription, message, cause);
    *failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(err);
}

async fn run_live_query(
    mut live: LiveQuery<NotificationDocument>,
    snapshot: Arc<watch::Sender<FeedSnapshot>>,
    failure: Arc<Mutex<Option<AppError>>>,
    cancel: CancellationToken,
    user_id: UserId,
    warn_at: usize,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = live.next() => match next {
                Some(Ok(docs)) => {
                    let revision = snapshot.borrow().revision + 1;
                    publish(&snapshot, docs, revision, warn_at, user_id);
                }
                Some(Err(e)) => {
                    error!(%user_id, "Notification subscription failed: {}", e);
                    record_failure(&failure, user_id, e);
                    let revision = snapshot.borrow().revision + 1;
                    snapshot.send_replace(FeedSnapshot {
                        revision,
                        ..FeedSnapshot::empty()
                    });
                    break;
                }
                None => {
                    debug!(%user_id, "Notification live query ended");
                    break;
                }
            }
        }
    }
}
