//! Auth-driven feed session: one live feed for whoever is signed in.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use salesdesk_core::config::feed::FeedConfig;
use salesdesk_core::traits::AuthProvider;
use salesdesk_core::types::id::UserId;
use salesdesk_store::traits::NotificationStore;

use crate::feed::live::NotificationFeed;

/// Keeps a [`NotificationFeed`] subscribed for the signed-in user.
///
/// On sign-in a feed is subscribed; on sign-out or a user switch the old
/// feed is torn down first. The user comes from the injected
/// [`AuthProvider`].
#[derive(Debug)]
pub struct FeedSession {
    /// The feed for the current user, if any.
    current: Arc<RwLock<Option<Arc<NotificationFeed>>>>,
    /// The user whose feed is currently installed.
    active_user: Arc<watch::Sender<Option<UserId>>>,
    /// Stops the auth watcher.
    cancel: CancellationToken,
    /// The auth watcher task.
    task: JoinHandle<()>,
}

impl FeedSession {
    /// Start following the auth provider.
    pub fn start(
        store: Arc<dyn NotificationStore>,
        auth: Arc<dyn AuthProvider>,
        config: FeedConfig,
    ) -> Self {
        let current = Arc::new(RwLock::new(None));
        let (active_tx, _) = watch::channel(None);
        let active_user = Arc::new(active_tx);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(follow_auth(
            store,
            auth,
            config,
            Arc::clone(&current),
            Arc::clone(&active_user),
            cancel.clone(),
        ));

        Self {
            current,
            active_user,
            cancel,
            task,
        }
    }

    /// The feed for the signed-in user, if one is installed.
    pub async fn feed(&self) -> Option<Arc<NotificationFeed>> {
        self.current.read().await.clone()
    }

    /// The user whose feed is installed.
    pub fn active_user(&self) -> Option<UserId> {
        *self.active_user.borrow()
    }

    /// Wait until the installed feed belongs to `user`.
    pub async fn wait_for_user(&self, user: Option<UserId>) {
        let mut rx = self.active_user.subscribe();
        let _ = rx.wait_for(|active| *active == user).await;
    }

    /// Stop following auth changes and tear down the current feed.
    pub async fn stop(&self) {
        self.cancel.cancel();
        if let Some(feed) = self.current.write().await.take() {
            feed.unsubscribe();
        }
        self.active_user.send_replace(None);
    }

    /// Whether the auth watcher is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn follow_auth(
    store: Arc<dyn NotificationStore>,
    auth: Arc<dyn AuthProvider>,
    config: FeedConfig,
    current: Arc<RwLock<Option<Arc<NotificationFeed>>>>,
    active_user: Arc<watch::Sender<Option<UserId>>>,
    cancel: CancellationToken,
) {
    let mut rx = auth.watch_user();
    loop {
        let wanted = *rx.borrow_and_update();
        let active = *active_user.borrow();
        if wanted != active {
            switch_feed(&store, &config, &current, wanted).await;
            active_user.send_replace(wanted);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("Auth provider dropped; feed session ends");
                    break;
                }
            }
        }
    }
}

async fn switch_feed(
    store: &Arc<dyn NotificationStore>,
    config: &FeedConfig,
    current: &RwLock<Option<Arc<NotificationFeed>>>,
    wanted: Option<UserId>,
) {
    let mut slot = current.write().await;
    if let Some(old) = slot.take() {
        info!(user_id = %old.user_id(), "Tearing down notification feed");
        old.unsubscribe();
    }
    if let Some(user_id) = wanted {
        let feed = NotificationFeed::subscribe(Arc::clone(store), user_id, config.clone()).await;
        *slot = Some(Arc::new(feed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesdesk_core::config::store::StoreConfig;
    use salesdesk_entity::notification::NotificationDraft;
    use salesdesk_store::{LocalAuthSession, MemoryDocumentStore};

    #[tokio::test]
    async fn test_sign_in_switch_and_sign_out() {
        let store = MemoryDocumentStore::new(&StoreConfig::default());
        let alice = UserId::new();
        let bob = UserId::new();
        store
            .insert(NotificationDraft::new(alice, "lead", "For Alice"))
            .await
            .unwrap();

        let auth = Arc::new(LocalAuthSession::new());
        let session = FeedSession::start(
            Arc::new(store.clone()),
            auth.clone(),
            FeedConfig::default(),
        );
        assert!(session.feed().await.is_none());

        auth.sign_in(alice);
        session.wait_for_user(Some(alice)).await;
        let alice_feed = session.feed().await.unwrap();
        let snap = alice_feed.wait_until(|s| s.revision >= 1).await;
        assert_eq!(snap.unread_count, 1);

        auth.sign_in(bob);
        session.wait_for_user(Some(bob)).await;
        assert!(!alice_feed.is_live());
        assert_eq!(session.feed().await.unwrap().user_id(), bob);

        auth.sign_out();
        session.wait_for_user(None).await;
        assert!(session.feed().await.is_none());

        session.stop().await;
    }
}
