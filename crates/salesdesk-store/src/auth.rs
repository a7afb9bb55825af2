//! Local authentication session.

use tokio::sync::watch;
use tracing::info;

use salesdesk_core::traits::AuthProvider;
use salesdesk_core::types::id::UserId;

/// An [`AuthProvider`] whose user changes only through explicit
/// [`sign_in`](Self::sign_in) and [`sign_out`](Self::sign_out) calls.
#[derive(Debug)]
pub struct LocalAuthSession {
    current: watch::Sender<Option<UserId>>,
}

impl LocalAuthSession {
    /// Create a signed-out session.
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Sign in as the given user, replacing any previous user.
    pub fn sign_in(&self, user_id: UserId) {
        info!(%user_id, "User signed in");
        self.current.send_replace(Some(user_id));
    }

    /// Sign out the current user.
    pub fn sign_out(&self) {
        if let Some(user_id) = self.current.send_replace(None) {
            info!(%user_id, "User signed out");
        }
    }
}

impl Default for LocalAuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for LocalAuthSession {
    fn current_user(&self) -> Option<UserId> {
        *self.current.borrow()
    }

    fn watch_user(&self) -> watch::Receiver<Option<UserId>> {
        self.current.subscribe()
    }
}
