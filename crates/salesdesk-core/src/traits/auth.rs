//! Authentication provider trait.

use tokio::sync::watch;

use crate::types::id::UserId;

/// Supplies the signed-in user to components that need it.
///
/// Feeds receive the user through this trait instead of reading ambient
/// global state, so they can be driven by a test double.
pub trait AuthProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;

    /// A receiver that changes on every sign-in and sign-out.
    fn watch_user(&self) -> watch::Receiver<Option<UserId>>;
}
