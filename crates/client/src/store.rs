use std::sync::Arc;

use metamoviex_core::types::User;
use tokio::sync::watch;

/// Holder of the currently logged-in user.
///
/// Cheap to clone; every clone observes the same user. Views that need to
/// react to login and logout hold a [`watch::Receiver`] from [`subscribe`].
///
/// [`subscribe`]: UserStore::subscribe
#[derive(Debug, Clone)]
pub struct UserStore {
    tx: Arc<watch::Sender<Option<User>>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn set_user(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    pub fn logout(&self) {
        self.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }
}
