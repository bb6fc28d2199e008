use std::sync::Arc;

use metamoviex_metadata::provider::{IdentityApi, MediaApi};

use crate::config::Config;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub media: Arc<dyn MediaApi>,
    pub identity: Arc<dyn IdentityApi>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by one client implementing both TMDB traits.
    pub fn new<T>(tmdb: Arc<T>, config: Config) -> Self
    where
        T: MediaApi + IdentityApi + 'static,
    {
        Self {
            media: tmdb.clone(),
            identity: tmdb,
            config: Arc::new(config),
        }
    }
}
