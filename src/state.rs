use std::sync::Arc;

use crate::store::CollectionStore;

pub const DEFAULT_AUTH_COOKIE: &str = "pb_auth";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CollectionStore>,
    pub auth_cookie: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            auth_cookie: Arc::from(DEFAULT_AUTH_COOKIE),
        }
    }

    pub fn with_auth_cookie(mut self, name: &str) -> Self {
        self.auth_cookie = Arc::from(name);
        self
    }
}
