//! Session facade for the presentation layer

use std::sync::Arc;

use futures::Stream;

use super::{AuthToken, TokenStore};

/// Start, inspect and end the operator's session
#[derive(Clone)]
pub struct Session {
    store: Arc<TokenStore>,
}

impl Session {
    pub fn new(store: Arc<TokenStore>) -> Self {
        Self { store }
    }

    /// Token currently in effect, if any
    pub fn current(&self) -> Option<AuthToken> {
        self.store.get()
    }

    /// Follow session changes, starting with the current state
    #[allow(dead_code)]
    pub fn observe(&self) -> impl Stream<Item = Option<AuthToken>> + Send + 'static {
        self.store.observe()
    }

    /// Begin a session from a raw token value
    #[allow(dead_code)]
    pub fn start(&self, value: impl Into<String>, expires_at: Option<i64>) {
        self.start_with(AuthToken::new(value, expires_at));
    }

    /// Begin a session, replacing whatever was active
    pub fn start_with(&self, token: AuthToken) {
        self.store.persist(token);
    }

    /// End the session
    pub fn end(&self) {
        self.store.invalidate();
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }
}
