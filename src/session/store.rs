//! Token storage with change notification
//!
//! The store owns the single "current token" slot. Readers go through a
//! `watch` channel so any number of subscribers see every change; writers
//! are serialized so the medium and the published value never disagree
//! about which token is current.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::Stream;
use futures::stream;
use log::{debug, warn};
use tokio::sync::watch;

use super::AuthToken;
use crate::config::Config;
use crate::error::Result;

/// Backing medium for the persisted token
pub trait TokenPersistence: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> Result<Option<AuthToken>>;

    /// Replace the stored token; `None` clears value and expiry
    fn store(&self, token: Option<&AuthToken>) -> Result<()>;
}

/// Token kept only for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryPersistence {
    #[allow(dead_code)]
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<AuthToken>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, token: Option<&AuthToken>) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token.cloned();
        Ok(())
    }
}

/// Token stored in the `token` key of the YAML config file.
///
/// Other keys in the file are preserved on every write.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenPersistence for FilePersistence {
    fn load(&self) -> Result<Option<AuthToken>> {
        Ok(Config::load_or_default_from(&self.path)?.token)
    }

    fn store(&self, token: Option<&AuthToken>) -> Result<()> {
        let mut config = Config::load_or_default_from(&self.path)?;
        if config.token.as_ref() == token {
            return Ok(());
        }
        config.token = token.cloned();
        config.save_to(&self.path)
    }
}

/// Holder of the one active session token
pub struct TokenStore {
    medium: Box<dyn TokenPersistence>,
    state: watch::Sender<Option<AuthToken>>,
    writes: Mutex<()>,
}

impl TokenStore {
    /// Open a store over `medium`, dropping a persisted token that has already expired
    pub fn new(medium: impl TokenPersistence + 'static) -> Self {
        let loaded = medium.load().unwrap_or_else(|e| {
            warn!("Failed to read stored token, starting logged out: {}", e);
            None
        });

        let (state, _) = watch::channel(None);
        let store = Self {
            medium: Box::new(medium),
            state,
            writes: Mutex::new(()),
        };

        match loaded {
            Some(token) if token.is_expired() => {
                debug!("Stored token expired, clearing");
                let _guard = store.lock_writes();
                store.clear_medium();
            }
            Some(token) => {
                store.state.send_replace(Some(token));
            }
            None => {}
        }

        store
    }

    /// Store that never touches disk
    #[allow(dead_code)]
    pub fn in_memory() -> Self {
        Self::new(MemoryPersistence::default())
    }

    /// Current token, if present and not expired.
    ///
    /// An expired token is cleared as a side effect.
    pub fn get(&self) -> Option<AuthToken> {
        let cached = self.state.borrow().clone()?;
        if !cached.is_expired() {
            return Some(cached);
        }

        let _guard = self.lock_writes();
        // Another writer may have replaced it while we waited
        if self.state.borrow().as_ref() == Some(&cached) {
            debug!("Cached token expired, clearing");
            self.clear_medium();
            self.state.send_replace(None);
        }
        None
    }

    /// Stream of token changes, starting with the current value.
    ///
    /// An expired token is cleared before the first value is emitted.
    #[allow(dead_code)]
    pub fn observe(&self) -> impl Stream<Item = Option<AuthToken>> + Send + 'static {
        self.get();
        let rx = self.state.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let value = rx
                .borrow_and_update()
                .clone()
                .filter(|token| !token.is_expired());
            Some((value, (rx, false)))
        })
    }

    /// Replace any previous session with `token`
    pub fn persist(&self, token: AuthToken) {
        let _guard = self.lock_writes();

        self.clear_medium();
        match self.medium.store(Some(&token)) {
            Ok(()) => {
                debug!("Persisted new session token");
                self.state.send_replace(Some(token));
            }
            Err(e) => {
                warn!("Failed to persist token, session dropped: {}", e);
                self.state.send_replace(None);
            }
        }
    }

    /// Clear the stored token and publish absence
    pub fn invalidate(&self) {
        let _guard = self.lock_writes();
        self.clear_medium();
        self.state.send_replace(None);
        debug!("Session token invalidated");
    }

    fn clear_medium(&self) {
        if let Err(e) = self.medium.store(None) {
            warn!("Failed to clear stored token: {}", e);
        }
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
