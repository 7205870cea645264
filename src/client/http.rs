//! Authenticated HTTP client and its factory
//!
//! [`ClientFactory`] memoizes one [`AuthenticatedClient`] per base URL.
//! Every request sent through the client carries the current session
//! token, and a 401 triggers at most one refresh-and-resend before the
//! session is dropped.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client as HttpClient, Method, Response, StatusCode, Url};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::DEFAULT_SERVER_URL;
use crate::error::{ApiError, ConfigError, Result};
use crate::session::{AuthToken, NoRefresh, TokenRefresher, TokenStore};

/// Connect and overall request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Auth-failure responses tolerated in one logical request before giving up
const MAX_AUTH_FAILURES: u32 = 2;

/// Parse a base URL, making sure relative paths join under it
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    let url =
        Url::parse(&with_slash).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()).into());
    }
    Ok(url)
}

/// HTTP client bound to one base URL
pub struct AuthenticatedClient {
    http: HttpClient,
    base_url: Url,
    token_store: Arc<TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
}

impl AuthenticatedClient {
    fn new(
        base_url: Url,
        token_store: Arc<TokenStore>,
        refresher: Arc<dyn TokenRefresher>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("floorterm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token_store,
            refresher,
        })
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST a JSON body to `path`, relative to the base URL
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| ConfigError::InvalidBaseUrl(format!("{}{}", self.base_url, path)))?;
        self.execute(Method::POST, url, body).await
    }

    /// Send a request, recovering from auth failures through the refresh policy.
    ///
    /// The final response is returned whatever its status; only transport
    /// failures become errors here.
    async fn execute<B>(&self, method: Method, url: Url, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut credential = self
            .with_store(|store| store.get())
            .await
            .map(|token| token.value);
        let mut auth_failures = 0;

        loop {
            let mut request = self.http.request(method.clone(), url.clone()).json(body);
            if let Some(token) = &credential {
                request = request.bearer_auth(token);
            }

            debug!("--> {} {}", method, url);
            let response = request.send().await.map_err(ApiError::from)?;
            debug!("<-- {} {}", response.status(), url);

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            auth_failures += 1;
            match self.recover(auth_failures).await {
                Some(token) => credential = Some(token.value),
                None => return Ok(response),
            }
        }
    }

    /// Obtain a replacement token after the `auth_failures`-th rejection
    async fn recover(&self, auth_failures: u32) -> Option<AuthToken> {
        if auth_failures >= MAX_AUTH_FAILURES {
            warn!(
                "Server rejected credentials {} times, ending session",
                auth_failures
            );
            self.with_store(|store| store.invalidate()).await;
            return None;
        }

        let current = self.with_store(|store| store.get()).await;
        match self.refresher.refresh(current.as_ref()).await {
            Some(token) if token.is_usable() => {
                debug!("Token refreshed, retrying request");
                let renewed = token.clone();
                self.with_store(move |store| store.persist(renewed)).await;
                Some(token)
            }
            _ => {
                warn!("Token refresh unavailable, ending session");
                self.with_store(|store| store.invalidate()).await;
                None
            }
        }
    }

    /// Run a token store operation on the blocking pool.
    ///
    /// File-backed stores do synchronous I/O under a lock, which must not
    /// stall the runtime threads other requests are using.
    async fn with_store<T, F>(&self, op: F) -> T
    where
        F: FnOnce(&TokenStore) -> T + Send + 'static,
        T: Default + Send + 'static,
    {
        let store = Arc::clone(&self.token_store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .unwrap_or_else(|e| {
                warn!("Token store task failed: {}", e);
                T::default()
            })
    }
}

struct ClientSlot {
    base_url: Url,
    client: Option<Arc<AuthenticatedClient>>,
}

/// Builds and memoizes the authenticated client
pub struct ClientFactory {
    token_store: Arc<TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    slot: RwLock<ClientSlot>,
}

impl ClientFactory {
    pub fn builder() -> ClientFactoryBuilder {
        ClientFactoryBuilder::default()
    }

    /// Client for the current base URL, built on first use
    pub async fn client(&self) -> Result<Arc<AuthenticatedClient>> {
        {
            let slot = self.slot.read().await;
            if let Some(client) = &slot.client {
                return Ok(Arc::clone(client));
            }
        }

        let mut slot = self.slot.write().await;
        self.fill(&mut slot)
    }

    /// Client for `base_url`, switching the factory over to it if needed
    #[allow(dead_code)]
    pub async fn client_for(&self, base_url: &str) -> Result<Arc<AuthenticatedClient>> {
        let url = normalize_base_url(base_url)?;
        {
            let slot = self.slot.read().await;
            if slot.base_url == url {
                if let Some(client) = &slot.client {
                    return Ok(Arc::clone(client));
                }
            }
        }

        let mut slot = self.slot.write().await;
        if slot.base_url != url {
            debug!("Base URL changed to {}", url);
            slot.base_url = url;
            slot.client = None;
        }
        self.fill(&mut slot)
    }

    /// Point the factory at a new server; the next `client()` rebuilds
    #[allow(dead_code)]
    pub async fn update_base_url(&self, base_url: &str) -> Result<()> {
        let url = normalize_base_url(base_url)?;
        let mut slot = self.slot.write().await;
        if slot.base_url != url {
            debug!("Base URL changed to {}", url);
            slot.base_url = url;
            slot.client = None;
        }
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn base_url(&self) -> Url {
        self.slot.read().await.base_url.clone()
    }

    fn fill(&self, slot: &mut ClientSlot) -> Result<Arc<AuthenticatedClient>> {
        if let Some(client) = &slot.client {
            return Ok(Arc::clone(client));
        }

        debug!("Building HTTP client for {}", slot.base_url);
        let client = Arc::new(AuthenticatedClient::new(
            slot.base_url.clone(),
            Arc::clone(&self.token_store),
            Arc::clone(&self.refresher),
        )?);
        slot.client = Some(Arc::clone(&client));
        Ok(client)
    }
}

/// Configuration for a [`ClientFactory`]
pub struct ClientFactoryBuilder {
    base_url: String,
    token_store: Option<Arc<TokenStore>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

impl Default for ClientFactoryBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            token_store: None,
            refresher: None,
        }
    }
}

impl ClientFactoryBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn token_store(mut self, store: Arc<TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Fails if no token store was supplied; the refresh policy defaults to [`NoRefresh`]
    pub fn build(self) -> Result<ClientFactory> {
        let token_store = self.token_store.ok_or(ConfigError::MissingTokenStore)?;
        let refresher = self.refresher.unwrap_or_else(|| Arc::new(NoRefresh));
        let base_url = normalize_base_url(&self.base_url)?;

        Ok(ClientFactory {
            token_store,
            refresher,
            slot: RwLock::new(ClientSlot {
                base_url,
                client: None,
            }),
        })
    }
}
