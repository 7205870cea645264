//! Token refresh policies
//!
//! A policy runs when the server rejects a request as unauthenticated.
//! Returning `None`, or a token with a blank value, tells the caller that
//! the session cannot be recovered.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use super::AuthToken;

/// Strategy for obtaining a new token after an auth failure
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Try to obtain a replacement for `current`
    async fn refresh(&self, current: Option<&AuthToken>) -> Option<AuthToken>;
}

/// Policy that never refreshes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresh;

#[async_trait]
impl TokenRefresher for NoRefresh {
    async fn refresh(&self, _current: Option<&AuthToken>) -> Option<AuthToken> {
        None
    }
}

/// Adapts an async closure into a [`TokenRefresher`]
#[allow(dead_code)]
pub struct RefreshFn<F>(pub F);

#[async_trait]
impl<F, Fut> TokenRefresher for RefreshFn<F>
where
    F: Fn(Option<AuthToken>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<AuthToken>> + Send + 'static,
{
    async fn refresh(&self, current: Option<&AuthToken>) -> Option<AuthToken> {
        (self.0)(current.cloned()).await
    }
}

/// Environment variable carrying the rejected token to the refresh command
pub const CURRENT_TOKEN_ENV: &str = "FLOORTERM_CURRENT_TOKEN";

/// How long a refresh command may run before it is killed
pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a shell command and uses its trimmed stdout as the new token.
///
/// The rejected token, if any, is exposed to the command as
/// `FLOORTERM_CURRENT_TOKEN`. A non-zero exit status, empty output or a
/// run longer than the timeout means the refresh failed.
#[derive(Debug, Clone)]
pub struct CommandRefresher {
    command: String,
    timeout: Duration,
}

impl CommandRefresher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: REFRESH_TIMEOUT,
        }
    }

    #[allow(dead_code)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn shell(&self) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

#[async_trait]
impl TokenRefresher for CommandRefresher {
    async fn refresh(&self, current: Option<&AuthToken>) -> Option<AuthToken> {
        let mut cmd = self.shell();
        cmd.kill_on_drop(true);
        match current {
            Some(token) => cmd.env(CURRENT_TOKEN_ENV, &token.value),
            None => cmd.env_remove(CURRENT_TOKEN_ENV),
        };

        debug!("Running refresh command");
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Failed to run refresh command: {}", e);
                return None;
            }
            Err(_) => {
                warn!("Refresh command timed out after {:?}", self.timeout);
                return None;
            }
        };

        if !output.status.success() {
            warn!("Refresh command exited with {}", output.status);
            return None;
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            warn!("Refresh command printed no token");
            return None;
        }

        Some(AuthToken::from_jwt(value))
    }
}
