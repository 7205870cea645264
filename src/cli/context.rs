//! Command execution context
//!
//! Wires the config file, token store, client factory and work-orders
//! client together so command handlers receive ready-to-use collaborators.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{ClientFactory, WorkOrdersApi, WorkOrdersClient};
use crate::config::Config;
use crate::error::Result;
use crate::session::{
    CommandRefresher, FilePersistence, NoRefresh, Session, TokenRefresher, TokenStore,
};

/// Session backed by the token key of the config file at `path`
pub fn open_session(path: &Path) -> Session {
    Session::new(Arc::new(TokenStore::new(FilePersistence::new(path))))
}

/// Context for command execution containing config, session and API client.
pub struct CommandContext {
    /// Settings as loaded at startup
    pub config: Config,
    /// Where settings are read from and written to
    pub config_path: PathBuf,
    /// Operator session
    pub session: Session,
    /// Work-order API
    pub work_orders: Arc<dyn WorkOrdersApi>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// This handles:
    /// - Loading config from path (or default location), defaults if absent
    /// - Opening the token store over the same file
    /// - Choosing the refresh policy from `refresh_command`
    /// - Building the client factory for the effective server URL
    ///
    /// # Errors
    /// Returns error if the config cannot be parsed or the server URL is invalid.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = Config::resolve_path(opts.config_ref())?;
        let config = Config::load_or_default_from(&config_path)?;
        let session = open_session(&config_path);

        let refresher: Arc<dyn TokenRefresher> = match &config.refresh_command {
            Some(command) => Arc::new(CommandRefresher::new(command.clone())),
            None => Arc::new(NoRefresh),
        };

        let base_url = opts
            .server_ref()
            .unwrap_or_else(|| config.server_url_or_default())
            .to_string();
        debug!("Using server {}", base_url);

        let factory = ClientFactory::builder()
            .base_url(base_url)
            .token_store(Arc::clone(session.store()))
            .refresher(refresher)
            .build()?;

        Ok(Self {
            config,
            config_path,
            session,
            work_orders: Arc::new(WorkOrdersClient::new(Arc::new(factory))),
            format: opts.format,
        })
    }

    /// Remember the employee who just completed an operation.
    ///
    /// Re-reads the file first so a token refreshed mid-request is kept.
    /// Failures are logged, not returned: the operation itself succeeded.
    pub fn remember_employee(&self, user_id: i32) {
        let result = Config::load_or_default_from(&self.config_path).and_then(|mut config| {
            let id = user_id.to_string();
            if config.last_employee_id.as_deref() == Some(id.as_str()) {
                return Ok(());
            }
            config.last_employee_id = Some(id);
            config.save_to(&self.config_path)
        });

        if let Err(e) = result {
            warn!("Failed to save last employee ID: {}", e);
        }
    }
}
