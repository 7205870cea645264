//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// Precedence for the server URL is: CLI flag > environment variable >
/// config file > built-in default. This struct captures the CLI/env layer;
/// the config file is consulted later in `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.floorterm/config.yaml)
    pub config: Option<String>,

    /// Server URL override for this invocation
    pub server: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            server: cli.server.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get server override as `Option<&str>`.
    pub fn server_ref(&self) -> Option<&str> {
        self.server.as_deref()
    }
}
