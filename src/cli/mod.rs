//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};

pub mod args;
pub mod clock;
pub mod config;
pub mod context;
pub mod login;
pub mod status;

pub use args::{ClockOutStatusArg, GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// floorterm - shop-floor terminal for work-order time tracking
#[derive(Parser, Debug)]
#[command(name = "floorterm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, json)
    #[arg(
        long,
        global = true,
        env = "FLOORTERM_FORMAT",
        default_value = "pretty",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "FLOORTERM_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the server URL for this invocation
    #[arg(long, global = true, env = "FLOORTERM_SERVER", hide_env = true)]
    pub server: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "FLOORTERM_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a session with a bearer token
    Login {
        /// Token value (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// Expiry as Unix seconds (read from the JWT `exp` claim when omitted)
        #[arg(long)]
        expires_at: Option<i64>,
    },

    /// End the current session
    Logout,

    /// Show session and configuration status
    Status,

    /// Display version information
    Version,

    /// Clock in to a work order
    ClockIn(ClockInArgs),

    /// Clock out of a work order
    ClockOut(ClockOutArgs),

    /// Manage saved settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Arguments for `clock-in`
#[derive(Args, Debug, Clone)]
pub struct ClockInArgs {
    /// Work-order collection ID
    pub work_order: i32,

    /// Quantity to start
    #[arg(long, short = 'q', value_parser = clap::value_parser!(i32).range(0..))]
    pub quantity: i32,

    /// Employee ID (defaults to the last one used)
    #[arg(long, short = 'u')]
    pub user: Option<i32>,
}

/// Arguments for `clock-out`
#[derive(Args, Debug, Clone)]
pub struct ClockOutArgs {
    /// Work-order collection ID
    pub work_order: i32,

    /// Quantity produced
    #[arg(long, short = 'q', value_parser = clap::value_parser!(i32).range(0..))]
    pub quantity: i32,

    /// Whether the work order is finished
    #[arg(long, short = 's', value_enum)]
    pub status: ClockOutStatusArg,

    /// Employee ID (defaults to the last one used)
    #[arg(long, short = 'u')]
    pub user: Option<i32>,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Save the server URL
    SetServer {
        /// Base URL, e.g. http://10.0.0.5:8080/
        url: String,
    },

    /// Save the default employee ID
    SetEmployee {
        /// Employee ID
        id: String,
    },

    /// Save a shell command that prints a fresh token when the server rejects the current one
    SetRefreshCommand {
        /// Command line, run with `sh -c`
        command: String,
    },

    /// Remove the refresh command
    ClearRefreshCommand,

    /// Show saved settings
    Show,
}
