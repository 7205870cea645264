//! Settings commands

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::{ConfigCommands, OutputFormat};
use crate::client::http::normalize_base_url;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::output::json;

/// Run a `config` subcommand
pub fn run(opts: &GlobalOptions, command: &ConfigCommands) -> Result<()> {
    let path = Config::resolve_path(opts.config_ref())?;
    let mut config = Config::load_or_default_from(&path)?;

    match command {
        ConfigCommands::Show => {
            show(opts.format, &config)?;
            return Ok(());
        }
        ConfigCommands::SetServer { url } => {
            let url = normalize_base_url(url)?;
            config.server_url = Some(url.to_string());
            println!("{} Server set to {}", "✓".green(), url.as_str().cyan());
        }
        ConfigCommands::SetEmployee { id } => {
            let id = id.trim();
            if id.is_empty() {
                return Err(ConfigError::Invalid("Employee ID must not be empty".to_string()).into());
            }
            config.last_employee_id = Some(id.to_string());
            println!("{} Default employee set to {}", "✓".green(), id.bold());
        }
        ConfigCommands::SetRefreshCommand { command } => {
            config.refresh_command = Some(command.clone());
            println!("{} Refresh command saved", "✓".green());
        }
        ConfigCommands::ClearRefreshCommand => {
            config.refresh_command = None;
            println!("{} Refresh command removed", "✓".green());
        }
    }

    config.save_to(&path)
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    // Never echo the token itself
    let redacted = Config {
        token: None,
        ..config.clone()
    };

    match format {
        OutputFormat::Json => println!("{}", json::format_json(&redacted)?),
        OutputFormat::Pretty => {
            let unset = || "(unset)".dimmed().to_string();
            println!(
                "server_url:       {}",
                redacted.server_url.clone().unwrap_or_else(unset)
            );
            println!(
                "last_employee_id: {}",
                redacted.last_employee_id.clone().unwrap_or_else(unset)
            );
            println!(
                "refresh_command:  {}",
                redacted.refresh_command.clone().unwrap_or_else(unset)
            );
            println!(
                "token:            {}",
                if config.token.is_some() { "(stored)".to_string() } else { unset() }
            );
        }
    }
    Ok(())
}
