//! Status command implementation

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::open_session;
use crate::config::Config;
use crate::error::Result;
use crate::output::json;

/// Snapshot of what the terminal would use for the next request
#[derive(Debug, Serialize)]
struct StatusReport {
    config_path: String,
    server_url: String,
    server_overridden: bool,
    session_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_employee_id: Option<String>,
    refresh_configured: bool,
}

/// Run the status command to display session and configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = Config::load_or_default_from(&config_path)?;
    let token = open_session(&config_path).current();

    let report = StatusReport {
        config_path: config_path.display().to_string(),
        server_url: opts
            .server_ref()
            .unwrap_or_else(|| config.server_url_or_default())
            .to_string(),
        server_overridden: opts.server.is_some(),
        session_active: token.is_some(),
        session_expires_at: token
            .as_ref()
            .and_then(|t| t.expires_at)
            .and_then(|t| DateTime::from_timestamp(t, 0)),
        last_employee_id: config.last_employee_id.clone(),
        refresh_configured: config.refresh_command.is_some(),
    };

    match opts.format {
        OutputFormat::Json => println!("{}", json::format_json(&report)?),
        OutputFormat::Pretty => print_pretty(&report, config.server_url.is_some()),
    }

    Ok(())
}

fn print_pretty(report: &StatusReport, server_saved: bool) {
    println!("{}\n", "floorterm Status".bold());
    println!("Config file: {}", report.config_path.cyan());
    println!();

    if report.server_overridden {
        println!("{} Server: {} (via --server)", "○".dimmed(), report.server_url.cyan());
    } else if server_saved {
        println!("{} Server: {}", "✓".green(), report.server_url.cyan());
    } else {
        println!(
            "{} Server not configured, using {}",
            "⚠".yellow(),
            report.server_url.cyan()
        );
        println!("  → Run 'floorterm config set-server <URL>' to set one");
    }

    if report.session_active {
        match report.session_expires_at {
            Some(expires) => {
                let remaining = expires.signed_duration_since(Utc::now());
                println!(
                    "{} Session active (expires in {}h {}m)",
                    "✓".green(),
                    remaining.num_hours(),
                    remaining.num_minutes() % 60
                );
            }
            None => println!("{} Session active (no expiry)", "✓".green()),
        }
    } else {
        println!("{} No active session", "✗".red());
        println!("  → Run 'floorterm login' to start one");
    }

    match &report.last_employee_id {
        Some(id) => println!("{} Employee: {}", "✓".green(), id),
        None => println!("{} No default employee set", "○".dimmed()),
    }

    if report.refresh_configured {
        println!("{} Token refresh command configured", "✓".green());
    }

    println!();
}
