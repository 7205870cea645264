//! Clock-in and clock-out commands

use colored::Colorize;
use log::debug;
use reqwest::StatusCode;

use crate::cli::args::GlobalOptions;
use crate::cli::{ClockInArgs, ClockOutArgs, CommandContext, OutputFormat};
use crate::client::{ApiResponse, ClockOutStatus};
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Error, Result};
use crate::output::json;

/// Run the clock-in command
pub async fn clock_in(opts: &GlobalOptions, args: &ClockInArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let response = submit_clock_in(&ctx, args)
        .await
        .inspect_err(|e| note_session_end(&ctx, e))?;
    print_result(ctx.format, "Clock-in", args.work_order, &response)
}

/// Run the clock-out command
pub async fn clock_out(opts: &GlobalOptions, args: &ClockOutArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let response = submit_clock_out(&ctx, args)
        .await
        .inspect_err(|e| note_session_end(&ctx, e))?;
    print_result(ctx.format, "Clock-out", args.work_order, &response)
}

async fn submit_clock_in(ctx: &CommandContext, args: &ClockInArgs) -> Result<ApiResponse> {
    let user_id = resolve_user_id(args.user, &ctx.config)?;
    debug!(
        "Clock-in: work order {} user {} quantity {}",
        args.work_order, user_id, args.quantity
    );

    let response = ctx
        .work_orders
        .clock_in(args.work_order, user_id, args.quantity)
        .await?;
    ctx.remember_employee(user_id);
    Ok(response)
}

async fn submit_clock_out(ctx: &CommandContext, args: &ClockOutArgs) -> Result<ApiResponse> {
    let user_id = resolve_user_id(args.user, &ctx.config)?;
    let status = ClockOutStatus::from(args.status);
    debug!(
        "Clock-out: work order {} user {} quantity {} status {}",
        args.work_order, user_id, args.quantity, status
    );

    let response = ctx
        .work_orders
        .clock_out(args.work_order, user_id, args.quantity, status)
        .await?;
    ctx.remember_employee(user_id);
    Ok(response)
}

/// Whether `err` was an auth rejection that left the operator logged out
fn session_ended(ctx: &CommandContext, err: &Error) -> bool {
    matches!(
        err,
        Error::Api(ApiError::Http { status, .. }) if *status == StatusCode::UNAUTHORIZED
    ) && ctx.session.current().is_none()
}

fn note_session_end(ctx: &CommandContext, err: &Error) {
    if session_ended(ctx, err) {
        eprintln!(
            "{} Session ended. Run `floorterm login` to start a new one.",
            "!".yellow()
        );
    }
}

/// Explicit `--user`, else the saved employee ID
fn resolve_user_id(explicit: Option<i32>, config: &Config) -> Result<i32> {
    if let Some(id) = explicit {
        return Ok(id);
    }

    let saved = config
        .last_employee_id
        .as_deref()
        .ok_or(ConfigError::MissingEmployeeId)?;
    saved.trim().parse().map_err(|_| {
        ConfigError::Invalid(format!("Saved employee ID '{}' is not a number", saved)).into()
    })
}

fn print_result(
    format: OutputFormat,
    operation: &str,
    work_order: i32,
    response: &ApiResponse,
) -> Result<()> {
    match format {
        OutputFormat::Pretty => {
            println!(
                "{} {} recorded for work order {}",
                "✓".green(),
                operation,
                work_order.to_string().bold()
            );
            if !response.message.trim().is_empty() {
                println!("  {}", response.message);
            }
        }
        OutputFormat::Json => {
            println!("{}", json::format_json(response)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ClockOutStatusArg;
    use crate::cli::context::open_session;
    use crate::client::mock::CapturedRequest;
    use crate::client::models::{ClockInRequest, ClockOutRequest};
    use crate::client::MockWorkOrdersClient;
    use crate::session::AuthToken;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn context(path: &Path, mock: Arc<MockWorkOrdersClient>) -> CommandContext {
        CommandContext {
            config: Config::load_or_default_from(path).unwrap(),
            config_path: path.to_path_buf(),
            session: open_session(path),
            work_orders: mock,
            format: OutputFormat::Pretty,
        }
    }

    #[test]
    fn test_resolve_user_prefers_explicit() {
        let config = Config {
            last_employee_id: Some("9".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_user_id(Some(7), &config).unwrap(), 7);
        assert_eq!(resolve_user_id(None, &config).unwrap(), 9);
    }

    #[test]
    fn test_resolve_user_missing() {
        match resolve_user_id(None, &Config::default()) {
            Err(Error::Config(ConfigError::MissingEmployeeId)) => (),
            other => panic!("Expected MissingEmployeeId, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_user_non_numeric() {
        let config = Config {
            last_employee_id: Some("abc".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            resolve_user_id(None, &config),
            Err(Error::Config(ConfigError::Invalid(_)))
        ));
    }

    #[tokio::test]
    async fn test_clock_in_sends_request_and_remembers_employee() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mock = Arc::new(MockWorkOrdersClient::new());
        let ctx = context(&path, Arc::clone(&mock));

        let args = ClockInArgs {
            work_order: 501,
            quantity: 12,
            user: Some(7),
        };
        let response = submit_clock_in(&ctx, &args).await.unwrap();

        assert!(response.is_success());
        assert_eq!(
            mock.captured_requests().await,
            vec![CapturedRequest::ClockIn(ClockInRequest {
                work_order_collection_id: 501,
                user_id: 7,
                quantity: 12,
            })]
        );
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.last_employee_id.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_clock_out_uses_saved_employee() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        Config {
            last_employee_id: Some("42".to_string()),
            ..Config::default()
        }
        .save_to(&path)
        .unwrap();

        let mock = Arc::new(MockWorkOrdersClient::new());
        let ctx = context(&path, Arc::clone(&mock));

        let args = ClockOutArgs {
            work_order: 501,
            quantity: 4,
            status: ClockOutStatusArg::Complete,
            user: None,
        };
        submit_clock_out(&ctx, &args).await.unwrap();

        assert_eq!(
            mock.captured_requests().await,
            vec![CapturedRequest::ClockOut(ClockOutRequest {
                work_order_collection_id: 501,
                user_id: 42,
                quantity: 4,
                status: ClockOutStatus::Complete,
            })]
        );
    }

    #[tokio::test]
    async fn test_failed_clock_in_does_not_remember_employee() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mock = Arc::new(
            MockWorkOrdersClient::new()
                .with_error(ApiError::Rejected("Work order closed".to_string()))
                .await,
        );
        let ctx = context(&path, mock);

        let args = ClockInArgs {
            work_order: 501,
            quantity: 1,
            user: Some(7),
        };
        let err = submit_clock_in(&ctx, &args).await.unwrap_err();

        assert_eq!(err.to_string(), "Work order closed");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_server_message_is_passed_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mock = Arc::new(
            MockWorkOrdersClient::new()
                .with_response(ApiResponse {
                    status: "success".to_string(),
                    message: "3 of 12 pieces remaining".to_string(),
                })
                .await,
        );
        let ctx = context(&path, mock);

        let args = ClockInArgs {
            work_order: 501,
            quantity: 9,
            user: Some(7),
        };
        let response = submit_clock_in(&ctx, &args).await.unwrap();

        assert_eq!(response.message, "3 of 12 pieces remaining");
        print_result(OutputFormat::Pretty, "Clock-in", 501, &response).unwrap();
        print_result(OutputFormat::Json, "Clock-in", 501, &response).unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_without_session_reports_session_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mock = Arc::new(
            MockWorkOrdersClient::new()
                .with_error(ApiError::Http {
                    status: StatusCode::UNAUTHORIZED,
                    message: "Unknown error".to_string(),
                })
                .await,
        );
        let ctx = context(&path, mock);

        let args = ClockInArgs {
            work_order: 501,
            quantity: 1,
            user: Some(7),
        };
        let err = submit_clock_in(&ctx, &args).await.unwrap_err();

        assert!(session_ended(&ctx, &err));
    }

    #[test]
    fn test_other_failures_do_not_report_session_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let ctx = context(&path, Arc::new(MockWorkOrdersClient::new()));

        let rejected: Error = ApiError::Rejected("Work order closed".to_string()).into();
        assert!(!session_ended(&ctx, &rejected));

        ctx.session.start_with(AuthToken::new("abc", None));
        let unauthorized: Error = ApiError::Http {
            status: StatusCode::UNAUTHORIZED,
            message: "Unknown error".to_string(),
        }
        .into();
        assert!(!session_ended(&ctx, &unauthorized));
    }
}
