//! Login and logout commands

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::cli::context::open_session;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::session::{AuthToken, Session};

/// Run the login command
pub fn login(opts: &GlobalOptions, token: Option<String>, expires_at: Option<i64>) -> Result<()> {
    let value = match token {
        Some(value) => value,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your access token")
            .interact()?,
    };

    let config_path = Config::resolve_path(opts.config_ref())?;
    let session = open_session(&config_path);
    let token = start_session(&session, value, expires_at)?;

    println!("{} Session started", "✓".green());
    if let Some(expires_at) = token.expires_at.and_then(|t| chrono::DateTime::from_timestamp(t, 0))
    {
        println!("  Expires: {}", expires_at.to_rfc3339().cyan());
    }

    Ok(())
}

/// Run the logout command
pub fn logout(opts: &GlobalOptions) -> Result<()> {
    let config_path = Config::resolve_path(opts.config_ref())?;
    let session = open_session(&config_path);

    if session.current().is_none() {
        println!("{} No active session", "○".dimmed());
        return Ok(());
    }
    session.end();
    println!("{} Logged out", "✓".green());

    Ok(())
}

/// Validate and persist a token, preferring an explicit expiry over the JWT claim
fn start_session(session: &Session, value: String, expires_at: Option<i64>) -> Result<AuthToken> {
    let value = value.trim().to_string();
    let token = match expires_at {
        Some(expires_at) => AuthToken::new(value, Some(expires_at)),
        None => AuthToken::from_jwt(value),
    };

    if !token.is_usable() {
        return Err(ConfigError::Invalid("Token must not be empty".to_string()).into());
    }
    if token.is_expired() {
        return Err(ConfigError::Invalid("Token has already expired".to_string()).into());
    }

    session.start_with(token.clone());
    if session.current().as_ref() != Some(&token) {
        return Err(ConfigError::SaveError("Could not store the session token".to_string()).into());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::TokenStore;
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn memory_session() -> Session {
        Session::new(Arc::new(TokenStore::in_memory()))
    }

    #[test]
    fn test_start_session_trims_and_stores() {
        let session = memory_session();
        let token = start_session(&session, "  abc \n".to_string(), None).unwrap();

        assert_eq!(token.value, "abc");
        assert_eq!(session.current(), Some(token));
    }

    #[test]
    fn test_start_session_rejects_blank() {
        let session = memory_session();
        let result = start_session(&session, "   ".to_string(), None);

        assert!(matches!(result, Err(Error::Config(ConfigError::Invalid(_)))));
        assert!(session.current().is_none());
    }

    #[test]
    fn test_start_session_rejects_expired() {
        let session = memory_session();
        let past = Utc::now().timestamp() - 60;
        let result = start_session(&session, "abc".to_string(), Some(past));

        assert!(matches!(result, Err(Error::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_login_and_logout_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let opts = GlobalOptions {
            config: Some(path.to_string_lossy().to_string()),
            ..GlobalOptions::default()
        };

        login(&opts, Some("abc".to_string()), Some(4_000_000_000)).unwrap();
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.token, Some(AuthToken::new("abc", Some(4_000_000_000))));

        logout(&opts).unwrap();
        let saved = Config::load_from(&path).unwrap();
        assert!(saved.token.is_none());
    }
}
