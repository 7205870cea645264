//! Error types for the floorterm client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for floorterm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors.
///
/// Every variant renders as a single human-readable message so the caller
/// can show it as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, timeout, DNS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// A 2xx response without a usable body
    #[error("Empty server response")]
    EmptyResponse,

    /// A well-formed response whose status is not "success"
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to server".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `floorterm config set-server <URL>` to create one.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Client factory used before a token store was configured")]
    MissingTokenStore,

    #[error("Invalid server URL '{0}'")]
    InvalidBaseUrl(String),

    #[error(
        "Employee ID not provided. Pass --user <ID> or run `floorterm config set-employee <ID>`."
    )]
    MissingEmployeeId,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_http_shows_bare_message() {
        let err = ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            message: "Insufficient stock".to_string(),
        };
        assert_eq!(err.to_string(), "Insufficient stock");
    }

    #[test]
    fn test_api_error_rejected_shows_bare_message() {
        let err = ApiError::Rejected("Work order closed".to_string());
        assert_eq!(err.to_string(), "Work order closed");
    }

    #[test]
    fn test_api_error_empty_response() {
        let err = ApiError::EmptyResponse;
        assert!(err.to_string().contains("Empty server response"));
    }

    #[test]
    fn test_api_error_network() {
        let err = ApiError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_config_error_missing_employee() {
        let err = ConfigError::MissingEmployeeId;
        assert!(err.to_string().contains("set-employee"));
    }

    #[test]
    fn test_config_error_invalid_base_url() {
        let err = ConfigError::InvalidBaseUrl("not a url".to_string());
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_error_from_api_error_is_transparent() {
        let err: Error = ApiError::Rejected("Nope".to_string()).into();

        match &err {
            Error::Api(ApiError::Rejected(_)) => (),
            _ => panic!("Expected Error::Api(ApiError::Rejected)"),
        }
        assert_eq!(err.to_string(), "Nope");
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::MissingTokenStore.into();

        match err {
            Error::Config(ConfigError::MissingTokenStore) => (),
            _ => panic!("Expected Error::Config(ConfigError::MissingTokenStore)"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
