//! Authentication token model

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Bearer credential with an optional absolute expiry (Unix seconds).
///
/// A token without `expires_at` never expires on the client side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Opaque bearer value sent in the `Authorization` header
    pub value: String,

    /// Expiration time in seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, expires_at: Option<i64>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Build a token, taking the expiry from the JWT `exp` claim when present
    pub fn from_jwt(value: impl Into<String>) -> Self {
        let value = value.into();
        let expires_at = jwt_expiry(&value);
        Self { value, expires_at }
    }

    /// True iff an expiry is set and it is at or before `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Check expiry against the wall clock
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// A blank value cannot authenticate anything
    pub fn is_usable(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// Extract the `exp` claim from a JWT without verifying it.
///
/// Returns `None` for anything that is not a three-part token with a
/// decodable JSON payload carrying a numeric `exp`.
pub fn jwt_expiry(token: &str) -> Option<i64> {
    #[derive(Deserialize)]
    struct Claims {
        exp: Option<i64>,
    }

    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}
