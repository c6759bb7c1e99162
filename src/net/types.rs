//! Wire schema for `/api/*` requests and responses.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::state::session::{Role, Session};

// =============================================================================
// REQUESTS
// =============================================================================

/// `POST /api/login` body.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /api/register` body. `phone` is sent as an empty string when unset.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .finish()
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// `200` body of `/api/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session::new(resp.username, resp.role)
    }
}

/// `200` body of `/api/getBalance`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BalanceResponse {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub balance: f64,
}

/// Non-2xx body shared by every endpoint. Servers use either `error` or
/// `errors`; when both are present `error` wins.
#[derive(Debug, Clone, Default)]
pub struct ErrorBody {
    pub error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct RawErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
    #[serde(default)]
    errors: Option<ErrorDetail>,
}

/// `error` is either one message or a field -> message map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(BTreeMap<String, String>),
}

impl ErrorBody {
    /// Parse a failure body, tolerating empty or non-JSON payloads.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str::<RawErrorBody>(body)
            .map(|raw| Self { error: raw.error.or(raw.errors) })
            .unwrap_or_default()
    }

    /// Form-wide message, when the server sent a plain string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.error {
            Some(ErrorDetail::Message(m)) if !m.trim().is_empty() => Some(m),
            _ => None,
        }
    }
}

// Role labels are matched ignoring case and padding; unknown labels are
// customers, the only account kind.
fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(Role::default());
    };
    Ok(Role::parse(&raw).unwrap_or_else(|| {
        tracing::warn!(role = %raw, "unrecognized role label; treating as customer");
        Role::default()
    }))
}

// Decimal columns often arrive as strings ("125000.00").
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
