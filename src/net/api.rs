//! API gateway: the four KodBank calls behind one async trait.
//!
//! `HttpGateway` is the real implementation over `reqwest`. Its cookie store
//! holds the `session_token` set by login, so every later request carries the
//! credential without callers touching it.
//!
//! ERROR HANDLING
//! ==============
//! Response classification lives in pure `classify_*` functions so status and
//! body handling can be tested without a server. Any non-2xx balance response
//! is `Unauthorized`, including 5xx: the dashboard treats every failure there
//! as an expired session.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{BalanceResponse, ErrorBody, ErrorDetail, LoginCredentials, LoginResponse, Registration};
use crate::config::{ClientConfig, Endpoint};
use crate::state::session::Session;

// =============================================================================
// ERROR
// =============================================================================

/// Failure kinds reported by the gateway.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Login rejected. Carries the server message when there was one.
    #[error("invalid credentials")]
    InvalidCredentials(Option<String>),

    /// Registration rejected with per-field messages.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(BTreeMap<String, String>),

    /// Registration rejected without field detail.
    #[error("server rejected request: status {status}")]
    Server { status: u16, message: Option<String> },

    /// Balance read refused. Any non-2xx status lands here.
    #[error("unauthorized: status {status}")]
    Unauthorized { status: u16 },

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// Server-supplied form-wide message, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials(message) | Self::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Typed access to the KodBank API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// `POST /api/login`.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] for any non-2xx response,
    /// [`ApiError::Network`] when the server is unreachable.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError>;

    /// `POST /api/register`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] or [`ApiError::Server`] for non-2xx responses,
    /// [`ApiError::Network`] when the server is unreachable.
    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;

    /// `POST /api/logout`. Always succeeds from the caller's point of view.
    async fn logout(&self);

    /// `GET /api/getBalance`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] for any non-2xx response,
    /// [`ApiError::Network`] when the server is unreachable.
    async fn get_balance(&self) -> Result<f64, ApiError>;
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Interpret a `/api/login` response.
///
/// # Errors
///
/// See [`Gateway::login`].
pub fn classify_login(status: u16, body: &str) -> Result<Session, ApiError> {
    if !is_success(status) {
        let message = ErrorBody::parse(body).message().map(str::to_owned);
        return Err(ApiError::InvalidCredentials(message));
    }
    serde_json::from_str::<LoginResponse>(body)
        .map(Session::from)
        .map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Interpret a `/api/register` response. The success body is ignored.
///
/// # Errors
///
/// See [`Gateway::register`].
pub fn classify_register(status: u16, body: &str) -> Result<(), ApiError> {
    if is_success(status) {
        return Ok(());
    }
    match ErrorBody::parse(body).error {
        Some(ErrorDetail::Fields(fields)) if !fields.is_empty() => Err(ApiError::Validation(fields)),
        Some(ErrorDetail::Message(m)) if !m.trim().is_empty() => Err(ApiError::Server { status, message: Some(m) }),
        _ => Err(ApiError::Server { status, message: None }),
    }
}

/// Interpret a `/api/getBalance` response.
///
/// # Errors
///
/// See [`Gateway::get_balance`].
pub fn classify_balance(status: u16, body: &str) -> Result<f64, ApiError> {
    if !is_success(status) {
        return Err(ApiError::Unauthorized { status });
    }
    serde_json::from_str::<BalanceResponse>(body)
        .map(|b| b.balance)
        .map_err(|e| ApiError::Malformed(e.to_string()))
}

// =============================================================================
// HTTP GATEWAY
// =============================================================================

pub struct HttpGateway {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpGateway {
    /// Build a gateway with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn send(&self, endpoint: Endpoint, request: reqwest::RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(path = endpoint.path(), error = %e, "request failed");
            ApiError::Network(e.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        tracing::debug!(path = endpoint.path(), status, "response received");
        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError> {
        let url = self.config.endpoint(Endpoint::Login);
        let (status, body) = self
            .send(Endpoint::Login, self.http.post(url).json(credentials))
            .await?;
        classify_login(status, &body)
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let url = self.config.endpoint(Endpoint::Register);
        let (status, body) = self
            .send(Endpoint::Register, self.http.post(url).json(registration))
            .await?;
        classify_register(status, &body)
    }

    async fn logout(&self) {
        let url = self.config.endpoint(Endpoint::Logout);
        if let Err(e) = self.send(Endpoint::Logout, self.http.post(url)).await {
            tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
        }
    }

    async fn get_balance(&self) -> Result<f64, ApiError> {
        let url = self.config.endpoint(Endpoint::GetBalance);
        let (status, body) = self.send(Endpoint::GetBalance, self.http.get(url)).await?;
        classify_balance(status, &body)
    }
}
