use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Failure to produce a `CredentialRecord` from configuration or the secret store.
#[derive(Debug, ThisError)]
pub enum ResolutionError {
    #[error("database credentials are not configured")]
    NotConfigured,

    #[error("credential payload is not valid JSON: {0}")]
    ParseFailure(#[from] serde_json::Error),

    #[error("credential payload is missing `{0}`")]
    MissingField(&'static str),

    #[error("credential field `{0}` has an invalid value")]
    InvalidField(&'static str),

    #[error("secret store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Failure to turn resolved credentials into a live connection.
#[derive(Debug, ThisError)]
pub enum ConnectionError {
    #[error("database connect failed: {0}")]
    ConnectFailure(#[from] sqlx::Error),

    #[error("database connect timed out")]
    Timeout,
}

/// Errors raised by the secret store backends.
#[derive(Debug, ThisError)]
pub enum SecretStoreError {
    #[error("secret `{0}` not found")]
    NotFound(String),

    #[error("secret `{0}` has no string or UTF-8 binary payload")]
    EmptyPayload(String),

    #[error("secret store request failed: {0}")]
    Request(String),
}

impl From<SecretStoreError> for ResolutionError {
    fn from(e: SecretStoreError) -> Self {
        ResolutionError::StoreUnavailable(e.to_string())
    }
}

/// Handler-boundary error; the only place failures become HTTP responses.
#[derive(Debug, ThisError)]
pub enum ProbeError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("{0}")]
    Query(#[from] sqlx::Error),

    #[error("operation timed out")]
    Timeout,
}

impl ProbeError {
    /// True when no connection was ever obtained.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, ProbeError::Resolution(_) | ProbeError::Connection(_))
    }
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> axum::response::Response {
        let detail = if self.is_connection_failure() {
            "database connection failed".to_string()
        } else {
            format!("database test failed: {}", self)
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse { detail }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub detail: String,
}
