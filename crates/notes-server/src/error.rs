//! API error types with JSON responses.
//!
//! Every handler failure ends up here. Only [`ApiError::UserNotFound`]
//! has a distinguished status; all other kinds are reported to the client
//! as a generic internal error, with the cause logged server-side.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::identity::VerifyError;

/// Reason sent to clients for every failure other than a missing user.
pub const INTERNAL_ERROR_REASON: &str = "Internal server error";

/// Reason sent when the verified identity has no local user record.
pub const USER_NOT_FOUND_REASON: &str = "User does not exist";

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Token missing, invalid, or the verifier failed.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The token verified but no local user has that uid.
    #[error("user does not exist: {uid}")]
    UserNotFound { uid: String },

    /// Store error.
    #[error("storage error: {0}")]
    Store(#[from] notes_store::StoreError),

    /// The store did not acknowledge a delete.
    #[error("store did not acknowledge the delete")]
    Unacknowledged,

    /// The request body could not be decoded.
    #[error("malformed request: {0}")]
    MalformedInput(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The client-facing reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UserNotFound { .. } => USER_NOT_FOUND_REASON,
            _ => INTERNAL_ERROR_REASON,
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        Self::AuthFailure(err.to_string())
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub reason: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::AuthFailure(_) => tracing::warn!(error = %self, "Request not authenticated"),
            Self::UserNotFound { .. } => tracing::info!(error = %self, "Unknown user"),
            Self::MalformedInput(_) => tracing::warn!(error = %self, "Rejected request body"),
            Self::Store(_) | Self::Unacknowledged => {
                tracing::error!(error = %self, "Request failed")
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            reason: self.reason().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
