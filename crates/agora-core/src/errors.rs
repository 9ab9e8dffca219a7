//! Application error types.
//!
//! Every failure that reaches a client is an [`AppError`]: an HTTP status, a
//! machine-readable [`ErrorCode`], and a human-readable message. Responses
//! render as `{"error": "...", "code": "..."}` so clients can branch on the
//! code without parsing messages.
//!
//! Identity and session failures use dedicated codes: a forged session token
//! (`UNAUTHENTICATED`) is distinct from an expired one (`SESSION_EXPIRED`),
//! and a session pointing at a deleted account is `USER_NOT_FOUND`.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Machine-readable error codes returned alongside every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// External identity token failed verification (signature, expiry,
    /// issuer, or audience).
    InvalidCredential,
    /// Session token missing, malformed, or forged.
    Unauthenticated,
    /// Session token valid but past its absolute expiry.
    SessionExpired,
    /// Session token references an account that no longer exists.
    UserNotFound,
    /// Authenticated, but the caller's role does not permit the operation.
    Forbidden,
    BadRequest,
    ValidationFailed,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
        }
    }

    /// Bad or forged external identity token. The user must re-authenticate
    /// with the provider.
    pub fn invalid_credential(msg: String) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidCredential,
            anyhow::anyhow!(msg),
        )
    }

    /// Missing, malformed, or forged session token.
    pub fn unauthenticated(msg: String) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthenticated,
            anyhow::anyhow!(msg),
        )
    }

    /// Session token with a valid signature but a past expiry. Kept distinct
    /// from [`AppError::unauthenticated`] so a silent-refresh flow can be
    /// added without weakening the forgery check.
    pub fn session_expired(msg: String) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::SessionExpired,
            anyhow::anyhow!(msg),
        )
    }

    /// Session token referencing a user id that no longer exists.
    pub fn user_not_found(msg: String) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::UserNotFound,
            anyhow::anyhow!(msg),
        )
    }

    pub fn forbidden(msg: String) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            anyhow::anyhow!(msg),
        )
    }

    pub fn internal_error(msg: String) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            anyhow::anyhow!(msg),
        )
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ValidationFailed,
            err,
        )
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, ErrorCode::Conflict, err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code.as_str(), error = %self.error, "request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string(),
            "code": self.code.as_str(),
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
