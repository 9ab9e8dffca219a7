//! Authentication extractors.
//!
//! Authentication is a two-step chain, strictly ordered:
//!
//! 1. [`AuthUser`] extracts the bearer token and verifies the session
//!    signature and expiry. Pure computation, no I/O.
//! 2. [`CurrentUser`] builds on it with a single point lookup to confirm the
//!    referenced account still exists, tolerating out-of-band removal.
//!
//! Handlers that only need the caller's identity claim take [`AuthUser`];
//! anything that acts on behalf of the user takes [`CurrentUser`]. An
//! extraction failure short-circuits the request before the handler runs.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use agora_auth::{SessionClaims, verify_session_token};
use agora_core::AppError;

use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// Extractor that validates the session token and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionClaims);

impl AuthUser {
    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthenticated("Invalid user ID in session token".to_string()))
    }

    /// Get the user's email
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthenticated("Invalid authorization header format".to_string())
        })?;

        let claims = verify_session_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Extractor that resolves the authenticated caller to their user record.
///
/// Fails with `USER_NOT_FOUND` when the session references an account that
/// has since been removed.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let user_id = auth_user.user_id()?;

        let user = UserService::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found("Account no longer exists".to_string()))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_claims(sub: &str) -> SessionClaims {
        SessionClaims {
            sub: sub.to_string(),
            email: "test@example.com".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_valid_uuid() {
        let user_id = Uuid::new_v4();
        let auth_user = AuthUser(create_test_claims(&user_id.to_string()));

        assert_eq!(auth_user.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        let auth_user = AuthUser(create_test_claims("not-a-uuid"));
        assert!(auth_user.user_id().is_err());
    }

    #[test]
    fn test_email_accessor() {
        let auth_user = AuthUser(create_test_claims(&Uuid::new_v4().to_string()));
        assert_eq!(auth_user.email(), "test@example.com");
    }
}
