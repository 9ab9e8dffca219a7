//! Session token creation and verification.
//!
//! Sessions are HS256 JWTs signed with the process-wide secret from
//! [`JwtConfig`]. There is no revocation list: a token is valid until its
//! absolute expiry, and rotating the secret invalidates every outstanding
//! session.
//!
//! Verification distinguishes an expired token from a forged one so callers
//! can surface `SESSION_EXPIRED` separately from `UNAUTHENTICATED`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use agora_config::JwtConfig;
use agora_core::AppError;

use crate::claims::SessionClaims;

/// Creates a session token for the given user, issued now.
pub fn create_session_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    create_session_token_at(user_id, email, Utc::now(), jwt_config)
}

/// Creates a session token with an explicit issuance instant.
///
/// The expiry is `issued_at + jwt_config.session_expiry`. Production code
/// goes through [`create_session_token`]; tests pass a fixed instant to
/// exercise expiry behavior deterministically.
pub fn create_session_token_at(
    user_id: Uuid,
    email: &str,
    issued_at: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let iat = issued_at.timestamp() as usize;
    let exp = iat + jwt_config.session_expiry as usize;

    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create session token: {}", e)))
}

/// Verifies a session token and returns the embedded claims.
///
/// # Errors
///
/// - `SESSION_EXPIRED` when the signature is valid but the absolute expiry
///   has passed
/// - `UNAUTHENTICATED` when the token is malformed or the signature does not
///   verify
pub fn verify_session_token(token: &str, jwt_config: &JwtConfig) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::session_expired("Session has expired".to_string())
        }
        _ => AppError::unauthenticated("Invalid session token".to_string()),
    })
}
