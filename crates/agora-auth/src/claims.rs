//! Session token claims.

use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// Sessions are stateless: the token carries the local user id and an
/// absolute expiry, nothing else. Role and profile data are looked up per
/// request so they always reflect the current database state.
///
/// # Fields
///
/// - `sub`: Local user ID (subject)
/// - `email`: User's email address at issuance
/// - `exp`: Absolute expiration timestamp (Unix seconds)
/// - `iat`: Issued-at timestamp (Unix seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Local user ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
