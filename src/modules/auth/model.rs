use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::User;

/// Login request carrying the identity provider's ID token.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// ID token issued by the identity provider (Google Sign-In credential)
    #[validate(length(min = 1, message = "token must not be empty"))]
    pub token: String,
}

/// Login response: a freshly minted session token plus the resolved user.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Response for the session verification endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub user: User,
}
