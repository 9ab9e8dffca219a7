//! User data models and DTOs.
//!
//! Users are created and updated exclusively by the login flow (see
//! [`crate::modules::users::service::UserService::upsert_from_identity`]);
//! nothing else writes to the identity table. Role escalation happens only
//! through the `promote-admin` CLI command, never from identity provider
//! claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use agora_core::{PaginationMeta, PaginationParams};

/// Coarse authorization role attached to a local user record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Whether this role satisfies a requirement: admins satisfy every
    /// requirement, plain users only the `User` requirement.
    pub fn satisfies(&self, required: UserRole) -> bool {
        match required {
            UserRole::User => true,
            UserRole::Admin => *self == UserRole::Admin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local user record mapped from a federated identity.
///
/// Serializes as `{id, email, name, avatar, role, created_at}`; the provider
/// subject id is internal and never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub google_id: Option<String>,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for filtering users (admin listing).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<UserRole>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing users.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}
