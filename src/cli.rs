//! CLI commands run before server startup.
//!
//! Role escalation is deliberately not reachable through the API or the
//! login flow; `promote-admin` is the only path to the `admin` role.

use sqlx::PgPool;

use agora_core::AppError;

use crate::modules::users::model::{User, UserRole};

/// Promote an existing user to administrator, addressed by email.
pub async fn promote_admin(pool: &PgPool, email: &str) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET role = 'admin'
         WHERE email = $1
         RETURNING id, google_id, email, display_name, avatar_url, role, created_at",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No user with email {}", email)))?;

    debug_assert_eq!(user.role, UserRole::Admin);

    Ok(user)
}
