use sqlx::PgPool;
use tracing::{info, instrument};

use agora_auth::{IdentityProvider, create_session_token};
use agora_config::JwtConfig;
use agora_core::AppError;

use crate::modules::users::service::UserService;

use super::model::LoginResponse;

pub struct AuthService;

impl AuthService {
    /// The sign-in path: verify the external token, map the identity onto a
    /// local user, mint a session.
    ///
    /// Each step surfaces its own failure immediately; nothing here retries.
    #[instrument(skip_all)]
    pub async fn login_with_provider(
        db: &PgPool,
        provider: &dyn IdentityProvider,
        jwt_config: &JwtConfig,
        token: &str,
    ) -> Result<LoginResponse, AppError> {
        let identity = provider.verify(token).await?;

        let user = UserService::upsert_from_identity(db, &identity).await?;

        let session_token = create_session_token(user.id, &user.email, jwt_config)?;

        info!(user.id = %user.id, "Login succeeded");

        Ok(LoginResponse {
            token: session_token,
            user,
        })
    }
}
