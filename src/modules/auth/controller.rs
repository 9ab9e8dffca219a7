use axum::Json;
use axum::extract::State;

use agora_core::AppError;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{LoginRequest, LoginResponse, VerifyResponse};
use super::service::AuthService;

use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Sign in with a Google ID token and receive a session token
#[utoipa::path(
    post,
    path = "/auth/google",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Identity token failed verification", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn google_login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_with_provider(
        &state.db,
        state.identity_provider.as_ref(),
        &state.jwt_config,
        &dto.token,
    )
    .await?;

    Ok(Json(response))
}

/// Verify the bearer session token and return the current user
#[utoipa::path(
    get,
    path = "/auth/verify",
    responses(
        (status = 200, description = "Session is valid", body = VerifyResponse),
        (status = 401, description = "Missing, invalid, or expired session token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn verify_session(CurrentUser(user): CurrentUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { user })
}
