use axum::{Json, extract::Query, extract::State, extract::rejection::QueryRejection};

use agora_core::AppError;

use crate::state::AppState;

use super::model::{PaginatedUsersResponse, UserFilterParams};
use super::service::UserService;

/// List users (moderation view).
///
/// The whole `/api/users` router is behind the admin gate; see
/// [`crate::router::init_router`].
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("email" = Option<String>, Query, description = "Filter by email (partial match)"),
        ("name" = Option<String>, Query, description = "Filter by display name (partial match)"),
        ("role" = Option<String>, Query, description = "Filter by role (user or admin)"),
        ("limit" = Option<i64>, Query, description = "Limit number of results"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination")
    ),
    responses(
        (status = 200, description = "Paginated list of users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_users(
    State(state): State<AppState>,
    filters: Result<Query<UserFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let users = UserService::get_all_users(&state.db, filters).await?;
    Ok(Json(users))
}
