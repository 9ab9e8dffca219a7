//! Role-based authorization for Axum.
//!
//! Authorization always runs after authentication: every entry point here
//! first resolves a [`CurrentUser`] and only then evaluates the role
//! predicate, so a role check is never made against an unauthenticated
//! context. Two composable forms are provided:
//!
//! 1. Layer-based middleware via [`require_admin`], for gating whole routers
//! 2. The [`RequireAdmin`] extractor, for gating individual handlers

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use agora_core::AppError;

use crate::middleware::auth::CurrentUser;
use crate::modules::users::model::{User, UserRole};
use crate::state::AppState;

/// Middleware function that rejects callers without the required role.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/", get(list_users))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(state, req, next, UserRole::Admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn require_role(
    state: AppState,
    req: Request,
    next: Next,
    required: UserRole,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let current = CurrentUser::from_request_parts(&mut parts, &state).await?;
    check_role(&current.0, required)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Extractor for handlers that require an administrator.
///
/// Wraps the resolved [`CurrentUser`] so handlers get the admin's record in
/// the same extraction.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn create_category(
///     RequireAdmin(CurrentUser(admin)): RequireAdmin,
///     ValidatedJson(dto): ValidatedJson<CreateCategoryDto>,
/// ) -> Result<Json<Category>, AppError> {
///     // Only admins reach this point
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        check_role(&current.0, UserRole::Admin)?;

        Ok(RequireAdmin(current))
    }
}

/// Check that a resolved user satisfies a role requirement.
pub fn check_role(user: &User, required: UserRole) -> Result<(), AppError> {
    if !user.role.satisfies(required) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {}, but user has role: {}",
            required, user.role
        )));
    }

    Ok(())
}

/// Check whether the actor may modify a resource: either they own it or
/// they are an administrator.
pub fn check_owner_or_admin(
    actor: &User,
    owner_id: uuid::Uuid,
    resource: &str,
) -> Result<(), AppError> {
    if actor.id != owner_id && actor.role != UserRole::Admin {
        return Err(AppError::forbidden(format!(
            "Only the author or an administrator can modify this {}",
            resource
        )));
    }

    Ok(())
}
