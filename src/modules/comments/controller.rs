use axum::{Json, extract::Path, extract::State, http::StatusCode};
use uuid::Uuid;

use agora_core::AppError;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{Comment, CommentWithAuthor, CreateCommentDto};
use super::service::CommentService;

/// List comments on a post
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Comments on the post", body = [CommentWithAuthor]),
        (status = 404, description = "Post not found")
    ),
    tag = "Comments"
)]
pub async fn get_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<CommentWithAuthor>>, AppError> {
    let comments = CommentService::get_comments_for_post(&state.db, post_id).await?;
    Ok(Json(comments))
}

/// Comment on a post (authenticated)
#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = CommentService::create_comment(&state.db, user.id, post_id, dto).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment (author or admin)
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the author or an admin"),
        (status = 404, description = "Comment not found")
    ),
    tag = "Comments",
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CommentService::delete_comment(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
