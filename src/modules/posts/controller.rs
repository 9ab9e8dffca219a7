use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use agora_core::AppError;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::model::{CreatePostDto, PaginatedPostsResponse, Post, PostFilterParams, PostWithMeta};
use super::service::PostService;

/// List posts with author, category, and comment counts
#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("sort" = Option<String>, Query, description = "Sort order: newest (default) or popular"),
        ("limit" = Option<i64>, Query, description = "Limit number of results"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination")
    ),
    responses(
        (status = 200, description = "Paginated list of posts", body = PaginatedPostsResponse)
    ),
    tag = "Posts"
)]
pub async fn get_posts(
    State(state): State<AppState>,
    filters: Result<Query<PostFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedPostsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let posts = PostService::get_all_posts(&state.db, filters).await?;
    Ok(Json(posts))
}

/// Get a single post
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostWithMeta),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostWithMeta>, AppError> {
    let post = PostService::get_post_by_id(&state.db, id).await?;
    Ok(Json(post))
}

/// Create a post from a multipart form (authenticated)
///
/// Expects fields `title`, `category_id`, `content` (Markdown) and an
/// optional `file` attachment. The content is sanitized before it is stored;
/// clients always receive safe HTML back.
#[utoipa::path(
    post,
    path = "/api/posts",
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Missing or invalid form fields"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let mut title = None;
    let mut category_id = None;
    let mut content = None;
    let mut attachment: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());

        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid title field: {}", e))
                })?);
            }
            Some("category_id") => {
                let raw = field.text().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid category_id field: {}", e))
                })?;
                category_id = Some(Uuid::parse_str(raw.trim()).map_err(|_| {
                    AppError::bad_request(anyhow::anyhow!("category_id is not a valid UUID"))
                })?);
            }
            Some("content") => {
                content = Some(field.text().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid content field: {}", e))
                })?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid file field: {}", e))
                })?;
                if !bytes.is_empty() {
                    attachment = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let dto = CreatePostDto {
        title: title
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("title is required")))?,
        category_id: category_id
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("category_id is required")))?,
        content: content
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("content is required")))?,
    };

    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let post =
        PostService::create_post(&state.db, &state.storage, user.id, dto, attachment).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Delete a post (author or admin)
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the author or an admin"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PostService::delete_post(&state.db, &state.storage, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
