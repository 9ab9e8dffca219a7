//! Post data models and DTOs.
//!
//! `content` always holds sanitized HTML produced by `agora_sanitize`; the
//! raw Markdown submission is discarded after rendering and is never stored
//! or echoed back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use agora_core::{PaginationMeta, PaginationParams};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    /// Sanitized HTML fragment, safe to render directly
    pub content: String,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub attachment_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post joined with its category/author names and comment count, as shown
/// in listings and detail views.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PostWithMeta {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub attachment_path: Option<String>,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort orders for the post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    /// Most recent first (default)
    Newest,
    /// Most commented first
    Popular,
}

/// Query parameters for the post listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostFilterParams {
    pub category_id: Option<Uuid>,
    pub sort: Option<PostSort>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Fields of a new post, assembled from the multipart form.
#[derive(Debug, Clone, Validate)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    pub category_id: Uuid,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

/// Paginated response containing posts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedPostsResponse {
    pub data: Vec<PostWithMeta>,
    pub meta: PaginationMeta,
}
