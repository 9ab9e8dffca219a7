use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A forum category. Owned by admins; referenced by posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Category with its live post count, as shown in listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CategoryWithPostCount {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

/// DTO for creating a category. Admin only.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Icon identifier for the category card (e.g. "fa-folder")
    pub icon: Option<String>,
}

/// DTO for updating a category. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub icon: Option<String>,
}
