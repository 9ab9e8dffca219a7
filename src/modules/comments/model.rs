use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A comment on a post. `content` is sanitized HTML, like post content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with author display data for listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a comment.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    /// Markdown body; sanitized before storage
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_dto_validation() {
        let dto = CreateCommentDto {
            content: "".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = CreateCommentDto {
            content: "Nice post!".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
