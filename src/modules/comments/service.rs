use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use agora_core::AppError;
use agora_sanitize::render_markdown;

use crate::middleware::role::check_owner_or_admin;
use crate::modules::users::model::User;

use super::model::{Comment, CommentWithAuthor, CreateCommentDto};

pub struct CommentService;

impl CommentService {
    /// Create a comment. The submitted Markdown goes through the sanitizer;
    /// only the safe HTML is stored.
    #[instrument(skip(db, dto), fields(comment.post = %post_id, db.operation = "INSERT", db.table = "comments"))]
    pub async fn create_comment(
        db: &PgPool,
        author_id: Uuid,
        post_id: Uuid,
        dto: CreateCommentDto,
    ) -> Result<Comment, AppError> {
        let post_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(db)
            .await?;

        if post_exists == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Post not found")));
        }

        let content = render_markdown(&dto.content);

        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (content, post_id, author_id)
             VALUES ($1, $2, $3)
             RETURNING id, content, post_id, author_id, created_at",
        )
        .bind(&content)
        .bind(post_id)
        .bind(author_id)
        .fetch_one(db)
        .await?;

        info!(comment.id = %comment.id, comment.post = %post_id, "Comment created");

        Ok(comment)
    }

    #[instrument(skip(db), fields(comment.post = %post_id, db.operation = "SELECT", db.table = "comments"))]
    pub async fn get_comments_for_post(
        db: &PgPool,
        post_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        let post_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(db)
            .await?;

        if post_exists == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Post not found")));
        }

        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT cm.id, cm.content, cm.post_id, cm.author_id,
                    u.display_name AS author_name, u.avatar_url AS author_avatar,
                    cm.created_at
             FROM comments cm
             JOIN users u ON u.id = cm.author_id
             WHERE cm.post_id = $1
             ORDER BY cm.created_at ASC",
        )
        .bind(post_id)
        .fetch_all(db)
        .await?;

        Ok(comments)
    }

    /// Delete a comment (author or admin).
    #[instrument(skip(db, actor), fields(comment.id = %id, db.operation = "DELETE", db.table = "comments"))]
    pub async fn delete_comment(db: &PgPool, actor: &User, id: Uuid) -> Result<(), AppError> {
        let author_id =
            sqlx::query_scalar::<_, Uuid>("SELECT author_id FROM comments WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Comment not found")))?;

        check_owner_or_admin(actor, author_id, "comment")?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(comment.id = %id, actor.id = %actor.id, "Comment deleted");

        Ok(())
    }
}
