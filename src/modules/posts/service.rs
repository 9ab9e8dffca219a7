use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use agora_core::{AppError, FileStorage, LocalFileStorage, PaginationMeta};
use agora_sanitize::render_markdown;

use crate::middleware::role::check_owner_or_admin;
use crate::modules::users::model::User;

use super::model::{
    CreatePostDto, PaginatedPostsResponse, Post, PostFilterParams, PostSort, PostWithMeta,
};

const POST_COLUMNS: &str =
    "id, title, content, category_id, author_id, attachment_path, created_at, updated_at";

const POST_META_SELECT: &str = "SELECT p.id, p.title, p.content, p.category_id,
            c.name AS category_name, p.author_id,
            u.display_name AS author_name, u.avatar_url AS author_avatar,
            p.attachment_path,
            (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count,
            p.created_at, p.updated_at
     FROM posts p
     JOIN categories c ON c.id = p.category_id
     JOIN users u ON u.id = p.author_id";

pub struct PostService;

impl PostService {
    /// Create a post from the submitted form.
    ///
    /// The submitted Markdown is rendered through the sanitizer and only the
    /// sanitized HTML is stored; the raw input is dropped here. An optional
    /// attachment is written to storage first and its key recorded on the
    /// row.
    #[instrument(skip(db, storage, dto, attachment), fields(post.title = %dto.title, db.operation = "INSERT", db.table = "posts"))]
    pub async fn create_post(
        db: &PgPool,
        storage: &LocalFileStorage,
        author_id: Uuid,
        dto: CreatePostDto,
        attachment: Option<(String, Vec<u8>)>,
    ) -> Result<Post, AppError> {
        let category_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = $1")
                .bind(dto.category_id)
                .fetch_one(db)
                .await?;

        if category_exists == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!("Unknown category")));
        }

        let content = render_markdown(&dto.content);

        let attachment_path = match attachment {
            Some((file_name, bytes)) => {
                let key = attachment_key(&file_name);
                let saved = storage
                    .save(&key, &bytes)
                    .await
                    .map_err(|e| e.into_app_error())?;
                Some(saved)
            }
            None => None,
        };

        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, content, category_id, author_id, attachment_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {POST_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&content)
        .bind(dto.category_id)
        .bind(author_id)
        .bind(&attachment_path)
        .fetch_one(db)
        .await?;

        info!(post.id = %post.id, post.author = %author_id, "Post created");

        Ok(post)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "posts"))]
    pub async fn get_all_posts(
        db: &PgPool,
        filters: PostFilterParams,
    ) -> Result<PaginatedPostsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let (where_clause, count_binds_category) = match filters.category_id {
            Some(_) => (" WHERE p.category_id = $1", true),
            None => ("", false),
        };

        let order_clause = match filters.sort.unwrap_or(PostSort::Newest) {
            PostSort::Newest => " ORDER BY p.created_at DESC",
            PostSort::Popular => " ORDER BY comment_count DESC, p.created_at DESC",
        };

        let count_query = format!(
            "SELECT COUNT(*) FROM posts p{}",
            if count_binds_category {
                " WHERE p.category_id = $1"
            } else {
                ""
            }
        );

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(category_id) = filters.category_id {
            count_sql = count_sql.bind(category_id);
        }
        let total = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting posts");
            AppError::from(e)
        })?;

        let data_query = format!(
            "{POST_META_SELECT}{}{} LIMIT {} OFFSET {}",
            where_clause, order_clause, limit, offset
        );

        let mut data_sql = sqlx::query_as::<_, PostWithMeta>(&data_query);
        if let Some(category_id) = filters.category_id {
            data_sql = data_sql.bind(category_id);
        }
        let posts = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching posts");
            AppError::from(e)
        })?;

        let has_more = offset + limit < total;

        Ok(PaginatedPostsResponse {
            data: posts,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        })
    }

    pub async fn get_post_by_id(db: &PgPool, id: Uuid) -> Result<PostWithMeta, AppError> {
        sqlx::query_as::<_, PostWithMeta>(&format!("{POST_META_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Post not found")))
    }

    /// Delete a post (author or admin). Comments cascade; the attachment is
    /// removed from storage best-effort after the row is gone.
    #[instrument(skip(db, storage, actor), fields(post.id = %id, db.operation = "DELETE", db.table = "posts"))]
    pub async fn delete_post(
        db: &PgPool,
        storage: &LocalFileStorage,
        actor: &User,
        id: Uuid,
    ) -> Result<(), AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Post not found")))?;

        check_owner_or_admin(actor, post.author_id, "post")?;

        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if let Some(path) = &post.attachment_path
            && let Err(e) = storage.delete(path).await
        {
            warn!(error = %e, attachment = %path, "Failed to remove attachment for deleted post");
        }

        info!(post.id = %id, actor.id = %actor.id, "Post deleted");

        Ok(())
    }
}

/// Storage key for an uploaded attachment: a fresh UUID plus the original
/// file extension when it is plain alphanumeric.
fn attachment_key(file_name: &str) -> String {
    let ext = file_name
        .rsplit('.')
        .next()
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= 10
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && *ext != file_name
        })
        .map(|ext| ext.to_ascii_lowercase());

    match ext {
        Some(ext) => format!("posts/{}.{}", Uuid::new_v4(), ext),
        None => format!("posts/{}", Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_key_keeps_extension() {
        let key = attachment_key("photo.PNG");
        assert!(key.starts_with("posts/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_attachment_key_drops_weird_extension() {
        let key = attachment_key("archive.tar.gz../../etc");
        assert!(key.starts_with("posts/"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_attachment_key_no_extension() {
        let key = attachment_key("README");
        assert!(key.starts_with("posts/"));
        assert!(!key.contains('.'));
    }
}
