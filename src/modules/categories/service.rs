use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use agora_core::AppError;

use super::model::{Category, CategoryWithPostCount, CreateCategoryDto, UpdateCategoryDto};

const CATEGORY_COLUMNS: &str = "id, name, description, icon, created_by, created_at";

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db, dto), fields(category.name = %dto.name, db.operation = "INSERT", db.table = "categories"))]
    pub async fn create_category(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateCategoryDto,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description, icon, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.icon)
        .bind(created_by)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(category.name = %dto.name, "Attempted to create category with existing name");
                return AppError::bad_request(anyhow::anyhow!("Category name already exists"));
            }
            error!(error = %e, category.name = %dto.name, "Database error creating category");
            AppError::from(e)
        })?;

        info!(category.id = %category.id, category.name = %category.name, "Category created");

        Ok(category)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "categories"))]
    pub async fn get_all_categories(db: &PgPool) -> Result<Vec<CategoryWithPostCount>, AppError> {
        let categories = sqlx::query_as::<_, CategoryWithPostCount>(
            "SELECT c.id, c.name, c.description, c.icon, c.created_by, c.created_at,
                    COUNT(p.id) AS post_count
             FROM categories c
             LEFT JOIN posts p ON p.category_id = c.id
             GROUP BY c.id
             ORDER BY c.created_at ASC",
        )
        .fetch_all(db)
        .await?;

        Ok(categories)
    }

    pub async fn get_category_by_id(
        db: &PgPool,
        id: Uuid,
    ) -> Result<CategoryWithPostCount, AppError> {
        sqlx::query_as::<_, CategoryWithPostCount>(
            "SELECT c.id, c.name, c.description, c.icon, c.created_by, c.created_at,
                    COUNT(p.id) AS post_count
             FROM categories c
             LEFT JOIN posts p ON p.category_id = c.id
             WHERE c.id = $1
             GROUP BY c.id",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Category not found")))
    }

    #[instrument(skip(db, dto), fields(category.id = %id, db.operation = "UPDATE", db.table = "categories"))]
    pub async fn update_category(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCategoryDto,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 icon = COALESCE($4, icon)
             WHERE id = $1
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.icon)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Category name already exists"));
            }
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Category not found")))?;

        info!(category.id = %category.id, "Category updated");

        Ok(category)
    }

    /// Deleting a category with live posts is refused; posts must be removed
    /// or re-categorized first.
    #[instrument(skip(db), fields(category.id = %id, db.operation = "DELETE", db.table = "categories"))]
    pub async fn delete_category(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    warn!(category.id = %id, "Refused to delete category with posts");
                    return AppError::conflict(anyhow::anyhow!(
                        "Category still has posts and cannot be deleted"
                    ));
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Category not found")));
        }

        info!(category.id = %id, "Category deleted");

        Ok(())
    }
}
