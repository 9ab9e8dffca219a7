use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use agora_auth::VerifiedIdentity;
use agora_core::{AppError, PaginationMeta};

use super::model::{PaginatedUsersResponse, User, UserFilterParams};

const USER_COLUMNS: &str = "id, google_id, email, display_name, avatar_url, role, created_at";

pub struct UserService;

impl UserService {
    /// Map a verified external identity onto a local user record.
    ///
    /// Lookup order is provider subject id first, then email, so an account
    /// created before the provider link existed is re-linked rather than
    /// duplicated. Profile fields (display name, avatar) are refreshed from
    /// the identity on every login; `id`, `email`, and `role` are never
    /// touched here. New accounts always start with role `user`.
    ///
    /// This is the only write path to the users table from the login flow.
    /// The whole operation runs in one transaction: a canceled caller leaves
    /// either a complete upsert or nothing.
    #[instrument(skip(db, identity), fields(identity.email = %identity.email, db.table = "users"))]
    pub async fn upsert_from_identity(
        db: &PgPool,
        identity: &VerifiedIdentity,
    ) -> Result<User, AppError> {
        let mut tx = db.begin().await?;

        let by_subject = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE google_id = $1"
        ))
        .bind(&identity.subject)
        .fetch_optional(&mut *tx)
        .await?;

        let existing = match by_subject {
            Some(user) => Some(user),
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
                ))
                .bind(&identity.email)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let user = match existing {
            Some(user) => {
                debug!(user.id = %user.id, "Refreshing profile from identity claim");

                // COALESCE keeps an already-established provider link; a
                // fresh claim never replaces one.
                sqlx::query_as::<_, User>(&format!(
                    "UPDATE users
                     SET display_name = $2, avatar_url = $3, google_id = COALESCE(google_id, $4)
                     WHERE id = $1
                     RETURNING {USER_COLUMNS}"
                ))
                .bind(user.id)
                .bind(&identity.name)
                .bind(&identity.avatar_url)
                .bind(&identity.subject)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                debug!("First login for this identity, creating user");

                sqlx::query_as::<_, User>(&format!(
                    "INSERT INTO users (google_id, email, display_name, avatar_url)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {USER_COLUMNS}"
                ))
                .bind(&identity.subject)
                .bind(&identity.email)
                .bind(&identity.name)
                .bind(&identity.avatar_url)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        info!(user.id = %user.id, user.role = %user.role, "Identity upserted");

        Ok(user)
    }

    /// Point lookup used by the session validator's user-existence check.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;

        Ok(user)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn get_all_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::new();
        let mut params = Vec::new();

        if let Some(email) = &filters.email {
            params.push(format!("%{}%", email));
            where_clause.push_str(&format!(" AND email ILIKE ${}", params.len()));
        }

        if let Some(name) = &filters.name {
            params.push(format!("%{}%", name));
            where_clause.push_str(&format!(" AND display_name ILIKE ${}", params.len()));
        }

        if let Some(role) = &filters.role {
            params.push(role.as_str().to_string());
            where_clause.push_str(&format!(" AND role = ${}::user_role", params.len()));
        }

        let count_query = format!("SELECT COUNT(*) FROM users WHERE 1=1{}", where_clause);

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting users");
            AppError::from(e)
        })?;

        let data_query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE 1=1{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            where_clause, limit, offset
        );

        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let users = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching users");
            AppError::from(e)
        })?;

        let has_more = offset + limit < total;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        })
    }
}
