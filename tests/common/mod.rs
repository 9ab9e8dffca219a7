use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use agora::agora_auth::{IdentityProvider, VerifiedIdentity, create_session_token};
use agora::agora_config::{CorsConfig, JwtConfig, StorageConfig};
use agora::agora_core::{AppError, LocalFileStorage};
use agora::modules::categories::model::Category;
use agora::modules::posts::model::Post;
use agora::modules::users::model::User;
use agora::router::init_router;
use agora::state::AppState;

/// Identity provider stub: accepts exactly one token value and returns a
/// fixed identity for it, rejecting everything else the way the real
/// verifier does.
pub struct StubIdentityProvider {
    pub expected_token: String,
    pub identity: VerifiedIdentity,
}

impl IdentityProvider for StubIdentityProvider {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<VerifiedIdentity, AppError>> + Send + 'a>> {
        Box::pin(async move {
            if token == self.expected_token {
                Ok(self.identity.clone())
            } else {
                Err(AppError::invalid_credential(
                    "Identity token verification failed".to_string(),
                ))
            }
        })
    }
}

#[allow(dead_code)]
pub fn test_identity(email: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        subject: format!("sub-{}", Uuid::new_v4()),
        email: email.to_string(),
        name: "Test User".to_string(),
        avatar_url: Some("https://example.com/avatar.png".to_string()),
    }
}

#[allow(dead_code)]
pub fn stub_provider(token: &str, identity: VerifiedIdentity) -> Arc<dyn IdentityProvider> {
    Arc::new(StubIdentityProvider {
        expected_token: token.to_string(),
        identity,
    })
}

/// A provider that accepts nothing, for tests that never hit the login path.
#[allow(dead_code)]
pub fn denying_provider() -> Arc<dyn IdentityProvider> {
    Arc::new(StubIdentityProvider {
        expected_token: format!("never-{}", Uuid::new_v4()),
        identity: test_identity("nobody@test.com"),
    })
}

#[allow(dead_code)]
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        session_expiry: 604800,
    }
}

#[allow(dead_code)]
pub fn test_state(pool: PgPool, provider: Arc<dyn IdentityProvider>) -> AppState {
    let upload_dir = std::env::temp_dir()
        .join(format!("agora-test-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let storage_config = StorageConfig {
        upload_dir: upload_dir.clone(),
        base_url: "/uploads".to_string(),
        max_upload_bytes: 5 * 1024 * 1024,
    };

    AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        storage: LocalFileStorage::new(
            PathBuf::from(&upload_dir),
            storage_config.base_url.clone(),
            storage_config.max_upload_bytes,
        ),
        storage_config,
        identity_provider: provider,
    }
}

#[allow(dead_code)]
pub fn setup_test_app(pool: PgPool, provider: Arc<dyn IdentityProvider>) -> axum::Router {
    init_router(test_state(pool, provider))
}

/// Create a test user directly in the store.
/// `role` is "user" or "admin".
#[allow(dead_code)]
pub async fn create_test_user(pool: &PgPool, email: &str, role: &str) -> User {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (google_id, email, display_name, avatar_url, role)
         VALUES ($1, $2, $3, $4, $5::user_role)
         RETURNING id, google_id, email, display_name, avatar_url, role, created_at",
    )
    .bind(format!("sub-{}", Uuid::new_v4()))
    .bind(email)
    .bind("Test User")
    .bind(Option::<String>::None)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub fn session_token_for(user: &User) -> String {
    create_session_token(user.id, &user.email, &test_jwt_config()).unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn create_test_category(pool: &PgPool, created_by: Uuid, name: &str) -> Category {
    sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description, created_by)
         VALUES ($1, $2, $3)
         RETURNING id, name, description, icon, created_by, created_at",
    )
    .bind(name)
    .bind("Test category description")
    .bind(created_by)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_post(pool: &PgPool, author_id: Uuid, category_id: Uuid) -> Post {
    sqlx::query_as::<_, Post>(
        "INSERT INTO posts (title, content, category_id, author_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, title, content, category_id, author_id, attachment_path,
                   created_at, updated_at",
    )
    .bind("Test post")
    .bind("<p>Test content</p>")
    .bind(category_id)
    .bind(author_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub fn generate_unique_category_name() -> String {
    format!("Category {}", Uuid::new_v4())
}

/// Build a multipart/form-data body from plain text fields.
#[allow(dead_code)]
pub fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}
