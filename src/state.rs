use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use agora_auth::{GoogleIdentityProvider, IdentityProvider};
use agora_config::{CorsConfig, GoogleConfig, JwtConfig, StorageConfig};
use agora_core::LocalFileStorage;

use crate::config::database::init_db_pool;

/// Shared application state.
///
/// Everything here is read-only after startup and cheap to clone: the pool
/// and the identity provider are reference-counted, the configs are plain
/// data.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub storage: LocalFileStorage,
}

pub async fn init_app_state() -> AppState {
    let storage_config = StorageConfig::from_env();
    let storage = LocalFileStorage::new(
        PathBuf::from(&storage_config.upload_dir),
        storage_config.base_url.clone(),
        storage_config.max_upload_bytes,
    );

    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        identity_provider: Arc::new(GoogleIdentityProvider::new(GoogleConfig::from_env())),
        storage_config,
        storage,
    }
}
