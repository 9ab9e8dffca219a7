//! Configuration for the Agora API.
//!
//! Most configuration lives in the `agora-config` crate as env-loaded
//! structs; this module adds the database pool initialization and re-exports
//! the config types the application uses.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `JWT_SECRET`, `SESSION_EXPIRY`: session token signing
//! - `GOOGLE_CLIENT_ID`, `GOOGLE_CERTS_URL`: identity provider
//! - `ALLOWED_ORIGINS`: CORS
//! - `UPLOAD_DIR`, `UPLOAD_BASE_URL`, `MAX_UPLOAD_BYTES`: attachments

pub mod database;

pub use agora_config::{CorsConfig, GoogleConfig, JwtConfig, StorageConfig};
