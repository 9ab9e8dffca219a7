//! # Agora Config
//!
//! Configuration types for the Agora forum API.
//!
//! This crate provides configuration structures loaded from environment
//! variables:
//!
//! - [`jwt`]: Session token signing configuration
//! - [`google`]: Google identity provider configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`storage`]: Attachment storage configuration
//!
//! # Example
//!
//! ```ignore
//! use agora_config::{CorsConfig, GoogleConfig, JwtConfig, StorageConfig};
//!
//! // Load all configs from environment
//! let jwt_config = JwtConfig::from_env();
//! let google_config = GoogleConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! ```

pub mod cors;
pub mod google;
pub mod jwt;
pub mod storage;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use google::GoogleConfig;
pub use jwt::JwtConfig;
pub use storage::StorageConfig;
