//! # Agora Core
//!
//! Core types, errors, and utilities for the Agora forum API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error types with HTTP response conversion and
//!   machine-readable error codes
//! - [`pagination`]: Pagination utilities for API responses
//! - [`file_storage`]: Trait-based file storage for post attachments
//!
//! # Example
//!
//! ```ignore
//! use agora_core::errors::AppError;
//! use agora_core::pagination::{PaginationMeta, PaginationParams};
//!
//! // Create an error with a taxonomy code
//! let error = AppError::forbidden("Administrator privileges required".to_string());
//!
//! // Use pagination
//! let params = PaginationParams::default();
//! let limit = params.limit();
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorCode};
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use pagination::{PaginationMeta, PaginationParams};
