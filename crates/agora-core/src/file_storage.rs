//! File storage abstraction for post attachments.
//!
//! Trait-based so storage backends (local filesystem, object store) can be
//! swapped without touching the post write path. The application only ever
//! records the returned storage key on a post; file contents are never
//! interpreted.

use std::fmt;
use std::path::PathBuf;
use tokio::fs;

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content and return the storage key.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>;

    /// Delete a file by key. Deleting a missing file is not an error.
    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>;

    /// Public URL path for accessing a stored file.
    fn public_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Error type for file storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds the maximum allowed size.
    FileTooLarge { max_bytes: usize },

    /// I/O error (file system or similar).
    Io(std::io::Error),

    /// Invalid storage key format.
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl StorageError {
    /// HTTP mapping: key and size problems are the caller's fault,
    /// everything else is ours.
    pub fn into_app_error(self) -> crate::AppError {
        match self {
            Self::FileTooLarge { .. } | Self::InvalidKey(_) => crate::AppError::bad_request(self),
            Self::Io(_) => crate::AppError::internal(self),
        }
    }
}

/// Local filesystem storage serving files under a public URL prefix.
#[derive(Clone)]
pub struct LocalFileStorage {
    /// Directory where files land
    base_dir: PathBuf,

    /// Public URL prefix the router serves `base_dir` under (e.g. "/uploads")
    base_url: String,

    /// Maximum accepted file size in bytes
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::FileTooLarge {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);

            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn delete<'a>(
        &'a self,
        key: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), StorageError>> + Send + 'a>>
    {
        Box::pin(async move {
            Self::validate_key(key)?;

            let file_path = self.base_dir.join(key);

            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn public_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> LocalFileStorage {
        LocalFileStorage::new(
            PathBuf::from("./uploads"),
            "/uploads".to_string(),
            5 * 1024 * 1024,
        )
    }

    #[test]
    fn test_validate_key_accepts_valid_keys() {
        assert!(LocalFileStorage::validate_key("posts/attachment.png").is_ok());
        assert!(LocalFileStorage::validate_key("posts/abc-123.jpg").is_ok());
        assert!(LocalFileStorage::validate_key("avatars/profile_pic.webp").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_path_traversal() {
        assert!(LocalFileStorage::validate_key("../../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("..\\windows\\system32").is_err());
    }

    #[test]
    fn test_validate_key_rejects_absolute_paths() {
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn test_public_url_formats_correctly() {
        let url = storage().public_url("posts/attachment.png").unwrap();
        assert_eq!(url, "/uploads/posts/attachment.png");
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_content() {
        let storage = LocalFileStorage::new(
            std::env::temp_dir().join("agora-storage-test"),
            "/uploads".to_string(),
            8,
        );
        let result = storage.save("posts/too-big.bin", b"0123456789").await;
        assert!(matches!(result, Err(StorageError::FileTooLarge { .. })));
    }
}
