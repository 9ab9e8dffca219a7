use std::env;

/// Attachment storage configuration.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory uploaded files are written to
    pub upload_dir: String,
    /// URL prefix the upload directory is served under
    pub base_url: String,
    /// Maximum accepted upload size in bytes (default: 5 MB)
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            base_url: env::var("UPLOAD_BASE_URL").unwrap_or_else(|_| "/uploads".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
        }
    }
}
