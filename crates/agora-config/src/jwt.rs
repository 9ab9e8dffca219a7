use std::env;

/// Session token signing configuration.
///
/// The secret is process-wide and loaded once at startup; rotating it
/// invalidates every outstanding session.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Absolute session lifetime in seconds (default: 7 days)
    pub session_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiry: env::var("SESSION_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604800), // 7 days
        }
    }
}
