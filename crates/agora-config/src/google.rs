use std::env;

/// Google identity provider configuration.
///
/// `client_id` is the OAuth client this application is registered as; ID
/// tokens are only accepted when their audience matches it exactly.
#[derive(Clone, Debug)]
pub struct GoogleConfig {
    pub client_id: String,
    /// JWKS endpoint holding Google's current signing keys
    pub certs_url: String,
}

impl GoogleConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID must be set"),
            certs_url: env::var("GOOGLE_CERTS_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/certs".to_string()),
        }
    }
}
