//! # Agora Auth
//!
//! Session tokens and federated identity verification for the Agora forum
//! API.
//!
//! This crate provides:
//!
//! - [`claims`]: Session token claims
//! - [`jwt`]: Session token creation and verification
//! - [`provider`]: The [`provider::IdentityProvider`] trait and its Google
//!   implementation, which verifies externally issued ID tokens against the
//!   provider's published keys
//!
//! # Login flow
//!
//! ```ignore
//! use agora_auth::{GoogleIdentityProvider, IdentityProvider, create_session_token};
//! use agora_config::{GoogleConfig, JwtConfig};
//!
//! let provider = GoogleIdentityProvider::new(GoogleConfig::from_env());
//! let jwt_config = JwtConfig::from_env();
//!
//! // Verify the externally issued token, then mint a local session
//! let identity = provider.verify(&id_token).await?;
//! let user = upsert_local_user(&identity).await?;
//! let session = create_session_token(user.id, &user.email, &jwt_config)?;
//! ```

pub mod claims;
pub mod jwt;
pub mod provider;

// Re-export commonly used types at crate root
pub use claims::SessionClaims;
pub use jwt::{create_session_token, create_session_token_at, verify_session_token};
pub use provider::{GoogleIdentityProvider, IdTokenVerifier, IdentityProvider, VerifiedIdentity};
