//! Federated identity verification.
//!
//! The login path accepts an ID token issued by an external identity
//! provider and trusts it only after signature, expiry, issuer, and audience
//! checks all pass. [`IdentityProvider`] is the seam the application codes
//! against; [`GoogleIdentityProvider`] is the production implementation and
//! tests substitute a stub.
//!
//! Verification itself lives in [`IdTokenVerifier`], which is pure: the key
//! set, algorithm, audience, and accepted issuers are injected, so the
//! tampering/audience/expiry paths are testable without network access.

use std::future::Future;
use std::pin::Pin;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;

use agora_config::GoogleConfig;
use agora_core::AppError;

/// Issuer values Google uses for ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// The verified payload of an externally issued identity assertion.
///
/// Only constructed after every check in [`IdTokenVerifier::verify`] has
/// passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider-scoped stable subject id
    pub subject: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Claims carried in a provider ID token.
///
/// Expiry, audience, and issuer are enforced by the JWT validation itself;
/// this struct only extracts the profile fields.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// A source of verified external identities.
///
/// Object-safe so the application state can hold `Arc<dyn IdentityProvider>`
/// and tests can swap in a stub.
pub trait IdentityProvider: Send + Sync {
    /// Verify an externally issued token and extract the identity it
    /// asserts. Fails with `INVALID_CREDENTIAL` on any verification failure;
    /// a token is never partially trusted.
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<VerifiedIdentity, AppError>> + Send + 'a>>;
}

/// Pure ID token verifier over an injected key set.
pub struct IdTokenVerifier {
    /// Provider signing keys, each with its `kid` when the JWKS carried one
    keys: Vec<(Option<String>, DecodingKey)>,
    algorithm: Algorithm,
    audience: String,
    issuers: Vec<String>,
}

impl IdTokenVerifier {
    pub fn new(
        keys: Vec<(Option<String>, DecodingKey)>,
        algorithm: Algorithm,
        audience: String,
        issuers: Vec<String>,
    ) -> Self {
        Self {
            keys,
            algorithm,
            audience,
            issuers,
        }
    }

    /// Verify signature, expiry, issuer, and audience, in that order of
    /// trust: the token is decoded only with keys matching its `kid`, and
    /// claims are not inspected until validation has passed.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let header = decode_header(token)
            .map_err(|_| AppError::invalid_credential("Malformed identity token".to_string()))?;

        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&self.issuers);

        let candidates: Vec<&DecodingKey> = self
            .keys
            .iter()
            .filter(|(kid, _)| match (&header.kid, kid) {
                (Some(token_kid), Some(key_kid)) => token_kid == key_kid,
                _ => true,
            })
            .map(|(_, key)| key)
            .collect();

        if candidates.is_empty() {
            return Err(AppError::invalid_credential(
                "Identity token signed with an unknown key".to_string(),
            ));
        }

        let mut last_error = None;
        for key in candidates {
            match decode::<IdTokenClaims>(token, key, &validation) {
                Ok(data) => return Self::identity_from_claims(data.claims),
                Err(e) => last_error = Some(e),
            }
        }

        Err(AppError::invalid_credential(match last_error {
            Some(e) => format!("Identity token verification failed: {}", e),
            None => "Identity token verification failed".to_string(),
        }))
    }

    fn identity_from_claims(claims: IdTokenClaims) -> Result<VerifiedIdentity, AppError> {
        let email = claims.email.ok_or_else(|| {
            AppError::invalid_credential("Identity token is missing an email claim".to_string())
        })?;

        // Providers omit the profile name when the profile scope was not
        // granted; the email still identifies the account.
        let name = claims.name.unwrap_or_else(|| email.clone());

        Ok(VerifiedIdentity {
            subject: claims.sub,
            email,
            name,
            avatar_url: claims.picture,
        })
    }
}

/// Verifies Google ID tokens against Google's published JWKS.
///
/// The key set is fetched on every verification: the trust boundary depends
/// on the check, so it is never skipped or served from a cache.
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleIdentityProvider {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_keys(&self) -> Result<Vec<(Option<String>, DecodingKey)>, AppError> {
        let jwks: JwkSet = self
            .http
            .get(&self.config.certs_url)
            .send()
            .await
            .map_err(|e| AppError::internal_error(format!("Identity provider unreachable: {}", e)))?
            .error_for_status()
            .map_err(|e| {
                AppError::internal_error(format!("Identity provider key fetch failed: {}", e))
            })?
            .json()
            .await
            .map_err(|e| {
                AppError::internal_error(format!("Identity provider returned invalid JWKS: {}", e))
            })?;

        let mut keys = Vec::new();
        for jwk in &jwks.keys {
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => keys.push((jwk.common.key_id.clone(), key)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unusable key in provider JWKS");
                }
            }
        }

        if keys.is_empty() {
            return Err(AppError::internal_error(
                "Identity provider JWKS contained no usable keys".to_string(),
            ));
        }

        Ok(keys)
    }
}

impl IdentityProvider for GoogleIdentityProvider {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<VerifiedIdentity, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let keys = self.fetch_keys().await?;

            let verifier = IdTokenVerifier::new(
                keys,
                Algorithm::RS256,
                self.config.client_id.clone(),
                GOOGLE_ISSUERS.iter().map(|s| s.to_string()).collect(),
            );

            verifier.verify(token)
        })
    }
}
