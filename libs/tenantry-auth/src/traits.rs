use async_trait::async_trait;
use secrecy::SecretString;

use crate::{claims::Claims, claims::Identity, errors::AuthError};

/// Signs claim bundles into opaque bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, identity: &Identity) -> Result<String, AuthError>;
}

/// Verifies a bearer token's signature and expiry and returns its claims.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Hashes and verifies user passwords.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Produce a self-describing hash (salt and parameters included).
    async fn hash(&self, password: &SecretString) -> Result<String, AuthError>;

    /// Check `password` against `stored`.
    ///
    /// With `stored = None` the implementation still performs a full
    /// verification against a throwaway hash and returns `false`, so an
    /// unknown account costs as much time as a wrong password.
    async fn verify(&self, password: &SecretString, stored: Option<&str>)
    -> Result<bool, AuthError>;
}
