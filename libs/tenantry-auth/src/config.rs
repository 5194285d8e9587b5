use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::AuthError;

/// Minimum HMAC key length accepted for HS256 signing.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// HS256 signing key.
    #[serde(serialize_with = "redact")]
    pub jwt_secret: SecretString,

    /// `iss` claim written into and required from every token.
    pub issuer: String,

    /// Lifetime of an issued token.
    #[serde(with = "humantime_serde")]
    pub token_ttl: Duration,

    /// Clock skew tolerated when checking `exp`.
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::from(String::new()),
            issuer: "tenantry".to_owned(),
            token_ttl: Duration::from_secs(3600),
            leeway_seconds: 30,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(AuthError::InvalidConfig(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.issuer.trim().is_empty() {
            return Err(AuthError::InvalidConfig("auth.issuer must not be empty".to_owned()));
        }
        if self.token_ttl.is_zero() {
            return Err(AuthError::InvalidConfig("auth.token_ttl must be positive".to_owned()));
        }
        Ok(())
    }
}

fn redact<S: Serializer>(_: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str("[REDACTED]")
}
