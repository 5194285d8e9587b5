//! HS256 token issuer and validator.

use async_trait::async_trait;
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use time::OffsetDateTime;

use crate::{
    claims::{Claims, Identity},
    config::AuthConfig,
    errors::AuthError,
    traits::{TokenIssuer, TokenValidator},
};

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl_secs: i64,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    pub fn new(cfg: &AuthConfig) -> Result<Self, AuthError> {
        cfg.validate()?;
        let secret = cfg.jwt_secret.expose_secret().as_bytes();
        let ttl_secs = i64::try_from(cfg.token_ttl.as_secs())
            .map_err(|_| AuthError::InvalidConfig("auth.token_ttl is too large".to_owned()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = cfg.leeway_seconds;
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: cfg.issuer.clone(),
            ttl_secs,
            validation,
        })
    }

    /// Sign claims as given, including their `iat` and `exp`.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token encode: {e}")))
    }

    /// Claims that [`TokenIssuer::issue`] would sign for `identity` at `now`.
    #[must_use]
    pub fn claims_for(&self, identity: &Identity, now: OffsetDateTime) -> Claims {
        let iat = now.unix_timestamp();
        Claims {
            sub: identity.user_id,
            email: identity.email.clone(),
            tenant_id: identity.tenant_id,
            roles: identity.roles.clone(),
            iss: self.issuer.clone(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        }
    }

    fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.sign(&self.claims_for(identity, OffsetDateTime::now_utc()))
    }
}

#[async_trait]
impl TokenValidator for JwtTokenService {
    async fn validate_and_parse(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode(token)
    }
}
