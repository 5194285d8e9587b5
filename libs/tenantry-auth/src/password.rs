//! Argon2id credential store.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{errors::AuthError, traits::CredentialStore};

/// Hashes with Argon2id default parameters on the blocking pool.
#[derive(Debug, Clone)]
pub struct Argon2CredentialStore {
    // Verified against when the account is unknown.
    dummy_hash: String,
}

impl Argon2CredentialStore {
    pub fn new() -> Result<Self, AuthError> {
        Ok(Self {
            dummy_hash: hash_blocking("tenantry-dummy-password")?,
        })
    }
}

fn hash_blocking(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("password hash: {e}")))
}

fn verify_blocking(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthError::Internal(format!("invalid hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Internal(format!("password verify: {e}"))),
    }
}

#[async_trait]
impl CredentialStore for Argon2CredentialStore {
    async fn hash(&self, password: &SecretString) -> Result<String, AuthError> {
        let password = password.clone();
        tokio::task::spawn_blocking(move || hash_blocking(password.expose_secret()))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
    }

    async fn verify(
        &self,
        password: &SecretString,
        stored: Option<&str>,
    ) -> Result<bool, AuthError> {
        let password = password.clone();
        let known = stored.is_some();
        let stored = stored.unwrap_or(self.dummy_hash.as_str()).to_owned();
        let matched = tokio::task::spawn_blocking(move || {
            verify_blocking(password.expose_secret(), &stored)
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verify task: {e}")))??;
        Ok(known && matched)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[tokio::test]
    async fn correct_password_matches() {
        let store = Argon2CredentialStore::new().unwrap();
        let hash = store.hash(&secret("hunter2")).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(store.verify(&secret("hunter2"), Some(&hash)).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_does_not_match() {
        let store = Argon2CredentialStore::new().unwrap();
        let hash = store.hash(&secret("hunter2")).await.unwrap();
        assert!(!store.verify(&secret("wrong"), Some(&hash)).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let store = Argon2CredentialStore::new().unwrap();
        let a = store.hash(&secret("pw")).await.unwrap();
        let b = store.hash(&secret("pw")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unknown_account_never_matches() {
        let store = Argon2CredentialStore::new().unwrap();
        assert!(!store
            .verify(&secret("tenantry-dummy-password"), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let store = Argon2CredentialStore::new().unwrap();
        assert!(store.verify(&secret("pw"), Some("not-a-hash")).await.is_err());
    }
}
