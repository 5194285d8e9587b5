//! Authentication primitives for Tenantry.
//!
//! - [`JwtTokenService`]: signs and verifies bearer tokens
//! - [`Argon2CredentialStore`]: hashes and verifies passwords
//! - [`RoleAuthorizer`]: role-set and tenant-scope checks
//! - `axum_ext`: bearer middleware and the [`axum_ext::AuthClaims`] extractor
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod authorizer;
pub mod claims;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod password;
pub mod traits;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

pub use authorizer::{roles, RoleAuthorizer, RoleRequirement};
pub use claims::{Claims, Identity};
pub use config::AuthConfig;
pub use errors::AuthError;
pub use jwt::JwtTokenService;
pub use password::Argon2CredentialStore;
pub use traits::{CredentialStore, TokenIssuer, TokenValidator};
