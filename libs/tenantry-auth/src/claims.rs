use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorizer::roles;

/// Who a token is being issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub tenant_id: Uuid,
    pub roles: Vec<String>,
}

/// Signed payload carried in every bearer token.
///
/// Stateless: a token is valid as long as its signature verifies and `exp`
/// has not passed. No password material is ever part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: Uuid,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Platform operators act across all tenants.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        self.has_role(roles::SUPERADMIN)
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub,
            email: self.email.clone(),
            tenant_id: self.tenant_id,
            roles: self.roles.clone(),
        }
    }
}
