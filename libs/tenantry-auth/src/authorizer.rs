use uuid::Uuid;

use crate::{claims::Claims, errors::AuthError};

/// Role names understood by the platform.
pub mod roles {
    /// Tenant-scoped administrator.
    pub const ADMIN: &str = "admin";
    /// Platform operator; bypasses tenant scoping.
    pub const SUPERADMIN: &str = "superadmin";
}

/// Set of roles an operation accepts. The caller needs at least one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    allowed: &'static [&'static str],
}

impl RoleRequirement {
    #[must_use]
    pub const fn any_of(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    #[must_use]
    pub const fn superadmin() -> Self {
        Self::any_of(&[roles::SUPERADMIN])
    }

    #[must_use]
    pub const fn admin_or_superadmin() -> Self {
        Self::any_of(&[roles::SUPERADMIN, roles::ADMIN])
    }

    #[must_use]
    pub fn allowed(&self) -> &[&'static str] {
        self.allowed
    }

    fn is_satisfied_by(&self, claims: &Claims) -> bool {
        self.allowed.iter().any(|role| claims.has_role(role))
    }
}

/// Explicit authorization checks called at the top of each handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    /// Fails with `Forbidden` when the caller's roles do not intersect `requirement`.
    pub fn check(&self, claims: &Claims, requirement: &RoleRequirement) -> Result<(), AuthError> {
        if requirement.is_satisfied_by(claims) {
            Ok(())
        } else {
            tracing::debug!(
                subject = %claims.sub,
                required = ?requirement.allowed(),
                "role requirement not met"
            );
            Err(AuthError::Forbidden)
        }
    }

    /// Tenant-scoped access: superadmins pass, everyone else must own `tenant_id`.
    pub fn ensure_tenant_scope(&self, claims: &Claims, tenant_id: Uuid) -> Result<(), AuthError> {
        if claims.is_superadmin() || claims.tenant_id == tenant_id {
            Ok(())
        } else {
            tracing::debug!(
                subject = %claims.sub,
                caller_tenant = %claims.tenant_id,
                target_tenant = %tenant_id,
                "cross-tenant access denied"
            );
            Err(AuthError::Forbidden)
        }
    }

    /// Role check followed by the tenant-scope check.
    pub fn check_scoped(
        &self,
        claims: &Claims,
        requirement: &RoleRequirement,
        tenant_id: Uuid,
    ) -> Result<(), AuthError> {
        self.check(claims, requirement)?;
        self.ensure_tenant_scope(claims, tenant_id)
    }
}
