//! Conversions between storage rows and SDK models.

use sea_orm::ActiveValue::Set;
use tenancy_sdk::{Tenant, TenantMetrics, User};

use super::entity::{tenant, tenant_metrics, user};
use crate::domain::error::DomainError;
use crate::domain::repos::UserCredentials;

fn corrupt(table: &str, field: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::internal(format!("corrupt {table}.{field}: {detail}"))
}

impl TryFrom<tenant::Model> for Tenant {
    type Error = DomainError;

    fn try_from(m: tenant::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            company_name: m.company_name,
            subdomain: m.subdomain,
            plan_type: m
                .plan_type
                .parse()
                .map_err(|e| corrupt("tenants", "plan_type", e))?,
            status: m.status.parse().map_err(|e| corrupt("tenants", "status", e))?,
            created_at: m.created_at,
        })
    }
}

impl From<&Tenant> for tenant::ActiveModel {
    fn from(t: &Tenant) -> Self {
        Self {
            id: Set(t.id),
            company_name: Set(t.company_name.clone()),
            subdomain: Set(t.subdomain.clone()),
            plan_type: Set(t.plan_type.as_str().to_owned()),
            status: Set(t.status.as_str().to_owned()),
            created_at: Set(t.created_at),
        }
    }
}

impl From<tenant_metrics::Model> for TenantMetrics {
    fn from(m: tenant_metrics::Model) -> Self {
        Self {
            tenant_id: m.tenant_id,
            storage_used: m.storage_used,
            active_users: m.active_users,
            last_activity: m.last_activity,
        }
    }
}

impl From<&TenantMetrics> for tenant_metrics::ActiveModel {
    fn from(m: &TenantMetrics) -> Self {
        Self {
            tenant_id: Set(m.tenant_id),
            storage_used: Set(m.storage_used),
            active_users: Set(m.active_users),
            last_activity: Set(m.last_activity),
        }
    }
}

impl TryFrom<user::Model> for UserCredentials {
    type Error = DomainError;

    fn try_from(m: user::Model) -> Result<Self, Self::Error> {
        let roles: Vec<String> =
            serde_json::from_str(&m.roles).map_err(|e| corrupt("users", "roles", e))?;
        Ok(Self {
            user: User {
                id: m.id,
                email: m.email,
                tenant_id: m.tenant_id,
                roles,
                created_at: m.created_at,
            },
            password_hash: m.password_hash,
        })
    }
}

pub(crate) fn user_active_model(u: &User, password_hash: &str) -> Result<user::ActiveModel, DomainError> {
    let roles = serde_json::to_string(&u.roles)
        .map_err(|e| DomainError::internal(format!("encode roles: {e}")))?;
    Ok(user::ActiveModel {
        id: Set(u.id),
        email: Set(u.email.clone()),
        password_hash: Set(password_hash.to_owned()),
        roles: Set(roles),
        tenant_id: Set(u.tenant_id),
        created_at: Set(u.created_at),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn row(plan: &str, status: &str) -> tenant::Model {
        tenant::Model {
            id: Uuid::new_v4(),
            company_name: "Acme".to_owned(),
            subdomain: "acme".to_owned(),
            plan_type: plan.to_owned(),
            status: status.to_owned(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn tenant_row_maps_enums() {
        let t = Tenant::try_from(row("enterprise", "suspended")).unwrap();
        assert_eq!(t.plan_type, tenancy_sdk::PlanType::Enterprise);
        assert_eq!(t.status, tenancy_sdk::TenantStatus::Suspended);
    }

    #[test]
    fn unknown_status_is_reported_as_internal() {
        assert!(matches!(
            Tenant::try_from(row("basic", "archived")),
            Err(DomainError::Internal(ref m)) if m.contains("tenants.status")
        ));
    }

    #[test]
    fn user_roles_are_stored_as_json() {
        let u = User {
            id: Uuid::new_v4(),
            email: "admin@acme.test".to_owned(),
            tenant_id: Uuid::new_v4(),
            roles: vec!["admin".to_owned(), "superadmin".to_owned()],
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let am = user_active_model(&u, "$argon2id$stub").unwrap();
        let sea_orm::ActiveValue::Set(roles) = am.roles else {
            panic!("roles not set");
        };
        assert_eq!(roles, r#"["admin","superadmin"]"#);

        let back = UserCredentials::try_from(user::Model {
            id: u.id,
            email: u.email.clone(),
            password_hash: "$argon2id$stub".to_owned(),
            roles,
            tenant_id: u.tenant_id,
            created_at: u.created_at,
        })
        .unwrap();
        assert_eq!(back.user, u);
    }
}
