//! `TenancyClient` trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::TenancyError;
use crate::models::{Tenant, TenantMetrics, TenantMetricsPatch, User};

/// In-process API of the tenancy module.
///
/// Tenant-scoped features use it to resolve the caller's tenant, find the
/// storage namespace provisioned for it and report usage.
#[async_trait]
pub trait TenancyClient: Send + Sync {
    /// Tenant by id, whatever its status.
    async fn get_tenant(&self, id: Uuid) -> Result<Tenant, TenancyError>;

    /// Active tenant by subdomain. Suspended tenants are reported as not found.
    async fn get_active_tenant_by_subdomain(&self, subdomain: &str)
    -> Result<Tenant, TenancyError>;

    /// Name of the storage namespace provisioned for the tenant.
    async fn schema_name(&self, tenant_id: Uuid) -> Result<String, TenancyError>;

    async fn get_tenant_metrics(&self, tenant_id: Uuid) -> Result<TenantMetrics, TenancyError>;

    async fn update_tenant_metrics(
        &self,
        tenant_id: Uuid,
        patch: TenantMetricsPatch,
    ) -> Result<TenantMetrics, TenancyError>;

    async fn get_user(&self, user_id: Uuid) -> Result<User, TenancyError>;
}
