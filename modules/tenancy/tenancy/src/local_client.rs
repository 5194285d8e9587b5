use std::sync::Arc;

use async_trait::async_trait;
use tenancy_sdk::{Tenant, TenancyClient, TenancyError, TenantMetrics, TenantMetricsPatch, User};
use uuid::Uuid;

use crate::domain::ports::SchemaProvisioner;
use crate::domain::registry::TenantRegistry;
use crate::domain::repos::{MetricsRepository, TenantsRepository, UsersRepository};

/// In-process `TenancyClient` backed by the registry.
pub struct TenancyLocalClient<T, M, U, S> {
    registry: Arc<TenantRegistry<T, M, U, S>>,
}

impl<T, M, U, S> TenancyLocalClient<T, M, U, S> {
    #[must_use]
    pub fn new(registry: Arc<TenantRegistry<T, M, U, S>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<T, M, U, S> TenancyClient for TenancyLocalClient<T, M, U, S>
where
    T: TenantsRepository,
    M: MetricsRepository,
    U: UsersRepository,
    S: SchemaProvisioner,
{
    async fn get_tenant(&self, id: Uuid) -> Result<Tenant, TenancyError> {
        self.registry.get_by_id(id).await.map_err(Into::into)
    }

    async fn get_active_tenant_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Tenant, TenancyError> {
        self.registry
            .get_active_by_subdomain(subdomain)
            .await
            .map_err(Into::into)
    }

    async fn schema_name(&self, tenant_id: Uuid) -> Result<String, TenancyError> {
        let tenant = self.registry.get_by_id(tenant_id).await?;
        Ok(self.registry.schema_name(tenant.id))
    }

    async fn get_tenant_metrics(&self, tenant_id: Uuid) -> Result<TenantMetrics, TenancyError> {
        self.registry
            .get_metrics(tenant_id)
            .await
            .map_err(Into::into)
    }

    async fn update_tenant_metrics(
        &self,
        tenant_id: Uuid,
        patch: TenantMetricsPatch,
    ) -> Result<TenantMetrics, TenancyError> {
        self.registry
            .update_metrics(tenant_id, patch)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, TenancyError> {
        self.registry.find_user(user_id).await.map_err(Into::into)
    }
}
