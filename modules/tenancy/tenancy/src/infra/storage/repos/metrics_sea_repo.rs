use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use tenancy_sdk::TenantMetrics;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::MetricsRepository;
use crate::infra::storage::entity::tenant_metrics::{self, Entity as MetricsEntity};

#[derive(Debug, Clone, Default)]
pub struct SeaMetricsRepository;

#[async_trait]
impl MetricsRepository for SeaMetricsRepository {
    async fn find<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Option<TenantMetrics>, DomainError> {
        Ok(MetricsEntity::find_by_id(tenant_id)
            .one(conn)
            .await?
            .map(Into::into))
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        metrics: &TenantMetrics,
    ) -> Result<(), DomainError> {
        MetricsEntity::insert(tenant_metrics::ActiveModel::from(metrics))
            .exec_without_returning(conn)
            .await
            .map_err(|e| DomainError::from_write(e, "Tenant metrics already exist"))?;
        Ok(())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        metrics: &TenantMetrics,
    ) -> Result<bool, DomainError> {
        match tenant_metrics::ActiveModel::from(metrics).update(conn).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<bool, DomainError> {
        let res = MetricsEntity::delete_by_id(tenant_id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }
}
