use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tenancy_sdk::Tenant;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::registry::SUBDOMAIN_TAKEN;
use crate::domain::repos::TenantsRepository;
use crate::infra::storage::entity::tenant::{self, Entity as TenantEntity};

#[derive(Debug, Clone, Default)]
pub struct SeaTenantsRepository;

#[async_trait]
impl TenantsRepository for SeaTenantsRepository {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Tenant>, DomainError> {
        TenantEntity::find_by_id(id)
            .one(conn)
            .await?
            .map(Tenant::try_from)
            .transpose()
    }

    async fn find_by_subdomain<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        subdomain: &str,
    ) -> Result<Option<Tenant>, DomainError> {
        TenantEntity::find()
            .filter(tenant::Column::Subdomain.eq(subdomain))
            .one(conn)
            .await?
            .map(Tenant::try_from)
            .transpose()
    }

    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Tenant>, DomainError> {
        TenantEntity::find()
            .order_by_asc(tenant::Column::CreatedAt)
            .order_by_asc(tenant::Column::Id)
            .all(conn)
            .await?
            .into_iter()
            .map(Tenant::try_from)
            .collect()
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<(), DomainError> {
        TenantEntity::insert(tenant::ActiveModel::from(tenant))
            .exec_without_returning(conn)
            .await
            .map_err(|e| DomainError::from_write(e, SUBDOMAIN_TAKEN))?;
        Ok(())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<bool, DomainError> {
        let mut am = tenant::ActiveModel::from(tenant);
        am.subdomain = sea_orm::ActiveValue::NotSet;
        am.created_at = sea_orm::ActiveValue::NotSet;
        match am.update(conn).await {
            Ok(_) => Ok(true),
            Err(sea_orm::DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let res = TenantEntity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected > 0)
    }
}
