use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
};
use tenancy_sdk::User;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::gateway::EMAIL_TAKEN;
use crate::domain::repos::{UserCredentials, UsersRepository};
use crate::infra::storage::entity::user::{self, Entity as UserEntity};
use crate::infra::storage::mapper::user_active_model;

#[derive(Debug, Clone, Default)]
pub struct SeaUsersRepository;

#[async_trait]
impl UsersRepository for SeaUsersRepository {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserCredentials>, DomainError> {
        UserEntity::find_by_id(id)
            .one(conn)
            .await?
            .map(UserCredentials::try_from)
            .transpose()
    }

    async fn find_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await?
            .map(UserCredentials::try_from)
            .transpose()
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: &User,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        UserEntity::insert(user_active_model(user, password_hash)?)
            .exec_without_returning(conn)
            .await
            .map_err(|e| DomainError::from_write(e, EMAIL_TAKEN))?;
        Ok(())
    }

    async fn update_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        let res = UserEntity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_by_tenant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<u64, DomainError> {
        let res = UserEntity::delete_many()
            .filter(user::Column::TenantId.eq(tenant_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
