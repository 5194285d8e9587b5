//! Storage ports.
//!
//! Every method takes the connection to run on, so one call site works on a
//! plain pooled connection and inside a transaction alike.

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use tenancy_sdk::{Tenant, TenantMetrics, User};
use uuid::Uuid;

use super::error::DomainError;

/// A user together with its stored password hash. Never leaves the domain layer.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait TenantsRepository: Send + Sync + 'static {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Tenant>, DomainError>;

    /// Lookup regardless of status.
    async fn find_by_subdomain<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        subdomain: &str,
    ) -> Result<Option<Tenant>, DomainError>;

    /// All tenants, oldest first.
    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Tenant>, DomainError>;

    /// Fails with `Conflict` when the subdomain is taken.
    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<(), DomainError>;

    /// Writes the updatable fields. `false` when no row matched.
    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<bool, DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait MetricsRepository: Send + Sync + 'static {
    async fn find<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Option<TenantMetrics>, DomainError>;

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        metrics: &TenantMetrics,
    ) -> Result<(), DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        metrics: &TenantMetrics,
    ) -> Result<bool, DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait UsersRepository: Send + Sync + 'static {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserCredentials>, DomainError>;

    /// `email` is expected already normalised to lower case.
    async fn find_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError>;

    /// Fails with `Conflict` when the email is taken.
    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: &User,
        password_hash: &str,
    ) -> Result<(), DomainError>;

    async fn update_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, DomainError>;

    /// Returns the number of removed users.
    async fn delete_by_tenant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<u64, DomainError>;
}
