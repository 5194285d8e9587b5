use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend};

use super::error::DomainError;

/// Creates and removes the per-tenant storage namespace.
#[async_trait]
pub trait SchemaProvisioner: Send + Sync + 'static {
    /// Whether namespace DDL on `backend` is undone by a transaction rollback.
    fn transactional_ddl(&self, backend: DbBackend) -> bool;

    async fn provision<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<(), DomainError>;

    /// Drops the namespace with everything in it. Missing namespaces are not an error.
    async fn deprovision<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<(), DomainError>;

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<bool, DomainError>;
}
