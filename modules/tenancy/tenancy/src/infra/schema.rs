//! Backend-aware tenant namespace provisioning.
//!
//! - `PostgreSQL`: one schema per tenant; DDL is transactional.
//! - `MySQL`: one database per tenant; DDL commits implicitly.
//! - `SQLite`: rows in the `tenant_schemas` catalog, transactional like any write.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DbBackend, EntityTrait, Statement,
};

use crate::domain::error::DomainError;
use crate::domain::now_utc;
use crate::domain::ports::SchemaProvisioner;
use crate::infra::storage::entity::tenant_schema;

#[derive(Debug, Clone, Default)]
pub struct SeaSchemaProvisioner;

/// Identifiers are interpolated into DDL, so only `[a-z0-9_]` is accepted.
fn checked_ident(schema: &str) -> Result<&str, DomainError> {
    let ok = !schema.is_empty()
        && schema.len() <= 63
        && schema
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if ok {
        Ok(schema)
    } else {
        Err(DomainError::internal(format!("refusing schema identifier '{schema}'")))
    }
}

#[async_trait]
impl SchemaProvisioner for SeaSchemaProvisioner {
    fn transactional_ddl(&self, backend: DbBackend) -> bool {
        !matches!(backend, DbBackend::MySql)
    }

    async fn provision<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<(), DomainError> {
        let ident = checked_ident(schema)?;
        match conn.get_database_backend() {
            DbBackend::Postgres => {
                conn.execute_unprepared(&format!(r#"CREATE SCHEMA IF NOT EXISTS "{ident}""#))
                    .await?;
            }
            DbBackend::MySql => {
                conn.execute_unprepared(&format!("CREATE DATABASE IF NOT EXISTS `{ident}`"))
                    .await?;
            }
            DbBackend::Sqlite => {
                let row = tenant_schema::ActiveModel {
                    name: Set(ident.to_owned()),
                    created_at: Set(now_utc()),
                };
                tenant_schema::Entity::insert(row)
                    .exec_without_returning(conn)
                    .await
                    .map_err(|e| DomainError::from_write(e, "Tenant schema already exists"))?;
            }
        }
        tracing::debug!(schema = %ident, "tenant schema provisioned");
        Ok(())
    }

    async fn deprovision<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<(), DomainError> {
        let ident = checked_ident(schema)?;
        match conn.get_database_backend() {
            DbBackend::Postgres => {
                conn.execute_unprepared(&format!(r#"DROP SCHEMA IF EXISTS "{ident}" CASCADE"#))
                    .await?;
            }
            DbBackend::MySql => {
                conn.execute_unprepared(&format!("DROP DATABASE IF EXISTS `{ident}`"))
                    .await?;
            }
            DbBackend::Sqlite => {
                tenant_schema::Entity::delete_by_id(ident.to_owned())
                    .exec(conn)
                    .await?;
            }
        }
        tracing::debug!(schema = %ident, "tenant schema dropped");
        Ok(())
    }

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<bool, DomainError> {
        let backend = conn.get_database_backend();
        let found = match backend {
            DbBackend::Postgres => conn
                .query_one(Statement::from_sql_and_values(
                    backend,
                    "SELECT 1 FROM information_schema.schemata WHERE schema_name = $1",
                    [schema.into()],
                ))
                .await?
                .is_some(),
            DbBackend::MySql => conn
                .query_one(Statement::from_sql_and_values(
                    backend,
                    "SELECT 1 FROM information_schema.schemata WHERE schema_name = ?",
                    [schema.into()],
                ))
                .await?
                .is_some(),
            DbBackend::Sqlite => tenant_schema::Entity::find_by_id(schema.to_owned())
                .one(conn)
                .await?
                .is_some(),
        };
        Ok(found)
    }
}
