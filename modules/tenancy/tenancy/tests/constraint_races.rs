#![allow(clippy::unwrap_used, clippy::expect_used)]

//! A writer that loses a race has already passed the existence checks. These
//! tests blind those checks so the unique indexes alone must settle the write.

mod support;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbBackend};
use support::registration;
use tenancy::domain::error::DomainError;
use tenancy::domain::ports::SchemaProvisioner;
use tenancy::domain::repos::{TenantsRepository, UserCredentials, UsersRepository};
use tenancy::infra::schema::SeaSchemaProvisioner;
use tenancy::infra::storage::{SeaMetricsRepository, SeaTenantsRepository, SeaUsersRepository};
use tenancy::{NewTenant, Tenant, User};
use tenantry_db::Db;
use tracing_test::traced_test;
use uuid::Uuid;

/// Never sees an existing subdomain.
#[derive(Default)]
struct BlindTenants {
    inner: SeaTenantsRepository,
}

#[async_trait]
impl TenantsRepository for BlindTenants {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Tenant>, DomainError> {
        self.inner.find_by_id(conn, id).await
    }

    async fn find_by_subdomain<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        _subdomain: &str,
    ) -> Result<Option<Tenant>, DomainError> {
        Ok(None)
    }

    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Tenant>, DomainError> {
        self.inner.list(conn).await
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<(), DomainError> {
        self.inner.insert(conn, tenant).await
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<bool, DomainError> {
        self.inner.update(conn, tenant).await
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        self.inner.delete(conn, id).await
    }
}

/// Never sees an existing email.
#[derive(Default)]
struct BlindUsers {
    inner: SeaUsersRepository,
}

#[async_trait]
impl UsersRepository for BlindUsers {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserCredentials>, DomainError> {
        self.inner.find_by_id(conn, id).await
    }

    async fn find_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        _email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(None)
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: &User,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        self.inner.insert(conn, user, password_hash).await
    }

    async fn update_password_hash<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        self.inner.update_password_hash(conn, id, password_hash).await
    }

    async fn delete_by_tenant<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<u64, DomainError> {
        self.inner.delete_by_tenant(conn, tenant_id).await
    }
}

/// `SQLite` namespaces reported as auto-committing, so they are created ahead
/// of the row transaction and must be dropped when it fails.
struct AheadOfTxDdl(SeaSchemaProvisioner);

#[async_trait]
impl SchemaProvisioner for AheadOfTxDdl {
    fn transactional_ddl(&self, _backend: DbBackend) -> bool {
        false
    }

    async fn provision<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<(), DomainError> {
        self.0.provision(conn, schema).await
    }

    async fn deprovision<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<(), DomainError> {
        self.0.deprovision(conn, schema).await
    }

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<bool, DomainError> {
        self.0.exists(conn, schema).await
    }
}

fn acme() -> NewTenant {
    NewTenant {
        company_name: "Acme".to_owned(),
        subdomain: "acme".to_owned(),
        plan_type: None,
    }
}

async fn assert_one_acme(db: &Db) {
    assert_eq!(support::tenants_with_subdomain(db, "acme").await, 1);
    assert_eq!(support::metrics_count(db).await, 1);
    assert_eq!(support::schema_rows(db).await, 1);
}

#[tokio::test]
async fn subdomain_index_rejects_write_that_passed_the_lookup() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        BlindTenants::default(),
        SeaMetricsRepository,
        SeaUsersRepository,
        SeaSchemaProvisioner,
    );
    let registry = gateway.registry();
    registry.create_tenant(acme()).await.unwrap();

    let err = registry.create_tenant(acme()).await.unwrap_err();

    match err {
        DomainError::Conflict(msg) => assert_eq!(msg, "Subdomain already in use"),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_one_acme(&db).await;
}

#[tokio::test]
#[traced_test]
async fn subdomain_conflict_drops_namespace_created_ahead_of_the_transaction() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        BlindTenants::default(),
        SeaMetricsRepository,
        SeaUsersRepository,
        AheadOfTxDdl(SeaSchemaProvisioner),
    );
    let registry = gateway.registry();
    registry.create_tenant(acme()).await.unwrap();

    let err = registry.create_tenant(acme()).await.unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
    assert_one_acme(&db).await;
    assert!(logs_contain("namespace dropped"));
}

#[tokio::test]
async fn email_index_rejects_registration_that_passed_the_lookup() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        BlindUsers::default(),
        SeaSchemaProvisioner,
    );
    let first = gateway
        .register_tenant(registration("acme", "admin@shared.test"))
        .await
        .unwrap();

    let err = gateway
        .register_tenant(registration("globex", "admin@shared.test"))
        .await
        .unwrap_err();

    match err {
        DomainError::Conflict(msg) => assert_eq!(msg, "Email already registered"),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(support::tenant_count(&db).await, 1);
    assert_eq!(support::tenants_with_subdomain(&db, "globex").await, 0);
    assert_eq!(support::metrics_count(&db).await, 1);
    assert_eq!(support::schema_rows(&db).await, 1);
    assert_eq!(support::users_of(&db, first.tenant.id).await, 1);
}
