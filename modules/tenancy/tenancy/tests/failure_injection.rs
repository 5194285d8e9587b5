#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend};
use support::registration;
use tenancy::domain::error::DomainError;
use tenancy::domain::ports::SchemaProvisioner;
use tenancy::domain::repos::{MetricsRepository, UserCredentials, UsersRepository};
use tenancy::infra::schema::SeaSchemaProvisioner;
use tenancy::infra::storage::{SeaMetricsRepository, SeaTenantsRepository, SeaUsersRepository};
use tenancy::{NewTenant, TenantMetrics, User};
use tenantry_db::Db;
use tracing_test::traced_test;
use uuid::Uuid;

fn injected() -> DomainError {
    DomainError::Database("injected failure".to_owned())
}

#[derive(Default)]
struct FailingUsers {
    inner: SeaUsersRepository,
    fail_insert: bool,
    fail_delete: bool,
}

#[async_trait]
impl UsersRepository for FailingUsers {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<UserCredentials>, DomainError> {
        self.inner.find_by_id(conn, id).await
    }

    async fn find_by_email<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        self.inner.find_by_email(conn, email).await
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user: &User,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        if self.fail_insert {
            return Err(injected());
        }
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
        if self.fail_delete {
            return Err(injected());
        }
        self.inner.delete_by_tenant(conn, tenant_id).await
    }
}

#[derive(Default)]
struct FailingMetrics {
    inner: SeaMetricsRepository,
}

#[async_trait]
impl MetricsRepository for FailingMetrics {
    async fn find<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<Option<TenantMetrics>, DomainError> {
        self.inner.find(conn, tenant_id).await
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        _metrics: &TenantMetrics,
    ) -> Result<(), DomainError> {
        Err(injected())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        metrics: &TenantMetrics,
    ) -> Result<bool, DomainError> {
        self.inner.update(conn, metrics).await
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant_id: Uuid,
    ) -> Result<bool, DomainError> {
        self.inner.delete(conn, tenant_id).await
    }
}

/// Namespace DDL that commits on its own, like `MySQL` `CREATE/DROP DATABASE`.
///
/// The `SQLite` catalog write runs on a plain connection, so it persists no
/// matter what happens to any later transaction. A call made from inside a
/// transaction body fails, because on the real backend it would commit
/// everything written before it.
struct NonTransactionalDdl {
    db: Db,
    inner: SeaSchemaProvisioner,
    fail_deprovision: bool,
}

impl NonTransactionalDdl {
    fn new(db: &Db) -> Self {
        Self {
            db: db.clone(),
            inner: SeaSchemaProvisioner,
            fail_deprovision: false,
        }
    }

    fn failing_drop(db: &Db) -> Self {
        Self {
            fail_deprovision: true,
            ..Self::new(db)
        }
    }

    fn outside_tx(&self) -> Result<&DatabaseConnection, DomainError> {
        self.db
            .conn()
            .map_err(|_| DomainError::internal("namespace DDL issued inside a transaction"))
    }
}

#[async_trait]
impl SchemaProvisioner for NonTransactionalDdl {
    fn transactional_ddl(&self, _backend: DbBackend) -> bool {
        false
    }

    async fn provision<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        schema: &str,
    ) -> Result<(), DomainError> {
        self.inner.provision(self.outside_tx()?, schema).await
    }

    async fn deprovision<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        schema: &str,
    ) -> Result<(), DomainError> {
        let conn = self.outside_tx()?;
        if self.fail_deprovision {
            return Err(injected());
        }
        self.inner.deprovision(conn, schema).await
    }

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        schema: &str,
    ) -> Result<bool, DomainError> {
        self.inner.exists(conn, schema).await
    }
}

fn acme() -> NewTenant {
    NewTenant {
        company_name: "Acme".to_owned(),
        subdomain: "acme".to_owned(),
        plan_type: None,
    }
}

#[tokio::test]
async fn failed_admin_insert_leaves_no_orphan_tenant() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        FailingUsers {
            fail_insert: true,
            ..FailingUsers::default()
        },
        SeaSchemaProvisioner,
    );

    let err = gateway
        .register_tenant(registration("acme", "admin@acme.test"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    assert_eq!(support::tenant_count(&db).await, 0);
    assert_eq!(support::metrics_count(&db).await, 0);
    assert_eq!(support::schema_rows(&db).await, 0);
}

#[tokio::test]
async fn failed_metrics_insert_rolls_back_tenant_and_schema() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        FailingMetrics::default(),
        SeaUsersRepository,
        SeaSchemaProvisioner,
    );

    let err = gateway.registry().create_tenant(acme()).await.unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    assert_eq!(support::tenant_count(&db).await, 0);
    assert_eq!(support::schema_rows(&db).await, 0);
}

#[tokio::test]
#[traced_test]
async fn failed_delete_with_transactional_ddl_restores_everything() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        FailingUsers {
            fail_delete: true,
            ..FailingUsers::default()
        },
        SeaSchemaProvisioner,
    );
    let done = gateway
        .register_tenant(registration("acme", "admin@acme.test"))
        .await
        .unwrap();

    let err = gateway
        .registry()
        .delete_tenant(done.tenant.id)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    let registry = gateway.registry();
    assert!(registry.get_by_id(done.tenant.id).await.is_ok());
    assert!(registry.get_metrics(done.tenant.id).await.is_ok());
    assert!(registry.schema_exists(done.tenant.id).await.unwrap());
    assert!(!logs_contain("manual reconciliation required"));
}

#[tokio::test]
#[traced_test]
async fn non_transactional_create_drops_namespace_when_rows_fail() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        FailingMetrics::default(),
        SeaUsersRepository,
        NonTransactionalDdl::new(&db),
    );

    let err = gateway.registry().create_tenant(acme()).await.unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    assert_eq!(support::tenant_count(&db).await, 0);
    assert_eq!(support::metrics_count(&db).await, 0);
    assert_eq!(support::schema_rows(&db).await, 0);
    assert!(logs_contain("namespace dropped"));
    assert!(!logs_contain("manual reconciliation required"));
}

#[tokio::test]
async fn non_transactional_registration_leaves_nothing_when_admin_insert_fails() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        FailingUsers {
            fail_insert: true,
            ..FailingUsers::default()
        },
        NonTransactionalDdl::new(&db),
    );

    let err = gateway
        .register_tenant(registration("acme", "admin@acme.test"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    assert_eq!(support::tenant_count(&db).await, 0);
    assert_eq!(support::metrics_count(&db).await, 0);
    assert_eq!(support::schema_rows(&db).await, 0);
}

#[tokio::test]
#[traced_test]
async fn undroppable_namespace_after_failed_create_is_flagged_for_reconciliation() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        FailingMetrics::default(),
        SeaUsersRepository,
        NonTransactionalDdl::failing_drop(&db),
    );

    let err = gateway.registry().create_tenant(acme()).await.unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    assert_eq!(support::tenant_count(&db).await, 0);
    assert_eq!(support::schema_rows(&db).await, 1);
    assert!(logs_contain("manual reconciliation required"));
    assert!(logs_contain("tenancy::reconcile"));
}

#[tokio::test]
async fn non_transactional_lifecycle_never_runs_ddl_inside_a_transaction() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        SeaUsersRepository,
        NonTransactionalDdl::new(&db),
    );

    let done = gateway
        .register_tenant(registration("acme", "admin@acme.test"))
        .await
        .unwrap();
    let registry = gateway.registry();
    assert!(registry.schema_exists(done.tenant.id).await.unwrap());
    assert_eq!(support::metrics_count(&db).await, 1);

    registry.delete_tenant(done.tenant.id).await.unwrap();
    assert!(!registry.schema_exists(done.tenant.id).await.unwrap());
    assert_eq!(support::tenant_count(&db).await, 0);
    assert_eq!(support::users_of(&db, done.tenant.id).await, 0);
}

#[tokio::test]
#[traced_test]
async fn non_transactional_delete_keeps_everything_when_row_deletes_fail() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        FailingUsers {
            fail_delete: true,
            ..FailingUsers::default()
        },
        NonTransactionalDdl::new(&db),
    );
    let done = gateway
        .register_tenant(registration("acme", "admin@acme.test"))
        .await
        .unwrap();

    let err = gateway
        .registry()
        .delete_tenant(done.tenant.id)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    let registry = gateway.registry();
    assert!(registry.get_by_id(done.tenant.id).await.is_ok());
    assert!(registry.get_metrics(done.tenant.id).await.is_ok());
    assert!(registry.schema_exists(done.tenant.id).await.unwrap());
    assert!(!logs_contain("manual reconciliation required"));
}

#[tokio::test]
#[traced_test]
async fn namespace_left_after_committed_delete_is_flagged_for_reconciliation() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        SeaUsersRepository,
        NonTransactionalDdl::failing_drop(&db),
    );
    let done = gateway
        .register_tenant(registration("acme", "admin@acme.test"))
        .await
        .unwrap();

    let err = gateway
        .registry()
        .delete_tenant(done.tenant.id)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Database(_)));
    let registry = gateway.registry();
    assert!(matches!(
        registry.get_by_id(done.tenant.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(registry.schema_exists(done.tenant.id).await.unwrap());
    assert!(logs_contain("manual reconciliation required"));
    assert!(logs_contain("tenancy::reconcile"));
    assert!(logs_contain(&done.tenant.id.to_string()));
}

#[tokio::test]
#[traced_test]
async fn delete_of_missing_tenant_never_touches_schemas() {
    let db = support::fresh_db().await;
    let gateway = support::wire(
        db.clone(),
        SeaTenantsRepository,
        SeaMetricsRepository,
        SeaUsersRepository,
        NonTransactionalDdl::failing_drop(&db),
    );

    let err = gateway
        .registry()
        .delete_tenant(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    assert!(!logs_contain("manual reconciliation required"));
}
