//! Tenant Registry: tenant lifecycle, namespace provisioning and metrics.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use tenancy_sdk::{
    NewTenant, Tenant, TenantMetrics, TenantMetricsPatch, TenantPatch, TenantStatus, User,
};
use tenantry_db::{Db, TxConfig, TxFuture};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::DomainError;
use super::now_utc;
use super::ports::SchemaProvisioner;
use super::repos::{MetricsRepository, TenantsRepository, UsersRepository};
use super::validation::{normalize_subdomain, validate_company_name};
use crate::config::TenancyConfig;

pub(crate) const SUBDOMAIN_TAKEN: &str = "Subdomain already in use";

pub struct TenantRegistry<T, M, U, S> {
    db: Db,
    tenants: Arc<T>,
    metrics: Arc<M>,
    users: Arc<U>,
    schemas: Arc<S>,
    config: Arc<TenancyConfig>,
}

impl<T, M, U, S> Clone for TenantRegistry<T, M, U, S> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            tenants: Arc::clone(&self.tenants),
            metrics: Arc::clone(&self.metrics),
            users: Arc::clone(&self.users),
            schemas: Arc::clone(&self.schemas),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T, M, U, S> TenantRegistry<T, M, U, S>
where
    T: TenantsRepository,
    M: MetricsRepository,
    U: UsersRepository,
    S: SchemaProvisioner,
{
    pub fn new(
        db: Db,
        tenants: Arc<T>,
        metrics: Arc<M>,
        users: Arc<U>,
        schemas: Arc<S>,
        config: Arc<TenancyConfig>,
    ) -> Self {
        Self {
            db,
            tenants,
            metrics,
            users,
            schemas,
            config,
        }
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn users(&self) -> &U {
        &self.users
    }

    pub fn config(&self) -> &TenancyConfig {
        &self.config
    }

    #[must_use]
    pub fn schema_name(&self, tenant_id: Uuid) -> String {
        self.config.schema_name(tenant_id)
    }

    /// Whether the namespace of `tenant_id` currently exists.
    pub async fn schema_exists(&self, tenant_id: Uuid) -> Result<bool, DomainError> {
        let conn = self.db.conn()?;
        self.schemas
            .exists(conn, &self.schema_name(tenant_id))
            .await
    }

    /// Whether namespace DDL can share a transaction with row writes.
    pub(crate) fn ddl_in_tx(&self) -> bool {
        self.schemas.transactional_ddl(self.db.backend())
    }

    /// Create an active tenant with its namespace and zeroed metrics.
    pub async fn create_tenant(&self, input: NewTenant) -> Result<Tenant, DomainError> {
        let tenant = self.prepare(input).await?;
        let this = self.clone();
        let row = tenant.clone();
        self.create_with(&tenant, move |tx| {
            Box::pin(async move { this.provision_in(tx, &row).await })
        })
        .await?;
        Ok(tenant)
    }

    /// Validate `input` and mint the tenant record. Nothing is written.
    pub(crate) async fn prepare(&self, input: NewTenant) -> Result<Tenant, DomainError> {
        let company_name =
            validate_company_name(&input.company_name, self.config.max_company_name_length)?;
        let subdomain = normalize_subdomain(&input.subdomain)?;

        // Fast path only; the unique index on subdomain settles races.
        if self
            .tenants
            .find_by_subdomain(self.db.conn()?, &subdomain)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(SUBDOMAIN_TAKEN));
        }

        Ok(Tenant {
            id: Uuid::new_v4(),
            company_name,
            subdomain,
            plan_type: input.plan_type.unwrap_or(self.config.default_plan),
            status: TenantStatus::Active,
            created_at: now_utc(),
        })
    }

    /// Run `body` as the one transaction that creates `tenant`.
    ///
    /// Where namespace DDL commits implicitly (`MySQL`), the namespace is
    /// created before the transaction opens and dropped again if it fails, so
    /// no DDL ever runs inside `body`.
    pub(crate) async fn create_with<R, F>(&self, tenant: &Tenant, body: F) -> Result<R, DomainError>
    where
        F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, R, DomainError> + Send,
        R: Send,
    {
        let schema = self.schema_name(tenant.id);
        let ahead = !self.ddl_in_tx();
        if ahead {
            self.schemas.provision(self.db.conn()?, &schema).await?;
        }

        let res = self.db.transaction(TxConfig::default(), body).await;
        if ahead && let Err(cause) = &res {
            self.discard_schema(tenant.id, &schema, cause).await;
        }
        if res.is_ok() {
            info!(
                tenant_id = %tenant.id,
                subdomain = %tenant.subdomain,
                plan = %tenant.plan_type,
                schema = %schema,
                "tenant provisioned"
            );
        }
        res
    }

    /// Row writes of tenant creation on a caller-owned transaction.
    ///
    /// The namespace is created here only when its DDL is transactional;
    /// otherwise [`Self::create_with`] has already created it.
    pub(crate) async fn provision_in<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        tenant: &Tenant,
    ) -> Result<(), DomainError> {
        self.tenants.insert(conn, tenant).await?;
        if self.ddl_in_tx() {
            self.schemas
                .provision(conn, &self.schema_name(tenant.id))
                .await?;
        }
        self.metrics
            .insert(conn, &TenantMetrics::initial(tenant.id, tenant.created_at))
            .await?;
        Ok(())
    }

    /// Compensate a namespace created ahead of a creation transaction that failed.
    async fn discard_schema(&self, tenant_id: Uuid, schema: &str, cause: &DomainError) {
        let dropped = match self.db.conn() {
            Ok(conn) => self.schemas.deprovision(conn, schema).await,
            Err(e) => Err(e.into()),
        };
        match dropped {
            Ok(()) => {
                warn!(tenant_id = %tenant_id, schema = %schema, error = %cause, "tenant creation failed; namespace dropped");
            }
            Err(drop_err) => {
                tracing::error!(
                    target: "tenancy::reconcile",
                    tenant_id = %tenant_id,
                    schema = %schema,
                    error = %cause,
                    drop_error = %drop_err,
                    "tenant creation failed and its namespace could not be dropped; manual reconciliation required"
                );
            }
        }
    }

    /// Active tenant by subdomain. Suspended and missing tenants look the same.
    pub async fn get_active_by_subdomain(&self, subdomain: &str) -> Result<Tenant, DomainError> {
        let subdomain = subdomain.trim().to_ascii_lowercase();
        let conn = self.db.conn()?;
        match self.tenants.find_by_subdomain(conn, &subdomain).await? {
            Some(tenant) if tenant.is_active() => Ok(tenant),
            _ => {
                debug!(subdomain = %subdomain, "no active tenant for subdomain");
                Err(DomainError::tenant_not_found())
            }
        }
    }

    /// Tenant by id, whatever its status.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Tenant, DomainError> {
        let conn = self.db.conn()?;
        self.tenants
            .find_by_id(conn, id)
            .await?
            .ok_or_else(DomainError::tenant_not_found)
    }

    /// User by id. The password hash never leaves the repository layer.
    pub async fn find_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        let conn = self.db.conn()?;
        self.users
            .find_by_id(conn, user_id)
            .await?
            .map(|c| c.user)
            .ok_or_else(DomainError::user_not_found)
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, DomainError> {
        let conn = self.db.conn()?;
        self.tenants.list(conn).await
    }

    /// Merge `patch` onto the stored tenant.
    pub async fn update_tenant(&self, id: Uuid, mut patch: TenantPatch) -> Result<Tenant, DomainError> {
        if let Some(name) = patch.company_name.take() {
            patch.company_name = Some(validate_company_name(
                &name,
                self.config.max_company_name_length,
            )?);
        }

        let this = self.clone();
        let tenant = self
            .db
            .transaction(TxConfig::default(), move |tx| {
                Box::pin(async move {
                    let mut tenant = this
                        .tenants
                        .find_by_id(tx, id)
                        .await?
                        .ok_or_else(DomainError::tenant_not_found)?;
                    let previous = tenant.status;
                    patch.apply_to(&mut tenant);
                    if !this.tenants.update(tx, &tenant).await? {
                        return Err(DomainError::tenant_not_found());
                    }
                    if previous != tenant.status {
                        info!(tenant_id = %id, from = %previous, to = %tenant.status, "tenant status changed");
                    }
                    Ok(tenant)
                })
            })
            .await?;

        debug!(tenant_id = %id, "tenant updated");
        Ok(tenant)
    }

    /// Suspending a suspended tenant succeeds unchanged.
    pub async fn suspend(&self, id: Uuid) -> Result<Tenant, DomainError> {
        self.set_status(id, TenantStatus::Suspended).await
    }

    pub async fn reactivate(&self, id: Uuid) -> Result<Tenant, DomainError> {
        self.set_status(id, TenantStatus::Active).await
    }

    async fn set_status(&self, id: Uuid, status: TenantStatus) -> Result<Tenant, DomainError> {
        self.update_tenant(
            id,
            TenantPatch {
                status: Some(status),
                ..TenantPatch::default()
            },
        )
        .await
    }

    /// Drop the namespace and remove metrics, users and the tenant row.
    ///
    /// With transactional DDL all of it is one transaction. Otherwise the rows
    /// go in one transaction first and the namespace is dropped after commit;
    /// if that drop fails the namespace is left behind, reported on the
    /// `tenancy::reconcile` target and the error is returned.
    pub async fn delete_tenant(&self, id: Uuid) -> Result<(), DomainError> {
        let schema = self.schema_name(id);
        let ddl_in_tx = self.ddl_in_tx();

        let this = self.clone();
        let schema_in_tx = schema.clone();
        let users = self
            .db
            .transaction(TxConfig::default(), move |tx| {
                Box::pin(async move {
                    if this.tenants.find_by_id(tx, id).await?.is_none() {
                        return Err(DomainError::tenant_not_found());
                    }
                    if ddl_in_tx {
                        this.schemas.deprovision(tx, &schema_in_tx).await?;
                    }
                    if !this.metrics.delete(tx, id).await? {
                        warn!(tenant_id = %id, "tenant had no metrics row at deletion");
                    }
                    let users = this.users.delete_by_tenant(tx, id).await?;
                    if !this.tenants.delete(tx, id).await? {
                        return Err(DomainError::tenant_not_found());
                    }
                    Ok(users)
                })
            })
            .await?;

        if !ddl_in_tx && let Err(e) = self.schemas.deprovision(self.db.conn()?, &schema).await {
            tracing::error!(
                target: "tenancy::reconcile",
                tenant_id = %id,
                schema = %schema,
                error = %e,
                "tenant deleted but its namespace could not be dropped; manual reconciliation required"
            );
            return Err(e);
        }

        info!(tenant_id = %id, schema = %schema, users_removed = users, "tenant deleted");
        Ok(())
    }

    pub async fn get_metrics(&self, tenant_id: Uuid) -> Result<TenantMetrics, DomainError> {
        let conn = self.db.conn()?;
        self.metrics
            .find(conn, tenant_id)
            .await?
            .ok_or_else(DomainError::metrics_not_found)
    }

    /// Apply a usage report. A missing row means the creation invariant was broken.
    pub async fn update_metrics(
        &self,
        tenant_id: Uuid,
        patch: TenantMetricsPatch,
    ) -> Result<TenantMetrics, DomainError> {
        if patch.storage_used.is_some_and(|v| v < 0) {
            return Err(DomainError::validation("storageUsed", "must not be negative"));
        }
        if patch.active_users.is_some_and(|v| v < 0) {
            return Err(DomainError::validation("activeUsers", "must not be negative"));
        }

        let this = self.clone();
        self.db
            .transaction(TxConfig::default(), move |tx| {
                Box::pin(async move {
                    let Some(mut metrics) = this.metrics.find(tx, tenant_id).await? else {
                        if this.tenants.find_by_id(tx, tenant_id).await?.is_some() {
                            tracing::error!(
                                tenant_id = %tenant_id,
                                "metrics row missing for existing tenant"
                            );
                        }
                        return Err(DomainError::metrics_not_found());
                    };
                    patch.apply_to(&mut metrics);
                    if !this.metrics.update(tx, &metrics).await? {
                        return Err(DomainError::metrics_not_found());
                    }
                    Ok(metrics)
                })
            })
            .await
    }
}
