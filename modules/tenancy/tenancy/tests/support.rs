//! Shared fixtures for tenancy integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use secrecy::SecretString;
use tenancy::domain::gateway::{AuthGateway, Registration};
use tenancy::domain::ports::SchemaProvisioner;
use tenancy::domain::registry::TenantRegistry;
use tenancy::domain::repos::{MetricsRepository, TenantsRepository, UsersRepository};
use tenancy::infra::storage::entity::{tenant, tenant_metrics, tenant_schema, user};
use tenancy::{PlanType, TenancyConfig, TenancyModule};
use tenantry_auth::{Argon2CredentialStore, AuthConfig, JwtTokenService};
use tenantry_db::{Db, DbConfig};
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse battery staple";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SecretString::from("integration-test-secret-0123456789abcdef".to_owned()),
        ..AuthConfig::default()
    }
}

/// In-memory database with the tenancy migrations applied.
pub async fn fresh_db() -> Db {
    let db = Db::connect(&DbConfig::sqlite_memory()).await.unwrap();
    TenancyModule::migrate(&db).await.unwrap();
    db
}

pub async fn module() -> (TenancyModule, Db) {
    let db = fresh_db().await;
    let module = TenancyModule::new(db.clone(), TenancyConfig::default(), &auth_config()).unwrap();
    (module, db)
}

/// Registry and gateway over arbitrary repositories, for failure injection.
pub fn wire<T, M, U, S>(
    db: Db,
    tenants: T,
    metrics: M,
    users: U,
    schemas: S,
) -> AuthGateway<T, M, U, S>
where
    T: TenantsRepository,
    M: MetricsRepository,
    U: UsersRepository,
    S: SchemaProvisioner,
{
    let auth = auth_config();
    let registry = TenantRegistry::new(
        db,
        Arc::new(tenants),
        Arc::new(metrics),
        Arc::new(users),
        Arc::new(schemas),
        Arc::new(TenancyConfig::default()),
    );
    AuthGateway::new(
        registry,
        Arc::new(Argon2CredentialStore::new().unwrap()),
        Arc::new(JwtTokenService::new(&auth).unwrap()),
    )
}

pub fn registration(subdomain: &str, email: &str) -> Registration {
    Registration {
        company_name: format!("{subdomain} Inc"),
        subdomain: subdomain.to_owned(),
        admin_email: email.to_owned(),
        admin_password: SecretString::from(PASSWORD.to_owned()),
        plan_type: Some(PlanType::Premium),
    }
}

pub fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

pub async fn tenant_count(db: &Db) -> u64 {
    tenant::Entity::find().count(db.conn().unwrap()).await.unwrap()
}

pub async fn tenants_with_subdomain(db: &Db, subdomain: &str) -> u64 {
    tenant::Entity::find()
        .filter(tenant::Column::Subdomain.eq(subdomain))
        .count(db.conn().unwrap())
        .await
        .unwrap()
}

pub async fn metrics_count(db: &Db) -> u64 {
    tenant_metrics::Entity::find()
        .count(db.conn().unwrap())
        .await
        .unwrap()
}

pub async fn users_of(db: &Db, tenant_id: Uuid) -> u64 {
    user::Entity::find()
        .filter(user::Column::TenantId.eq(tenant_id))
        .count(db.conn().unwrap())
        .await
        .unwrap()
}

pub async fn stored_hash(db: &Db, user_id: Uuid) -> String {
    user::Entity::find_by_id(user_id)
        .one(db.conn().unwrap())
        .await
        .unwrap()
        .unwrap()
        .password_hash
}

/// Rows of the `SQLite` namespace catalog.
pub async fn schema_rows(db: &Db) -> u64 {
    tenant_schema::Entity::find()
        .count(db.conn().unwrap())
        .await
        .unwrap()
}
