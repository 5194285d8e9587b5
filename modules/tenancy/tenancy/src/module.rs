//! Wiring of the tenancy module.

use std::sync::Arc;

use anyhow::Context;
use tenancy_sdk::TenancyClient;
use tenantry_auth::axum_ext::BearerAuthState;
use tenantry_auth::{Argon2CredentialStore, AuthConfig, JwtTokenService};
use tenantry_db::Db;
use tracing::info;

use crate::config::TenancyConfig;
use crate::domain::gateway::AuthGateway;
use crate::domain::registry::TenantRegistry;
use crate::infra::schema::SeaSchemaProvisioner;
use crate::infra::storage::{Migrator, SeaMetricsRepository, SeaTenantsRepository, SeaUsersRepository};
use crate::local_client::TenancyLocalClient;

pub type Registry =
    TenantRegistry<SeaTenantsRepository, SeaMetricsRepository, SeaUsersRepository, SeaSchemaProvisioner>;

pub type Gateway =
    AuthGateway<SeaTenantsRepository, SeaMetricsRepository, SeaUsersRepository, SeaSchemaProvisioner>;

/// Tenant registry, auth gateway and their REST surface over one database.
#[derive(Clone)]
pub struct TenancyModule {
    registry: Arc<Registry>,
    gateway: Arc<Gateway>,
    bearer: BearerAuthState,
}

impl TenancyModule {
    pub fn new(db: Db, cfg: TenancyConfig, auth: &AuthConfig) -> anyhow::Result<Self> {
        cfg.validate().context("invalid tenancy config")?;
        let tokens = Arc::new(JwtTokenService::new(auth).context("invalid auth config")?);
        let credentials =
            Arc::new(Argon2CredentialStore::new().context("failed to prepare password hasher")?);

        let registry = TenantRegistry::new(
            db,
            Arc::new(SeaTenantsRepository),
            Arc::new(SeaMetricsRepository),
            Arc::new(SeaUsersRepository),
            Arc::new(SeaSchemaProvisioner),
            Arc::new(cfg),
        );
        let gateway = AuthGateway::new(registry.clone(), credentials, tokens.clone());

        info!(
            schema_prefix = %registry.config().schema_prefix,
            default_plan = %registry.config().default_plan,
            "tenancy module initialized"
        );

        Ok(Self {
            registry: Arc::new(registry),
            gateway: Arc::new(gateway),
            bearer: BearerAuthState::new(tokens),
        })
    }

    /// Apply the tenancy schema migrations.
    pub async fn migrate(db: &Db) -> anyhow::Result<()> {
        db.run_migrations::<Migrator>()
            .await
            .context("tenancy migrations failed")?;
        info!("tenancy migrations applied");
        Ok(())
    }

    pub fn router(&self) -> axum::Router {
        crate::api::rest::routes::router(
            Arc::clone(&self.registry),
            Arc::clone(&self.gateway),
            self.bearer.clone(),
        )
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn TenancyClient> {
        Arc::new(TenancyLocalClient::new(Arc::clone(&self.registry)))
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }
}
