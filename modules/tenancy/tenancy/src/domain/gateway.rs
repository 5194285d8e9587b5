//! Auth Gateway: registration, login and password changes.

use std::sync::Arc;

use secrecy::SecretString;
use tenancy_sdk::{NewTenant, PlanType, Tenant, User};
use tenantry_auth::{roles, CredentialStore, Identity, TokenIssuer};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::DomainError;
use super::ports::SchemaProvisioner;
use super::registry::TenantRegistry;
use super::repos::{MetricsRepository, TenantsRepository, UsersRepository};
use super::validation::{normalize_email, require_password};

pub(crate) const EMAIL_TAKEN: &str = "Email already registered";

/// Self-service signup: a new tenant plus its first administrator.
#[derive(Debug)]
pub struct Registration {
    pub company_name: String,
    pub subdomain: String,
    pub admin_email: String,
    pub admin_password: SecretString,
    pub plan_type: Option<PlanType>,
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub tenant: Tenant,
    pub admin: User,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub user: User,
}

pub struct AuthGateway<T, M, U, S> {
    registry: TenantRegistry<T, M, U, S>,
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenIssuer>,
}

impl<T, M, U, S> Clone for AuthGateway<T, M, U, S> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            credentials: Arc::clone(&self.credentials),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<T, M, U, S> AuthGateway<T, M, U, S>
where
    T: TenantsRepository,
    M: MetricsRepository,
    U: UsersRepository,
    S: SchemaProvisioner,
{
    pub fn new(
        registry: TenantRegistry<T, M, U, S>,
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            registry,
            credentials,
            tokens,
        }
    }

    pub fn registry(&self) -> &TenantRegistry<T, M, U, S> {
        &self.registry
    }

    /// Provision a tenant and its `admin` user under one transaction.
    pub async fn register_tenant(&self, reg: Registration) -> Result<Registered, DomainError> {
        self.register_with_roles(reg, vec![roles::ADMIN.to_owned()])
            .await
    }

    /// Provision the platform tenant whose administrator also holds `superadmin`.
    pub async fn bootstrap_superadmin(&self, reg: Registration) -> Result<Registered, DomainError> {
        let done = self
            .register_with_roles(
                reg,
                vec![roles::ADMIN.to_owned(), roles::SUPERADMIN.to_owned()],
            )
            .await?;
        warn!(user_id = %done.admin.id, tenant_id = %done.tenant.id, "superadmin account created");
        Ok(done)
    }

    async fn register_with_roles(
        &self,
        reg: Registration,
        roles: Vec<String>,
    ) -> Result<Registered, DomainError> {
        let email = normalize_email("adminEmail", &reg.admin_email)?;
        require_password("adminPassword", &reg.admin_password)?;
        let password_hash = self.credentials.hash(&reg.admin_password).await?;

        let tenant = self
            .registry
            .prepare(NewTenant {
                company_name: reg.company_name,
                subdomain: reg.subdomain,
                plan_type: reg.plan_type,
            })
            .await?;

        let registry = self.registry.clone();
        let row = tenant.clone();
        let admin = self
            .registry
            .create_with(&tenant, move |tx| {
                Box::pin(async move {
                    registry.provision_in(tx, &row).await?;

                    let users = registry.users();
                    if users.find_by_email(tx, &email).await?.is_some() {
                        return Err(DomainError::conflict(EMAIL_TAKEN));
                    }
                    let admin = User {
                        id: Uuid::new_v4(),
                        email,
                        tenant_id: row.id,
                        roles,
                        created_at: row.created_at,
                    };
                    users.insert(tx, &admin, &password_hash).await?;
                    Ok(admin)
                })
            })
            .await?;
        let done = Registered { tenant, admin };

        info!(
            tenant_id = %done.tenant.id,
            user_id = %done.admin.id,
            subdomain = %done.tenant.subdomain,
            "tenant registered"
        );
        Ok(done)
    }

    /// Resolve the tenant, verify the password, then check membership.
    ///
    /// All lookups and the hash verification run before any decision so the
    /// three failure modes cost the same and answer the same `Unauthorized`.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        subdomain: &str,
    ) -> Result<LoginOutcome, DomainError> {
        let email = email.trim().to_lowercase();

        let tenant = match self.registry.get_active_by_subdomain(subdomain).await {
            Ok(tenant) => Some(tenant),
            Err(DomainError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        let conn = self.registry.db().conn()?;
        let creds = self.registry.users().find_by_email(conn, &email).await?;
        let verified = self
            .credentials
            .verify(password, creds.as_ref().map(|c| c.password_hash.as_str()))
            .await?;

        let Some(tenant) = tenant else {
            return Err(reject("tenant_not_found", subdomain));
        };
        let Some(creds) = creds.filter(|_| verified) else {
            return Err(reject("invalid_credentials", subdomain));
        };
        if creds.user.tenant_id != tenant.id {
            return Err(reject("tenant_mismatch", subdomain));
        }

        let user = creds.user;
        let access_token = self.tokens.issue(&Identity {
            user_id: user.id,
            email: user.email.clone(),
            tenant_id: user.tenant_id,
            roles: user.roles.clone(),
        })?;

        info!(user_id = %user.id, tenant_id = %tenant.id, "login succeeded");
        Ok(LoginOutcome { access_token, user })
    }

    /// Replace the stored hash after verifying `old_password`.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), DomainError> {
        require_password("newPassword", new_password)?;

        let conn = self.registry.db().conn()?;
        let users = self.registry.users();
        let creds = users.find_by_id(conn, user_id).await?;
        let verified = self
            .credentials
            .verify(old_password, creds.as_ref().map(|c| c.password_hash.as_str()))
            .await?;
        if creds.is_none() || !verified {
            warn!(user_id = %user_id, reason = "invalid_credentials", "password change rejected");
            return Err(DomainError::Unauthorized);
        }

        let hash = self.credentials.hash(new_password).await?;
        if !users.update_password_hash(conn, user_id, &hash).await? {
            return Err(DomainError::Unauthorized);
        }
        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Current user behind a verified token.
    pub async fn resolve_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.registry.find_user(user_id).await
    }
}

fn reject(reason: &'static str, subdomain: &str) -> DomainError {
    warn!(reason, subdomain = %subdomain, "login rejected");
    DomainError::Unauthorized
}
