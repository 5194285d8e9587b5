//! Public models of the tenancy module.
//!
//! Transport-agnostic: REST DTOs and storage entities convert to and from these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Commercial plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Basic,
    Premium,
    Enterprise,
}

impl PlanType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(format!("unknown plan type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
}

impl TenantStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            other => Err(format!("unknown tenant status '{other}'")),
        }
    }
}

/// An isolated customer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: Uuid,
    pub company_name: String,
    /// Globally unique, lower-case routing handle.
    pub subdomain: String,
    pub plan_type: PlanType,
    pub status: TenantStatus,
    pub created_at: OffsetDateTime,
}

impl Tenant {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

/// Input for tenant creation. `plan_type = None` selects the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub company_name: String,
    pub subdomain: String,
    pub plan_type: Option<PlanType>,
}

/// Updatable tenant fields. `id`, `subdomain` and `created_at` are not patchable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantPatch {
    pub company_name: Option<String>,
    pub plan_type: Option<PlanType>,
    pub status: Option<TenantStatus>,
}

impl TenantPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none() && self.plan_type.is_none() && self.status.is_none()
    }

    /// Whether the patch touches fields reserved to platform operators.
    #[must_use]
    pub fn touches_platform_fields(&self) -> bool {
        self.plan_type.is_some() || self.status.is_some()
    }

    /// Merge the provided fields onto `tenant`.
    pub fn apply_to(self, tenant: &mut Tenant) {
        if let Some(name) = self.company_name {
            tenant.company_name = name;
        }
        if let Some(plan) = self.plan_type {
            tenant.plan_type = plan;
        }
        if let Some(status) = self.status {
            tenant.status = status;
        }
    }
}

/// Usage counters, one row per tenant for the tenant's whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantMetrics {
    pub tenant_id: Uuid,
    /// Bytes.
    pub storage_used: i64,
    pub active_users: i32,
    pub last_activity: OffsetDateTime,
}

impl TenantMetrics {
    /// Zeroed counters for a freshly created tenant.
    #[must_use]
    pub fn initial(tenant_id: Uuid, now: OffsetDateTime) -> Self {
        Self {
            tenant_id,
            storage_used: 0,
            active_users: 0,
            last_activity: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantMetricsPatch {
    pub storage_used: Option<i64>,
    pub active_users: Option<i32>,
    pub last_activity: Option<OffsetDateTime>,
}

impl TenantMetricsPatch {
    pub fn apply_to(self, metrics: &mut TenantMetrics) {
        if let Some(v) = self.storage_used {
            metrics.storage_used = v;
        }
        if let Some(v) = self.active_users {
            metrics.active_users = v;
        }
        if let Some(v) = self.last_activity {
            metrics.last_activity = v;
        }
    }
}

/// A user account. Password material never leaves the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub tenant_id: Uuid,
    pub roles: Vec<String>,
    pub created_at: OffsetDateTime,
}
