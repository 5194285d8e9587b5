use serde::{Deserialize, Serialize};
use tenancy_sdk::PlanType;
use uuid::Uuid;

/// Longest accepted schema prefix. Keeps `<prefix><32 hex>` within the
/// 63-byte identifier limit of `PostgreSQL`.
pub const MAX_SCHEMA_PREFIX_LEN: usize = 31;

/// Configuration for the tenancy module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TenancyConfig {
    /// Plan assigned when registration does not name one.
    pub default_plan: PlanType,
    /// Prefix of every provisioned tenant namespace.
    pub schema_prefix: String,
    pub max_company_name_length: usize,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            default_plan: PlanType::Basic,
            schema_prefix: "tenant_".to_owned(),
            max_company_name_length: 255,
        }
    }
}

impl TenancyConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let p = &self.schema_prefix;
        let valid = !p.is_empty()
            && p.len() <= MAX_SCHEMA_PREFIX_LEN
            && p.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
            && p
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            anyhow::bail!(
                "tenancy.schema_prefix must be 1-{MAX_SCHEMA_PREFIX_LEN} chars of [a-z0-9_] starting with a letter or '_'"
            );
        }
        if self.max_company_name_length == 0 {
            anyhow::bail!("tenancy.max_company_name_length must be greater than zero");
        }
        Ok(())
    }

    /// Deterministic namespace name of a tenant.
    #[must_use]
    pub fn schema_name(&self, tenant_id: Uuid) -> String {
        format!("{}{}", self.schema_prefix, tenant_id.simple())
    }
}
