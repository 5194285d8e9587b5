//! Tenancy SDK
//!
//! Public contract of the tenancy module:
//! - `TenancyClient` trait for in-process consumers
//! - Model types (`Tenant`, `TenantMetrics`, `User`, typed patches)
//! - Error type (`TenancyError`)

#![forbid(unsafe_code)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod errors;
pub mod models;

pub use api::TenancyClient;
pub use errors::TenancyError;
pub use models::{
    NewTenant, PlanType, Tenant, TenantMetrics, TenantMetricsPatch, TenantPatch, TenantStatus,
    User,
};
