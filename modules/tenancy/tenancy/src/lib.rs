//! Tenancy module implementation.
//!
//! Tenant registry with per-tenant storage namespaces, the authentication
//! gateway, and the REST surface guarded by bearer tokens and role checks.
//! The public contract lives in `tenancy-sdk` and is re-exported here.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use tenancy_sdk::{
    NewTenant, PlanType, TenancyClient, TenancyError, Tenant, TenantMetrics, TenantMetricsPatch,
    TenantPatch, TenantStatus, User,
};

pub mod module;
pub use module::{Gateway, Registry, TenancyModule};

pub mod local_client;

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

pub use config::TenancyConfig;
