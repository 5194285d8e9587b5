pub mod tenant;
pub mod tenant_metrics;
pub mod tenant_schema;
pub mod user;
