//! Database access primitives for Tenantry services.
//!
//! - [`DbConfig`]: pool sizing and transport-level timeouts
//! - [`Db`]: connection handle with scoped transactions
//! - [`TxConfig`], [`TxError`]: transaction settings and typed failures
//! - [`is_unique_violation`]: constraint classification for conflict mapping
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod db;
pub mod errors;
pub mod tx_config;
pub mod tx_error;

pub use config::DbConfig;
pub use db::{Db, TxFuture};
pub use errors::{is_unique_violation, DbError};
pub use tx_config::TxConfig;
pub use tx_error::{InfraError, TxError};

pub type Result<T> = std::result::Result<T, DbError>;
