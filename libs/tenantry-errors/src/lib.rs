//! Error primitives shared by Tenantry services.
//!
//! - [`Problem`]: RFC 9457 body with an axum `IntoResponse` impl
//! - [`ErrDef`]: `const` catalog entries that render into `Problem`
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod problem;

pub use catalog::{ErrDef, TYPE_BASE};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};
