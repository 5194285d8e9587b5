use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Plain connection requested inside an active transaction")]
    ConnRequestedInsideTx,

    #[error(transparent)]
    Sea(#[from] DbErr),
}

/// True when the datastore rejected a write because of a unique constraint.
///
/// Callers treat this as the authoritative conflict signal; any application
/// level pre-check is only a fast path.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
