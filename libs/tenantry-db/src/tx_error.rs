//! Typed transaction failures.
//!
//! A transaction body returns its own domain error; begin and commit failures
//! surface separately as [`InfraError`].

use std::fmt;

use sea_orm::DbErr;

use crate::errors::is_unique_violation;

/// Database-level failure with the `SeaORM` type stripped off.
#[derive(Debug, Clone)]
pub struct InfraError {
    message: String,
    unique_violation: bool,
}

impl InfraError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unique_violation: false,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failure was a unique constraint rejection, e.g. on deferred commit.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.unique_violation
    }
}

impl From<DbErr> for InfraError {
    fn from(err: DbErr) -> Self {
        Self {
            unique_violation: is_unique_violation(&err),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for InfraError {}

/// Result error of [`crate::Db::in_transaction`].
#[derive(Debug, Clone)]
pub enum TxError<E> {
    /// Returned by the transaction body; the transaction was rolled back.
    Domain(E),
    /// Begin or commit failed.
    Infra(InfraError),
}

impl<E> TxError<E> {
    /// Collapse into the domain error, mapping infrastructure failures with `map_infra`.
    pub fn into_domain<F>(self, map_infra: F) -> E
    where
        F: FnOnce(InfraError) -> E,
    {
        match self {
            TxError::Domain(e) => e,
            TxError::Infra(infra) => map_infra(infra),
        }
    }
}

impl<E: fmt::Display> fmt::Display for TxError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::Domain(e) => write!(f, "{e}"),
            TxError::Infra(e) => write!(f, "infrastructure error: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TxError<E> {}
