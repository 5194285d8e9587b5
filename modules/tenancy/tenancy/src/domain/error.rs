//! Domain error types for the tenancy module.

use sea_orm::DbErr;
use tenancy_sdk::TenancyError;
use tenantry_auth::AuthError;
use tenantry_db::{DbError, InfraError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// A unique constraint rejected the write, or the advisory pre-check did.
    #[error("{0}")]
    Conflict(String),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Authentication failed. The public message never names the failing check.
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    #[must_use]
    pub fn tenant_not_found() -> Self {
        Self::NotFound { resource: "Tenant" }
    }

    #[must_use]
    pub fn metrics_not_found() -> Self {
        Self::NotFound {
            resource: "Tenant metrics",
        }
    }

    #[must_use]
    pub fn user_not_found() -> Self {
        Self::NotFound { resource: "User" }
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify a write failure: unique violations become `Conflict(on_conflict)`.
    #[must_use]
    pub fn from_write(err: DbErr, on_conflict: &str) -> Self {
        if tenantry_db::is_unique_violation(&err) {
            Self::Conflict(on_conflict.to_owned())
        } else {
            Self::Database(err.to_string())
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(err: DbErr) -> Self {
        Self::from_write(err, "Resource already exists")
    }
}

impl From<DbError> for DomainError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sea(e) => e.into(),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        if err.is_unique_violation() {
            Self::Conflict("Resource already exists".to_owned())
        } else {
            Self::Database(err.message().to_owned())
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                Self::Unauthorized
            }
            AuthError::Forbidden => Self::Forbidden("insufficient role".to_owned()),
            AuthError::InvalidConfig(msg) | AuthError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for TenancyError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Conflict(msg) => TenancyError::conflict(msg),
            DomainError::NotFound { resource } => TenancyError::not_found(resource),
            DomainError::Unauthorized => TenancyError::Unauthorized,
            DomainError::Forbidden(_) => TenancyError::Forbidden,
            DomainError::Validation { field, message } => TenancyError::validation(field, message),
            DomainError::Database(_) | DomainError::Internal(_) => TenancyError::Internal,
        }
    }
}
