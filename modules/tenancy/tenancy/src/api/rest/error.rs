//! REST error mapping for the tenancy module.

use http::StatusCode;
use tenantry_errors::{ErrDef, Problem};

use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, Problem>;

const CONFLICT: ErrDef = ErrDef::new(StatusCode::CONFLICT, "TENANCY_CONFLICT");
const NOT_FOUND: ErrDef = ErrDef::new(StatusCode::NOT_FOUND, "TENANCY_NOT_FOUND");
const UNAUTHORIZED: ErrDef = ErrDef::new(StatusCode::UNAUTHORIZED, "TENANCY_UNAUTHORIZED");
const FORBIDDEN: ErrDef = ErrDef::new(StatusCode::FORBIDDEN, "TENANCY_FORBIDDEN");
const VALIDATION: ErrDef = ErrDef::new(StatusCode::UNPROCESSABLE_ENTITY, "TENANCY_VALIDATION");
const INTERNAL: ErrDef = ErrDef::new(StatusCode::INTERNAL_SERVER_ERROR, "TENANCY_INTERNAL");

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let trace_id = tracing::Span::current()
            .id()
            .map(|id| id.into_u64().to_string());

        let problem = match e {
            DomainError::Conflict(msg) => CONFLICT.problem(msg),
            DomainError::NotFound { resource } => NOT_FOUND.problem(format!("{resource} not found")),
            // Never say which credential was wrong.
            DomainError::Unauthorized => UNAUTHORIZED.problem("Invalid credentials"),
            DomainError::Forbidden(msg) => FORBIDDEN.problem(msg),
            DomainError::Validation { field, message } => VALIDATION
                .problem(message.clone())
                .with_title("Validation Failed")
                .with_violation(field, message),
            DomainError::Database(msg) => {
                tracing::error!(error = %msg, "Database error in tenancy");
                INTERNAL.problem("An internal error occurred")
            }
            DomainError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error in tenancy");
                INTERNAL.problem("An internal error occurred")
            }
        };

        problem.with_trace_id(trace_id)
    }
}
