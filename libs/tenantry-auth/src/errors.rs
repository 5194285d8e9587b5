use http::StatusCode;
use tenantry_errors::{ErrDef, Problem};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required: missing or invalid token")]
    Unauthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::InvalidToken(_) | Self::TokenExpired
        )
    }
}

const UNAUTHORIZED: ErrDef = ErrDef::new(StatusCode::UNAUTHORIZED, "AUTH_UNAUTHORIZED");
const FORBIDDEN: ErrDef = ErrDef::new(StatusCode::FORBIDDEN, "AUTH_FORBIDDEN");
const INTERNAL: ErrDef = ErrDef::new(StatusCode::INTERNAL_SERVER_ERROR, "AUTH_INTERNAL");

impl From<AuthError> for Problem {
    fn from(err: AuthError) -> Self {
        // Token failures share one public message; the cause stays in the logs.
        match &err {
            e if e.is_unauthorized() => {
                tracing::debug!(reason = %e, "bearer authentication rejected");
                UNAUTHORIZED.problem("Missing, invalid or expired token")
            }
            AuthError::Forbidden => FORBIDDEN.problem("Insufficient role for this operation"),
            other => {
                tracing::error!(error = %other, "auth internal failure");
                INTERNAL.problem("An internal error occurred")
            }
        }
    }
}

#[cfg(feature = "axum-ext")]
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        axum::response::IntoResponse::into_response(Problem::from(self))
    }
}
