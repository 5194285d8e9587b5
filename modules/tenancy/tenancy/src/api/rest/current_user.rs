//! Second stage of the request filter: load the user behind verified claims.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tenancy_sdk::User;
use tenantry_auth::Claims;
use tenantry_errors::Problem;

use crate::domain::error::DomainError;
use crate::module::Gateway;

/// User resolved from the bearer token subject.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                DomainError::internal("current user missing - resolve_current_user not layered")
                    .into()
            })
    }
}

/// Runs after `require_bearer`. A subject that no longer exists is treated as
/// an invalid token.
pub async fn resolve_current_user(
    State(gateway): State<Arc<Gateway>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = request.extensions().get::<Claims>().map(|c| c.sub) else {
        return Problem::from(DomainError::internal(
            "claims missing - require_bearer not layered",
        ))
        .into_response();
    };

    match gateway.resolve_user(user_id).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(DomainError::NotFound { .. }) => {
            tracing::warn!(user_id = %user_id, "token subject no longer exists");
            Problem::from(DomainError::Unauthorized).into_response()
        }
        Err(e) => Problem::from(e).into_response(),
    }
}
