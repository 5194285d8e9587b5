//! Axum middleware and extractors for bearer authentication.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{claims::Claims, errors::AuthError, traits::TokenValidator};

/// Claims placed in request extensions by [`require_bearer`].
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AuthError::Internal(
                "Claims not found - auth middleware not configured".to_owned(),
            ))
    }
}

#[derive(Clone)]
pub struct BearerAuthState {
    validator: Arc<dyn TokenValidator>,
}

impl BearerAuthState {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token.
///
/// On success the verified [`Claims`] are inserted into request extensions.
pub async fn require_bearer(
    State(BearerAuthState { validator }): State<BearerAuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(request.headers()) else {
        return AuthError::Unauthenticated.into_response();
    };

    let claims = match validator.validate_and_parse(token).await {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Token from `Authorization: Bearer <token>`, if present.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
