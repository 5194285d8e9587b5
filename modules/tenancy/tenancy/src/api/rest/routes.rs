use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use tenantry_auth::axum_ext::{require_bearer, BearerAuthState};

use crate::module::{Gateway, Registry};

use super::current_user::resolve_current_user;
use super::{handlers, openapi};

/// Public and authenticated routes of the tenancy module.
///
/// Authenticated routes pass through `require_bearer` (token check) and then
/// `resolve_current_user`; role checks happen inside each handler.
pub fn router(registry: Arc<Registry>, gateway: Arc<Gateway>, bearer: BearerAuthState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/openapi.json", get(openapi::openapi_json));

    let protected = Router::new()
        .route("/auth/change-password", post(handlers::change_password))
        .route("/auth/me", get(handlers::me))
        .route("/tenants", get(handlers::list_tenants))
        .route(
            "/tenants/{id}",
            get(handlers::get_tenant)
                .put(handlers::update_tenant)
                .delete(handlers::delete_tenant),
        )
        .route("/tenants/{id}/suspend", put(handlers::suspend_tenant))
        .route("/tenants/{id}/reactivate", put(handlers::reactivate_tenant))
        .route(
            "/tenants/{id}/metrics",
            get(handlers::get_metrics).put(handlers::update_metrics),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&gateway),
            resolve_current_user,
        ))
        .route_layer(middleware::from_fn_with_state(bearer, require_bearer));

    public
        .merge(protected)
        .layer(Extension(registry))
        .layer(Extension(gateway))
}
