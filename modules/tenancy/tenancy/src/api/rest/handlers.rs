use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tenancy_sdk::TenantPatch;
use tenantry_auth::axum_ext::AuthClaims;
use tenantry_auth::{RoleAuthorizer, RoleRequirement};
use tenantry_errors::Problem;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::module::{Gateway, Registry};

use super::current_user::CurrentUser;
use super::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    RegisterResponse, TenantDto, TenantMetricsDto, UpdateMetricsRequest, UpdateTenantRequest,
    UserDto,
};
use super::error::ApiResult;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Tenant registered", body = RegisterResponse),
        (status = 409, description = "Subdomain or email already in use", body = Problem),
        (status = 422, description = "Invalid input", body = Problem),
    )
)]
pub async fn register(
    Extension(gateway): Extension<Arc<Gateway>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let done = gateway.register_tenant(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Tenant registered successfully".to_owned(),
            tenant_id: done.tenant.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Problem),
    )
)]
pub async fn login(
    Extension(gateway): Extension<Arc<Gateway>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = gateway
        .login(&req.email, &req.password, &req.subdomain)
        .await?;
    Ok(Json(LoginResponse {
        access_token: outcome.access_token,
        user: outcome.user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 401, description = "Invalid token or old password", body = Problem),
    )
)]
pub async fn change_password(
    Extension(gateway): Extension<Arc<Gateway>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    gateway
        .change_password(user.id, &req.old_password, &req.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_owned(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Missing or invalid token", body = Problem),
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(user.into())
}

#[utoipa::path(
    get,
    path = "/tenants",
    tag = "tenants",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All tenants", body = [TenantDto]),
        (status = 403, description = "Superadmin only", body = Problem),
    )
)]
pub async fn list_tenants(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
) -> ApiResult<Json<Vec<TenantDto>>> {
    RoleAuthorizer.check(&claims, &RoleRequirement::superadmin())?;
    let tenants = registry.list().await?;
    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/tenants/{id}",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Tenant", body = TenantDto),
        (status = 403, description = "Not an administrator of this tenant", body = Problem),
        (status = 404, description = "Tenant not found", body = Problem),
    )
)]
pub async fn get_tenant(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TenantDto>> {
    RoleAuthorizer.check_scoped(&claims, &RoleRequirement::admin_or_superadmin(), id)?;
    let tenant = registry.get_by_id(id).await?;
    Ok(Json(tenant.into()))
}

#[utoipa::path(
    put,
    path = "/tenants/{id}",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    request_body = UpdateTenantRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated tenant", body = TenantDto),
        (status = 403, description = "Caller may not change these fields", body = Problem),
        (status = 404, description = "Tenant not found", body = Problem),
    )
)]
pub async fn update_tenant(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTenantRequest>,
) -> ApiResult<Json<TenantDto>> {
    RoleAuthorizer.check_scoped(&claims, &RoleRequirement::admin_or_superadmin(), id)?;
    let patch = TenantPatch::from(req);
    if patch.touches_platform_fields() && !claims.is_superadmin() {
        return Err(DomainError::forbidden("only a superadmin may change plan or status").into());
    }
    let tenant = registry.update_tenant(id, patch).await?;
    Ok(Json(tenant.into()))
}

#[utoipa::path(
    put,
    path = "/tenants/{id}/suspend",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Suspended tenant", body = TenantDto),
        (status = 403, description = "Superadmin only", body = Problem),
        (status = 404, description = "Tenant not found", body = Problem),
    )
)]
pub async fn suspend_tenant(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TenantDto>> {
    RoleAuthorizer.check(&claims, &RoleRequirement::superadmin())?;
    Ok(Json(registry.suspend(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/tenants/{id}/reactivate",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Reactivated tenant", body = TenantDto),
        (status = 403, description = "Superadmin only", body = Problem),
        (status = 404, description = "Tenant not found", body = Problem),
    )
)]
pub async fn reactivate_tenant(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TenantDto>> {
    RoleAuthorizer.check(&claims, &RoleRequirement::superadmin())?;
    Ok(Json(registry.reactivate(id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/tenants/{id}",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Tenant, schema, metrics and users removed"),
        (status = 403, description = "Superadmin only", body = Problem),
        (status = 404, description = "Tenant not found", body = Problem),
    )
)]
pub async fn delete_tenant(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    RoleAuthorizer.check(&claims, &RoleRequirement::superadmin())?;
    registry.delete_tenant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/tenants/{id}/metrics",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Usage counters", body = TenantMetricsDto),
        (status = 403, description = "Not an administrator of this tenant", body = Problem),
        (status = 404, description = "Metrics not found", body = Problem),
    )
)]
pub async fn get_metrics(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TenantMetricsDto>> {
    RoleAuthorizer.check_scoped(&claims, &RoleRequirement::admin_or_superadmin(), id)?;
    Ok(Json(registry.get_metrics(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/tenants/{id}/metrics",
    tag = "tenants",
    params(("id" = Uuid, Path, description = "Tenant id")),
    request_body = UpdateMetricsRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated counters", body = TenantMetricsDto),
        (status = 403, description = "Superadmin only", body = Problem),
        (status = 404, description = "Metrics not found", body = Problem),
        (status = 422, description = "Negative counter", body = Problem),
    )
)]
pub async fn update_metrics(
    Extension(registry): Extension<Arc<Registry>>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMetricsRequest>,
) -> ApiResult<Json<TenantMetricsDto>> {
    RoleAuthorizer.check(&claims, &RoleRequirement::superadmin())?;
    Ok(Json(registry.update_metrics(id, req.into()).await?.into()))
}
