use axum::Json;
use tenantry_errors::{Problem, ValidationViolation};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "Tenantry", description = "Tenant registry and authentication API"),
    paths(
        handlers::register,
        handlers::login,
        handlers::change_password,
        handlers::me,
        handlers::list_tenants,
        handlers::get_tenant,
        handlers::update_tenant,
        handlers::suspend_tenant,
        handlers::reactivate_tenant,
        handlers::delete_tenant,
        handlers::get_metrics,
        handlers::update_metrics,
    ),
    components(schemas(
        dto::RegisterRequest,
        dto::RegisterResponse,
        dto::LoginRequest,
        dto::LoginResponse,
        dto::LoginUserDto,
        dto::ChangePasswordRequest,
        dto::MessageResponse,
        dto::UserDto,
        dto::TenantDto,
        dto::UpdateTenantRequest,
        dto::TenantMetricsDto,
        dto::UpdateMetricsRequest,
        Problem,
        ValidationViolation,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Registration, login and credentials"),
        (name = "tenants", description = "Tenant lifecycle and usage metrics"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
