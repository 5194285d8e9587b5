use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tenancy_sdk::{PlanType, Tenant, TenantMetrics, TenantMetricsPatch, TenantPatch, TenantStatus, User};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::gateway::Registration;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub company_name: String,
    pub subdomain: String,
    pub admin_email: String,
    #[schema(value_type = String, format = Password)]
    pub admin_password: SecretString,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "basic")]
    pub plan_type: Option<PlanType>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            company_name: req.company_name,
            subdomain: req.subdomain,
            admin_email: req.admin_email,
            admin_password: req.admin_password,
            plan_type: req.plan_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub tenant_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    #[schema(value_type = String, format = Password)]
    pub password: SecretString,
    pub subdomain: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoginUserDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginUserDto {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<User> for LoginUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            roles: u.roles,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[schema(value_type = String, format = Password)]
    pub old_password: SecretString,
    #[schema(value_type = String, format = Password)]
    pub new_password: SecretString,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub tenant_id: Uuid,
    pub roles: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            tenant_id: u.tenant_id,
            roles: u.roles,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantDto {
    pub id: Uuid,
    pub company_name: String,
    pub subdomain: String,
    #[schema(value_type = String, example = "basic")]
    pub plan_type: PlanType,
    #[schema(value_type = String, example = "active")]
    pub status: TenantStatus,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl From<Tenant> for TenantDto {
    fn from(t: Tenant) -> Self {
        Self {
            id: t.id,
            company_name: t.company_name,
            subdomain: t.subdomain,
            plan_type: t.plan_type,
            status: t.status,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTenantRequest {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub plan_type: Option<PlanType>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<TenantStatus>,
}

impl From<UpdateTenantRequest> for TenantPatch {
    fn from(req: UpdateTenantRequest) -> Self {
        Self {
            company_name: req.company_name,
            plan_type: req.plan_type,
            status: req.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantMetricsDto {
    pub tenant_id: Uuid,
    pub storage_used: i64,
    pub active_users: i32,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub last_activity: OffsetDateTime,
}

impl From<TenantMetrics> for TenantMetricsDto {
    fn from(m: TenantMetrics) -> Self {
        Self {
            tenant_id: m.tenant_id,
            storage_used: m.storage_used,
            active_users: m.active_users,
            last_activity: m.last_activity,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMetricsRequest {
    #[serde(default)]
    pub storage_used: Option<i64>,
    #[serde(default)]
    pub active_users: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_activity: Option<OffsetDateTime>,
}

impl From<UpdateMetricsRequest> for TenantMetricsPatch {
    fn from(req: UpdateMetricsRequest) -> Self {
        Self {
            storage_used: req.storage_used,
            active_users: req.active_users,
            last_activity: req.last_activity,
        }
    }
}
