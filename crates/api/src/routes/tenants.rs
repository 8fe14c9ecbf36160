//! Tenant and department routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use hrm_core::directory::{Department, NewDepartment, NewTenant, Tenant};
use hrm_db::{DepartmentRepository, TenantRepository};
use hrm_shared::types::TenantId;
use tracing::info;

use crate::{ApiResult, AppState};

/// Creates tenant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(list_tenants).post(create_tenant))
        .route("/tenants/{tenant_id}", get(get_tenant))
        .route(
            "/tenants/{tenant_id}/departments",
            get(list_departments).post(create_department),
        )
}

async fn create_tenant(
    State(state): State<AppState>,
    Json(input): Json<NewTenant>,
) -> ApiResult<(StatusCode, Json<Tenant>)> {
    let tenant = TenantRepository::new(state.conn()).create(input).await?;
    info!(tenant_id = %tenant.id, slug = %tenant.slug, "Tenant registered via API");
    Ok((StatusCode::CREATED, Json(tenant)))
}

async fn list_tenants(State(state): State<AppState>) -> ApiResult<Json<Vec<Tenant>>> {
    Ok(Json(TenantRepository::new(state.conn()).list().await?))
}

async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Tenant>> {
    Ok(Json(TenantRepository::new(state.conn()).get(tenant_id).await?))
}

async fn create_department(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewDepartment>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    let department = DepartmentRepository::new(state.conn())
        .create(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn list_departments(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Vec<Department>>> {
    // Unknown tenants 404 rather than listing nothing.
    TenantRepository::new(state.conn()).get(tenant_id).await?;
    Ok(Json(DepartmentRepository::new(state.conn()).list(tenant_id).await?))
}
