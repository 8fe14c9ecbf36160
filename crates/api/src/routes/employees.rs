//! Employee directory and reporting-hierarchy routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use hrm_core::directory::{Employee, NewEmployee};
use hrm_core::org::OrgNode;
use hrm_db::{EmployeeRepository, TenantRepository};
use hrm_shared::types::{EmployeeId, PageRequest, PageResponse, TenantId};
use serde::Deserialize;
use tracing::info;

use crate::{ApiResult, AppState};

/// Body of `PUT .../employees/{id}/manager`.
#[derive(Debug, Deserialize)]
pub struct ManagerChange {
    /// New manager; `null` makes the employee a root.
    pub manager_id: Option<EmployeeId>,
}

/// Creates employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/employees",
            get(list_employees).post(create_employee),
        )
        .route("/tenants/{tenant_id}/employees/{id}", get(get_employee))
        .route(
            "/tenants/{tenant_id}/employees/{id}/manager",
            put(change_manager),
        )
        .route("/tenants/{tenant_id}/employees/{id}/reports", get(reports))
        .route("/tenants/{tenant_id}/employees/{id}/chain", get(chain))
}

async fn create_employee(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewEmployee>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let employee = EmployeeRepository::new(state.conn())
        .create(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn list_employees(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<Employee>>> {
    TenantRepository::new(state.conn()).get(tenant_id).await?;
    let page = EmployeeRepository::new(state.conn())
        .list(tenant_id, &page)
        .await?;
    Ok(Json(page))
}

async fn get_employee(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, EmployeeId)>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(EmployeeRepository::new(state.conn()).get(tenant_id, id).await?))
}

async fn change_manager(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, EmployeeId)>,
    Json(body): Json<ManagerChange>,
) -> ApiResult<Json<Employee>> {
    let employee = EmployeeRepository::new(state.conn())
        .reassign(tenant_id, id, body.manager_id)
        .await?;
    info!(
        employee_id = %id,
        manager_id = ?body.manager_id,
        "Reporting line changed via API"
    );
    Ok(Json(employee))
}

/// Everyone below the employee, breadth first.
async fn reports(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, EmployeeId)>,
) -> ApiResult<Json<Vec<OrgNode>>> {
    Ok(Json(
        EmployeeRepository::new(state.conn())
            .subtree(tenant_id, id)
            .await?,
    ))
}

/// Managers from the direct one up to the root.
async fn chain(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, EmployeeId)>,
) -> ApiResult<Json<Vec<OrgNode>>> {
    Ok(Json(
        EmployeeRepository::new(state.conn())
            .chain(tenant_id, id)
            .await?,
    ))
}
