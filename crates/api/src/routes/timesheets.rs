//! Weekly timesheet routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use hrm_core::workflow::{NewTimesheet, Timesheet, TimesheetStatus};
use hrm_db::TimesheetRepository;
use hrm_shared::types::{TenantId, TimesheetId};

use super::{EmployeeFilter, StatusChange};
use crate::{ApiResult, AppState};

/// Creates timesheet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/timesheets",
            get(list_timesheets).post(log_week),
        )
        .route(
            "/tenants/{tenant_id}/timesheets/{id}/status",
            post(change_status),
        )
}

async fn log_week(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewTimesheet>,
) -> ApiResult<(StatusCode, Json<Timesheet>)> {
    let sheet = TimesheetRepository::new(state.conn())
        .create(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(sheet)))
}

async fn list_timesheets(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Json<Vec<Timesheet>>> {
    let sheets = TimesheetRepository::new(state.conn())
        .list(tenant_id, filter.employee_id)
        .await?;
    Ok(Json(sheets))
}

async fn change_status(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, TimesheetId)>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<Timesheet>> {
    let next = body.parse("timesheet", TimesheetStatus::parse)?;
    let sheet = TimesheetRepository::new(state.conn())
        .transition(tenant_id, id, next)
        .await?;
    Ok(Json(sheet))
}
