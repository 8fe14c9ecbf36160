//! Expense report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use hrm_core::workflow::{
    ExpenseItem, ExpenseItemStatus, ExpenseReport, ExpenseReportStatus, NewExpenseItem,
    NewExpenseReport,
};
use hrm_db::{ExpenseRepository, TenantRepository};
use hrm_shared::types::{Currency, EmployeeId, ExpenseItemId, ExpenseReportId, TenantId};
use serde::{Deserialize, Serialize};

use super::{EmployeeFilter, StatusChange};
use crate::error::found;
use crate::{ApiResult, AppState};

/// Body of `POST .../expense-reports`.
#[derive(Debug, Deserialize)]
pub struct FileExpenseReport {
    /// Claimant.
    pub employee_id: EmployeeId,
    /// Title.
    pub title: String,
    /// Falls back to the tenant's configured currency.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Lines.
    pub items: Vec<NewExpenseItem>,
}

/// A report together with its lines.
#[derive(Debug, Serialize)]
pub struct ExpenseReportDetail {
    /// Report header.
    #[serde(flatten)]
    pub report: ExpenseReport,
    /// Lines, in filing order.
    pub items: Vec<ExpenseItem>,
}

/// Creates expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/expense-reports",
            get(list_reports).post(file_report),
        )
        .route("/tenants/{tenant_id}/expense-reports/{id}", get(get_report))
        .route(
            "/tenants/{tenant_id}/expense-reports/{id}/status",
            post(change_report_status),
        )
        .route(
            "/tenants/{tenant_id}/expense-items/{id}/status",
            post(change_item_status),
        )
}

async fn file_report(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(body): Json<FileExpenseReport>,
) -> ApiResult<(StatusCode, Json<ExpenseReportDetail>)> {
    let currency = match body.currency {
        Some(currency) => currency,
        None => {
            TenantRepository::new(state.conn())
                .get(tenant_id)
                .await?
                .settings
                .currency
        }
    };

    let (report, items) = ExpenseRepository::new(state.conn())
        .submit(
            tenant_id,
            NewExpenseReport {
                employee_id: body.employee_id,
                title: body.title,
                currency,
                items: body.items,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ExpenseReportDetail { report, items })))
}

async fn list_reports(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Json<Vec<ExpenseReport>>> {
    let reports = ExpenseRepository::new(state.conn())
        .list(tenant_id, filter.employee_id)
        .await?;
    Ok(Json(reports))
}

async fn get_report(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, ExpenseReportId)>,
) -> ApiResult<Json<ExpenseReportDetail>> {
    let found_report = ExpenseRepository::new(state.conn())
        .find_with_items(tenant_id, id)
        .await?;
    let (report, items) = found(found_report, "Expense report", id)?;
    Ok(Json(ExpenseReportDetail { report, items }))
}

async fn change_report_status(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, ExpenseReportId)>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<ExpenseReport>> {
    let next = body.parse("expense report", ExpenseReportStatus::parse)?;
    let report = ExpenseRepository::new(state.conn())
        .transition_report(tenant_id, id, next)
        .await?;
    Ok(Json(report))
}

async fn change_item_status(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, ExpenseItemId)>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<ExpenseItem>> {
    let next = body.parse("expense item", ExpenseItemStatus::parse)?;
    let item = ExpenseRepository::new(state.conn())
        .transition_item(tenant_id, id, next)
        .await?;
    Ok(Json(item))
}
