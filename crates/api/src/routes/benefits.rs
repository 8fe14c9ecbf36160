//! Benefit plan and enrollment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use hrm_core::workflow::{BenefitPlan, Enrollment, EnrollmentStatus, NewBenefitPlan, NewEnrollment};
use hrm_db::BenefitRepository;
use hrm_shared::types::{EnrollmentId, TenantId};

use super::{EmployeeFilter, StatusChange};
use crate::{ApiResult, AppState};

/// Creates benefit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/benefit-plans",
            get(list_plans).post(create_plan),
        )
        .route(
            "/tenants/{tenant_id}/enrollments",
            get(list_enrollments).post(enroll),
        )
        .route(
            "/tenants/{tenant_id}/enrollments/{id}/status",
            post(change_enrollment_status),
        )
}

async fn create_plan(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewBenefitPlan>,
) -> ApiResult<(StatusCode, Json<BenefitPlan>)> {
    let plan = BenefitRepository::new(state.conn())
        .create_plan(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn list_plans(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Vec<BenefitPlan>>> {
    Ok(Json(BenefitRepository::new(state.conn()).list_plans(tenant_id).await?))
}

async fn enroll(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewEnrollment>,
) -> ApiResult<(StatusCode, Json<Enrollment>)> {
    let enrollment = BenefitRepository::new(state.conn())
        .enroll(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn list_enrollments(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Json<Vec<Enrollment>>> {
    let enrollments = BenefitRepository::new(state.conn())
        .list_enrollments(tenant_id, filter.employee_id)
        .await?;
    Ok(Json(enrollments))
}

async fn change_enrollment_status(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, EnrollmentId)>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<Enrollment>> {
    let next = body.parse("enrollment", EnrollmentStatus::parse)?;
    let enrollment = BenefitRepository::new(state.conn())
        .transition_enrollment(tenant_id, id, next)
        .await?;
    Ok(Json(enrollment))
}
