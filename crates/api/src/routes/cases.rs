//! Onboarding and offboarding case routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use hrm_core::workflow::{
    CaseStatus, NewOffboardingCase, NewOnboardingCase, OffboardingCase, OnboardingCase,
};
use hrm_db::{OffboardingRepository, OnboardingRepository};
use hrm_shared::types::{OffboardingCaseId, OnboardingCaseId, TenantId};
use serde::Deserialize;

use super::StatusChange;
use crate::{ApiResult, AppState};

/// Body of `PUT .../progress`.
#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    /// New percentage, never lower than the stored one.
    pub progress: u8,
}

/// Body of `POST .../offboarding/{id}/clearance`.
#[derive(Debug, Deserialize)]
pub struct ClearItem {
    /// Checklist item name, e.g. `IT`.
    pub item: String,
}

/// Creates onboarding and offboarding routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/onboarding",
            get(list_onboarding).post(open_onboarding),
        )
        .route(
            "/tenants/{tenant_id}/onboarding/{id}/progress",
            put(onboarding_progress),
        )
        .route(
            "/tenants/{tenant_id}/onboarding/{id}/status",
            post(onboarding_status),
        )
        .route(
            "/tenants/{tenant_id}/offboarding",
            get(list_offboarding).post(open_offboarding),
        )
        .route(
            "/tenants/{tenant_id}/offboarding/{id}/progress",
            put(offboarding_progress),
        )
        .route(
            "/tenants/{tenant_id}/offboarding/{id}/status",
            post(offboarding_status),
        )
        .route(
            "/tenants/{tenant_id}/offboarding/{id}/clearance",
            post(clear_offboarding_item),
        )
}

// ============================================================================
// Onboarding
// ============================================================================

async fn open_onboarding(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewOnboardingCase>,
) -> ApiResult<(StatusCode, Json<OnboardingCase>)> {
    let case = OnboardingRepository::new(state.conn())
        .open(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(case)))
}

async fn list_onboarding(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Vec<OnboardingCase>>> {
    Ok(Json(OnboardingRepository::new(state.conn()).list(tenant_id).await?))
}

async fn onboarding_progress(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, OnboardingCaseId)>,
    Json(body): Json<ProgressUpdate>,
) -> ApiResult<Json<OnboardingCase>> {
    let case = OnboardingRepository::new(state.conn())
        .update_progress(tenant_id, id, body.progress)
        .await?;
    Ok(Json(case))
}

async fn onboarding_status(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, OnboardingCaseId)>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<OnboardingCase>> {
    let next = body.parse("onboarding case", CaseStatus::parse)?;
    let case = OnboardingRepository::new(state.conn())
        .transition(tenant_id, id, next)
        .await?;
    Ok(Json(case))
}

// ============================================================================
// Offboarding
// ============================================================================

async fn open_offboarding(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(input): Json<NewOffboardingCase>,
) -> ApiResult<(StatusCode, Json<OffboardingCase>)> {
    let case = OffboardingRepository::new(state.conn())
        .open(tenant_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(case)))
}

async fn list_offboarding(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<Vec<OffboardingCase>>> {
    Ok(Json(OffboardingRepository::new(state.conn()).list(tenant_id).await?))
}

async fn offboarding_progress(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, OffboardingCaseId)>,
    Json(body): Json<ProgressUpdate>,
) -> ApiResult<Json<OffboardingCase>> {
    let case = OffboardingRepository::new(state.conn())
        .update_progress(tenant_id, id, body.progress)
        .await?;
    Ok(Json(case))
}

async fn offboarding_status(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, OffboardingCaseId)>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<OffboardingCase>> {
    let next = body.parse("offboarding case", CaseStatus::parse)?;
    let case = OffboardingRepository::new(state.conn())
        .transition(tenant_id, id, next)
        .await?;
    Ok(Json(case))
}

async fn clear_offboarding_item(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(TenantId, OffboardingCaseId)>,
    Json(body): Json<ClearItem>,
) -> ApiResult<Json<OffboardingCase>> {
    let case = OffboardingRepository::new(state.conn())
        .clear_item(tenant_id, id, &body.item)
        .await?;
    Ok(Json(case))
}
