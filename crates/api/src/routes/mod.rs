//! API route definitions.
//!
//! Everything below `/tenants/{tenant_id}` is scoped to that tenant: a record
//! id from another tenant is reported as not found.

use axum::Router;
use hrm_core::workflow::parse_status;
use hrm_shared::types::EmployeeId;
use serde::Deserialize;

use crate::{ApiError, AppState};

pub mod benefits;
pub mod cases;
pub mod employees;
pub mod expenses;
pub mod health;
pub mod tenants;
pub mod timesheets;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(tenants::routes())
        .merge(employees::routes())
        .merge(expenses::routes())
        .merge(cases::routes())
        .merge(timesheets::routes())
        .merge(benefits::routes())
}

/// Body of every `POST .../status` endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusChange {
    /// Target status, snake case.
    pub status: String,
}

impl StatusChange {
    /// Parses the target into a status enum, rejecting unknown values with 400.
    pub fn parse<S>(
        &self,
        kind: &'static str,
        parse: impl FnOnce(&str) -> Option<S>,
    ) -> Result<S, ApiError> {
        parse_status(kind, self.status.trim(), parse).map_err(|e| ApiError::lifecycle(&e))
    }
}

/// Optional `?employee_id=` filter on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeeFilter {
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
}
