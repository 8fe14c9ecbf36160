//! Org hierarchy error types.

use hrm_shared::types::{EmployeeId, TenantId};
use thiserror::Error;

/// Errors raised while editing or traversing the reporting hierarchy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrgError {
    /// The referenced manager does not exist in this tenant.
    #[error("Reporting manager {0} does not exist in this tenant")]
    InvalidReference(EmployeeId),

    /// Linking the employee to the manager would close a loop.
    #[error("Assigning manager {manager} to employee {employee} would create a reporting cycle")]
    CycleDetected {
        /// Employee being moved.
        employee: EmployeeId,
        /// Proposed manager.
        manager: EmployeeId,
    },

    /// Employee is already part of the chart.
    #[error("Employee {0} already exists")]
    DuplicateEmployee(EmployeeId),

    /// Employee belongs to a different tenant than the chart.
    #[error("Employee belongs to tenant {found}, expected {expected}")]
    TenantMismatch {
        /// The chart's tenant.
        expected: TenantId,
        /// The employee's tenant.
        found: TenantId,
    },

    /// Employee is not part of the chart.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),
}

impl OrgError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidReference(_) | Self::CycleDetected { .. } => 422,
            Self::DuplicateEmployee(_) => 409,
            Self::TenantMismatch { .. } => 400,
            Self::EmployeeNotFound(_) => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
            Self::DuplicateEmployee(_) => "DUPLICATE_EMPLOYEE",
            Self::TenantMismatch { .. } => "TENANT_MISMATCH",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
        }
    }
}
