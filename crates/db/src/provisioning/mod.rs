//! Provisioning routines run by the seeder and bootstrap binaries.
//!
//! Both routines take an explicit connection and are idempotent: records that
//! already exist (by their natural key) are left alone and counted as skipped.

mod bootstrap;
mod seed;

pub use bootstrap::{BootstrapOutcome, ensure_super_admin};
pub use seed::{SAMPLE_TENANT_SLUG, SeedSummary, seed_sample_org};

use hrm_core::auth::PasswordError;
use hrm_shared::config::DatabaseConfig;
use sea_orm::{DatabaseConnection, DbErr};

use crate::repositories::{
    BenefitError, DepartmentError, EmployeeError, ExpenseError, OnboardingError, TenantError,
    TimesheetError, UserError,
};

/// Errors raised while provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The store could not be reached.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailure(#[source] DbErr),

    /// A unique key collided and the existing record could not be found.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// The built-in sample data references something it does not define.
    #[error("Invalid sample data: {0}")]
    InvalidSample(String),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Tenant step failed.
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Department step failed.
    #[error(transparent)]
    Department(#[from] DepartmentError),

    /// Employee step failed.
    #[error(transparent)]
    Employee(#[from] EmployeeError),

    /// User step failed.
    #[error(transparent)]
    User(#[from] UserError),

    /// Benefit step failed.
    #[error(transparent)]
    Benefit(#[from] BenefitError),

    /// Expense step failed.
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    /// Onboarding or offboarding step failed.
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),

    /// Timesheet step failed.
    #[error(transparent)]
    Timesheet(#[from] TimesheetError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Connects for a provisioning run, reporting failure as `ConnectionFailure`.
///
/// # Errors
///
/// Returns `ConnectionFailure` if the database cannot be reached.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, ProvisionError> {
    crate::connect_with(config)
        .await
        .map_err(ProvisionError::ConnectionFailure)
}

/// Created/skipped counters for one provisioning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Records written by this run.
    pub created: usize,
    /// Records found already present.
    pub skipped: usize,
}

impl Tally {
    fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.skipped += 1;
        }
    }
}
