//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped by `tenant_id`.

pub mod benefit;
pub mod department;
pub mod employee;
pub mod expense;
pub mod onboarding;
pub mod tenant;
pub mod timesheet;
pub mod user;

pub use benefit::{BenefitError, BenefitRepository};
pub use department::{DepartmentError, DepartmentRepository};
pub use employee::{EmployeeError, EmployeeRepository};
pub use expense::{ExpenseError, ExpenseRepository};
pub use onboarding::{OffboardingRepository, OnboardingError, OnboardingRepository};
pub use tenant::{TenantError, TenantRepository};
pub use timesheet::{TimesheetError, TimesheetRepository};
pub use user::{NewUser, User, UserError, UserRepository};

use hrm_shared::types::{EmployeeId, TenantId};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{employees, tenants};

/// Returns true if the tenant exists.
pub(crate) async fn tenant_exists(db: &impl ConnectionTrait, tenant_id: TenantId) -> Result<bool, DbErr> {
    let count = tenants::Entity::find_by_id(tenant_id.into_inner())
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Returns true if the employee exists in the tenant.
pub(crate) async fn employee_exists(
    db: &impl ConnectionTrait,
    tenant_id: TenantId,
    employee_id: EmployeeId,
) -> Result<bool, DbErr> {
    let count = employees::Entity::find()
        .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(employees::Column::Id.eq(employee_id.into_inner()))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Maps a domain error onto `AppError` by its status and code.
macro_rules! domain_into_app {
    ($err:expr) => {{
        let err = $err;
        hrm_shared::AppError::from_status(err.status_code(), err.error_code(), err.to_string())
    }};
}
pub(crate) use domain_into_app;
