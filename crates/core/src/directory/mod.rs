//! Organization directory: tenants, departments and employee records.
//!
//! Everything here is tenant-scoped through typed IDs. Constructors validate
//! their input and return a `DirectoryError` instead of storing bad data.

pub mod department;
pub mod employee;
pub mod error;
pub mod tenant;

pub use department::{Department, DepartmentStatus, NewDepartment};
pub use employee::{
    Address, Employee, EmployeeStatus, EmploymentType, Gender, MaritalStatus, NewEmployee,
    MAX_SALARY_COMPONENT, SalaryBreakdown, SalaryComponents,
};
pub use error::DirectoryError;
pub use tenant::{Feature, NewTenant, Subscription, SubscriptionPlan, Tenant, TenantSettings};
