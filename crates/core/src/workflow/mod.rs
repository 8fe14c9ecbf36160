//! Workflow records and their status lifecycles.
//!
//! Every record (expense, onboarding, offboarding, timesheet, enrollment)
//! carries a closed status enum. Moves between statuses go through
//! [`transition`], which consults the enum's table and the record's own
//! guards.
//!
//! # Modules
//!
//! - `types` - Status enums
//! - `lifecycle` - Transition tables and the `transition` operation
//! - `error` - Lifecycle and record validation errors
//! - `expense`, `onboarding`, `timesheet`, `benefits` - The records

pub mod benefits;
pub mod error;
pub mod expense;
pub mod lifecycle;
pub mod onboarding;
pub mod timesheet;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use benefits::{BenefitPlan, BenefitType, Coverage, Enrollment, NewBenefitPlan, NewEnrollment};
pub use error::{LifecycleError, RecordError};
pub use expense::{
    ExpenseCategory, ExpenseItem, ExpenseReport, MAX_EXPENSE_AMOUNT, NewExpenseItem,
    NewExpenseReport,
};
pub use lifecycle::{Lifecycle, StatusRecord, parse_status, transition};
pub use onboarding::{
    ClearanceItem, NewOffboardingCase, NewOnboardingCase, OffboardingCase, OnboardingCase,
    SeparationReason,
};
pub use timesheet::{NewTimesheet, Timesheet, WeekHours, weekly_total};
pub use types::{CaseStatus, EnrollmentStatus, ExpenseItemStatus, ExpenseReportStatus, TimesheetStatus};
