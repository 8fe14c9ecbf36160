//! `SeaORM` entity definitions, one module per table.
//!
//! Status columns hold the `as_str` form of the core enums; composite values
//! are JSON documents; money is integer minor units.

pub mod benefit_plans;
pub mod departments;
pub mod employees;
pub mod enrollments;
pub mod expense_items;
pub mod expense_reports;
pub mod offboarding_cases;
pub mod onboarding_cases;
pub mod tenants;
pub mod timesheets;
pub mod users;
