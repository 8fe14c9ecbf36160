//! Core business logic for the HRM backend.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state machines live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `directory` - Tenants, departments and employee records
//! - `org` - The reporting hierarchy (manager forest) and its traversals
//! - `workflow` - Status lifecycles for expenses, onboarding, timesheets and benefits
//! - `test_report` - Test-run summarizer producing JSON and HTML dashboards

pub mod auth;
pub mod directory;
pub mod org;
pub mod test_report;
pub mod workflow;
