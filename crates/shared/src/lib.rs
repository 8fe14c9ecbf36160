//! Shared types, errors, and configuration for the HRM backend.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs so a `TenantId` can never be passed where an `EmployeeId` is expected
//! - Currency codes and minor-unit money conversions
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
