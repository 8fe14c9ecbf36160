//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - Provisioning routines: the sample-data seed and the super-admin bootstrap

pub mod codec;
pub mod entities;
pub mod migration;
pub mod provisioning;
pub mod repositories;

pub use codec::CorruptRow;
pub use migration::Migrator;
pub use repositories::{
    BenefitRepository, DepartmentRepository, EmployeeRepository, ExpenseRepository,
    OffboardingRepository, OnboardingRepository, TenantRepository, TimesheetRepository,
    UserRepository,
};

use std::time::Duration;

use hrm_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connects using the pool settings from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);
    Database::connect(options).await
}
