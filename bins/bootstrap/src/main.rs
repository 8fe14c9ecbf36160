//! Super-admin bootstrap.
//!
//! Ensures the `system` tenant and its super-admin login exist, then prints
//! the credentials. Safe to run on every deploy.
//!
//! Usage: cargo run --bin bootstrap

use anyhow::Context;
use hrm_db::Migrator;
use hrm_db::provisioning::{self, ensure_super_admin};
use hrm_shared::AppConfig;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_with_dotenv().context("Failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrm=info".into()),
        )
        .init();

    let db = provisioning::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to apply migrations")?;

    let outcome = ensure_super_admin(&db, &config.bootstrap)
        .await
        .context("Bootstrap failed")?;

    if outcome.user_created {
        println!("Super admin created.");
    } else {
        println!("Super admin already exists, nothing to do.");
    }
    println!("  Tenant:   {} ({})", config.bootstrap.system_tenant_slug, outcome.tenant_id);
    println!("  Email:    {}", outcome.email);
    println!("  Password: {} (default)", config.bootstrap.admin_password);
    println!("Change this password after the first login.");
    Ok(())
}
