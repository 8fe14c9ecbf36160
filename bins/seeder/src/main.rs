//! Database seeder for HRM development and testing.
//!
//! Writes the TechCorp sample tenant: departments, a ten-person hierarchy
//! and a handful of workflow records, then prints the org chart. Records
//! that already exist are skipped, so re-running is safe.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use hrm_db::Migrator;
use hrm_db::provisioning::{self, Tally, seed_sample_org};
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

    println!("Connecting to database...");
    let db = provisioning::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to apply migrations")?;

    println!("Seeding sample organization...");
    let summary = seed_sample_org(&db).await.context("Seeding failed")?;

    report("Tenants", summary.tenants);
    report("Departments", summary.departments);
    report("Employees", summary.employees);
    report("Workflow records", summary.workflow);

    println!("\nOrganization chart:");
    print!("{}", summary.chart.render());
    println!("\nSeeding complete!");
    Ok(())
}

fn report(label: &str, tally: Tally) {
    println!(
        "  {label:<17} {} created, {} already present",
        tally.created, tally.skipped
    );
}
