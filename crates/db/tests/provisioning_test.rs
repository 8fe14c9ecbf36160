//! Integration tests for the sample seed and the super-admin bootstrap.
//!
//! Each test runs against its own migrated in-memory SQLite database.

use hrm_core::auth::{UserRole, verify_password};
use hrm_db::entities::{departments, employees, tenants, users};
use hrm_db::provisioning::{SAMPLE_TENANT_SLUG, ensure_super_admin, seed_sample_org};
use hrm_db::{EmployeeRepository, ExpenseRepository, Migrator, TimesheetRepository, UserRepository};
use hrm_shared::config::BootstrapConfig;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

// ============================================================================
// Test: Bootstrap is idempotent
// ============================================================================
#[tokio::test]
async fn test_bootstrap_twice_yields_one_admin() {
    let db = setup().await;
    let config = BootstrapConfig::default();

    let first = ensure_super_admin(&db, &config).await.unwrap();
    assert!(first.tenant_created);
    assert!(first.user_created);
    assert_eq!(first.email, "admin@hrm.com");

    let second = ensure_super_admin(&db, &config).await.unwrap();
    assert!(!second.tenant_created);
    assert!(!second.user_created);
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.tenant_id, first.tenant_id);

    let admins = UserRepository::new(db.clone())
        .count_by_email("admin@hrm.com")
        .await
        .unwrap();
    assert_eq!(admins, 1);

    let system_tenants = tenants::Entity::find()
        .filter(tenants::Column::Slug.eq("system"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(system_tenants, 1);
}

// ============================================================================
// Test: Changing the configured admin email does not add a second super-admin
// ============================================================================
#[tokio::test]
async fn test_bootstrap_with_new_email_keeps_existing_admin() {
    let db = setup().await;
    let first = ensure_super_admin(&db, &BootstrapConfig::default())
        .await
        .unwrap();

    let renamed = BootstrapConfig {
        admin_email: "root@hrm.com".to_string(),
        ..BootstrapConfig::default()
    };
    let second = ensure_super_admin(&db, &renamed).await.unwrap();
    assert!(!second.user_created);
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.email, "admin@hrm.com");

    let repo = UserRepository::new(db.clone());
    let super_admins = repo
        .count_with_role(first.tenant_id, UserRole::SuperAdmin)
        .await
        .unwrap();
    assert_eq!(super_admins, 1);
    assert_eq!(repo.count_by_email("root@hrm.com").await.unwrap(), 0);
}

// ============================================================================
// Test: Bootstrapped admin can log in with the configured password
// ============================================================================
#[tokio::test]
async fn test_bootstrap_admin_role_and_password() {
    let db = setup().await;
    let config = BootstrapConfig::default();
    let outcome = ensure_super_admin(&db, &config).await.unwrap();

    let repo = UserRepository::new(db.clone());
    let user = repo
        .find_by_email(outcome.tenant_id, "ADMIN@hrm.com")
        .await
        .unwrap()
        .expect("admin should exist");
    assert_eq!(user.role.as_str(), "super_admin");

    let hash = repo
        .password_hash(outcome.tenant_id, "admin@hrm.com")
        .await
        .unwrap()
        .unwrap();
    assert!(hash.contains("t=12"), "work factor should be 12: {hash}");
    assert!(verify_password(&config.admin_password, &hash).unwrap());
    assert!(!verify_password("wrong", &hash).unwrap());

    let stored = users::Entity::find().count(&db).await.unwrap();
    assert_eq!(stored, 1);
}

// ============================================================================
// Test: Seeding twice leaves exactly one copy of everything
// ============================================================================
#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = setup().await;

    let first = seed_sample_org(&db).await.unwrap();
    assert_eq!(first.tenants.created, 1);
    assert_eq!(first.departments.created, 5);
    assert_eq!(first.employees.created, 10);
    assert!(first.workflow.created > 0);

    let second = seed_sample_org(&db).await.unwrap();
    assert_eq!(second.tenant_id, first.tenant_id);
    assert_eq!(second.tenants.created, 0);
    assert_eq!(second.departments.created, 0);
    assert_eq!(second.employees.created, 0);
    assert_eq!(second.workflow.created, 0);
    assert_eq!(second.employees.skipped, 10);
    assert_eq!(second.workflow.skipped, first.workflow.created);

    let tenant_count = tenants::Entity::find()
        .filter(tenants::Column::Slug.eq(SAMPLE_TENANT_SLUG))
        .count(&db)
        .await
        .unwrap();
    let department_count = departments::Entity::find().count(&db).await.unwrap();
    let employee_count = employees::Entity::find().count(&db).await.unwrap();
    assert_eq!((tenant_count, department_count, employee_count), (1, 5, 10));
}

// ============================================================================
// Test: Seeded hierarchy traversals
// ============================================================================
#[tokio::test]
async fn test_seeded_chain_and_subtree() {
    let db = setup().await;
    let summary = seed_sample_org(&db).await.unwrap();
    let repo = EmployeeRepository::new(db.clone());

    let arjun = repo
        .find_by_code(summary.tenant_id, "EMP006")
        .await
        .unwrap()
        .unwrap();
    let chain: Vec<String> = repo
        .chain(summary.tenant_id, arjun.id)
        .await
        .unwrap()
        .into_iter()
        .map(|node| node.designation)
        .collect();
    assert_eq!(chain, ["Engineering Manager", "CTO", "CEO"]);

    let ceo = repo
        .find_by_code(summary.tenant_id, "EMP001")
        .await
        .unwrap()
        .unwrap();
    let everyone = repo.subtree(summary.tenant_id, ceo.id).await.unwrap();
    assert_eq!(everyone.len(), 9);
    assert!(everyone.iter().all(|node| node.id != ceo.id));

    let roots: Vec<_> = summary.chart.roots().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, ["Rajesh Kumar"]);
    assert!(summary.chart.render().starts_with("Rajesh Kumar (CEO)\n"));
}

// ============================================================================
// Test: Seeded workflow records keep their totals
// ============================================================================
#[tokio::test]
async fn test_seeded_totals() {
    let db = setup().await;
    let summary = seed_sample_org(&db).await.unwrap();

    let sheets = TimesheetRepository::new(db.clone())
        .list(summary.tenant_id, None)
        .await
        .unwrap();
    let alpha = sheets
        .iter()
        .find(|s| s.project == "Project Alpha")
        .expect("Project Alpha timesheet");
    assert_eq!(alpha.total_hours, dec!(37));
    assert!(sheets.iter().all(|s| s.total_matches()));

    let expenses = ExpenseRepository::new(db.clone());
    let reports = expenses.list(summary.tenant_id, None).await.unwrap();
    assert_eq!(reports.len(), 1);
    let (report, items) = expenses
        .find_with_items(summary.tenant_id, reports[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(report.total, dec!(11750.50));
    assert!(report.total_matches(&items));
}
