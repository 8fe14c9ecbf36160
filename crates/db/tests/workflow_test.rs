//! Integration tests for workflow records: expenses, cases, timesheets and
//! benefits. Fixtures come from the sample seed.

use hrm_core::workflow::{
    BenefitType, CaseStatus, Coverage, EnrollmentStatus, ExpenseCategory, ExpenseItemStatus,
    ExpenseReport, ExpenseReportStatus, LifecycleError, NewBenefitPlan, NewEnrollment,
    NewExpenseItem, NewExpenseReport, NewOffboardingCase, NewTimesheet, RecordError,
    SeparationReason, TimesheetStatus,
};
use hrm_db::provisioning::seed_sample_org;
use hrm_db::repositories::{BenefitError, ExpenseError, OnboardingError, TimesheetError};
use hrm_db::{
    BenefitRepository, EmployeeRepository, ExpenseRepository, Migrator, OffboardingRepository,
    OnboardingRepository, TimesheetRepository,
};
use hrm_shared::types::{Currency, EmployeeId, TenantId};
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

async fn setup() -> (DatabaseConnection, TenantId) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    let summary = seed_sample_org(&db).await.expect("Failed to seed");
    (db, summary.tenant_id)
}

async fn employee(db: &DatabaseConnection, tenant_id: TenantId, code: &str) -> EmployeeId {
    EmployeeRepository::new(db.clone())
        .find_by_code(tenant_id, code)
        .await
        .unwrap()
        .unwrap()
        .id
}

fn item(amount: rust_decimal::Decimal) -> NewExpenseItem {
    NewExpenseItem {
        category: ExpenseCategory::Equipment,
        description: "USB-C dock".to_string(),
        amount,
        incurred_on: chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
    }
}

// ============================================================================
// Test: Expense item approval is one-way
// ============================================================================
#[tokio::test]
async fn test_expense_item_transitions() {
    let (db, tenant_id) = setup().await;
    let repo = ExpenseRepository::new(db.clone());
    let sneha = employee(&db, tenant_id, "EMP007").await;

    let (_, items) = repo
        .submit(
            tenant_id,
            NewExpenseReport {
                employee_id: sneha,
                title: "Home office".to_string(),
                currency: Currency::Inr,
                items: vec![item(dec!(8999.99))],
            },
        )
        .await
        .unwrap();
    let id = items[0].id;

    let approved = repo
        .transition_item(tenant_id, id, ExpenseItemStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, ExpenseItemStatus::Approved);

    let err = repo
        .transition_item(tenant_id, id, ExpenseItemStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExpenseError::Lifecycle(LifecycleError::InvalidTransition { .. })
    ));
}

// ============================================================================
// Test: Report review path and stored totals
// ============================================================================
#[tokio::test]
async fn test_expense_report_review_keeps_total() {
    let (db, tenant_id) = setup().await;
    let repo = ExpenseRepository::new(db.clone());
    let arjun = employee(&db, tenant_id, "EMP006").await;

    let (report, _) = repo
        .submit(
            tenant_id,
            NewExpenseReport {
                employee_id: arjun,
                title: "Conference".to_string(),
                currency: Currency::Inr,
                items: vec![item(dec!(15000)), item(dec!(2499.50))],
            },
        )
        .await
        .unwrap();
    assert_eq!(report.total, dec!(17499.50));

    let processing = repo
        .transition_report(tenant_id, report.id, ExpenseReportStatus::Processing)
        .await
        .unwrap();
    assert_eq!(processing.status, ExpenseReportStatus::Processing);
    let approved = repo
        .transition_report(tenant_id, report.id, ExpenseReportStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.total, dec!(17499.50));

    let err = repo
        .transition_report(tenant_id, report.id, ExpenseReportStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, ExpenseError::Lifecycle(_)));

    let (stored, items) = repo
        .find_with_items(tenant_id, report.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ExpenseReportStatus::Approved);
    assert_eq!(items.len(), 2);
    assert!(stored.total_matches(&items));
}

// ============================================================================
// Test: Invalid expense input is rejected before writing
// ============================================================================
#[tokio::test]
async fn test_expense_validation() {
    let (db, tenant_id) = setup().await;
    let repo = ExpenseRepository::new(db.clone());
    let arjun = employee(&db, tenant_id, "EMP006").await;

    let err = repo
        .submit(
            tenant_id,
            NewExpenseReport {
                employee_id: arjun,
                title: "Refund".to_string(),
                currency: Currency::Inr,
                items: vec![item(dec!(-5))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExpenseError::Record(RecordError::InvalidAmount(_))));

    let err = repo
        .submit(
            tenant_id,
            NewExpenseReport {
                employee_id: EmployeeId::new(),
                title: "Stranger".to_string(),
                currency: Currency::Inr,
                items: vec![item(dec!(5))],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExpenseError::EmployeeNotFound(_)));
}

// ============================================================================
// Test: A failed item insert leaves no partial report behind
// ============================================================================
#[tokio::test]
async fn test_expense_store_is_all_or_nothing() {
    let (db, tenant_id) = setup().await;
    let repo = ExpenseRepository::new(db.clone());
    let arjun = employee(&db, tenant_id, "EMP006").await;
    let before = repo.list(tenant_id, Some(arjun)).await.unwrap().len();

    let (report, mut items) = ExpenseReport::submit(
        tenant_id,
        NewExpenseReport {
            employee_id: arjun,
            title: "Offsite".to_string(),
            currency: Currency::Inr,
            items: vec![item(dec!(1200)), item(dec!(800))],
        },
        Utc::now(),
    )
    .unwrap();
    // Second item reuses the first item's key, so its insert fails.
    items[1].id = items[0].id;

    let err = repo.store(&report, &items).await.unwrap_err();
    assert!(matches!(err, ExpenseError::Database(_)));
    assert!(repo.find_with_items(tenant_id, report.id).await.unwrap().is_none());
    assert_eq!(repo.list(tenant_id, Some(arjun)).await.unwrap().len(), before);

    let mut skewed = report.clone();
    skewed.total = dec!(1);
    let err = repo.store(&skewed, &items[..1]).await.unwrap_err();
    assert!(matches!(err, ExpenseError::TotalMismatch { .. }));
    assert!(repo.find_with_items(tenant_id, report.id).await.unwrap().is_none());
}

// ============================================================================
// Test: Onboarding completion needs full progress
// ============================================================================
#[tokio::test]
async fn test_onboarding_progress_and_completion() {
    let (db, tenant_id) = setup().await;
    let repo = OnboardingRepository::new(db.clone());
    let case = repo.list(tenant_id).await.unwrap().remove(0);

    repo.transition(tenant_id, case.id, CaseStatus::InProgress)
        .await
        .unwrap();
    repo.update_progress(tenant_id, case.id, 60).await.unwrap();

    let err = repo.update_progress(tenant_id, case.id, 40).await.unwrap_err();
    assert!(matches!(
        err,
        OnboardingError::Lifecycle(LifecycleError::ProgressRegression {
            current: 60,
            requested: 40
        })
    ));

    let err = repo
        .transition(tenant_id, case.id, CaseStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OnboardingError::Lifecycle(LifecycleError::IncompleteProgress { progress: 60 })
    ));

    repo.update_progress(tenant_id, case.id, 100).await.unwrap();
    let done = repo
        .transition(tenant_id, case.id, CaseStatus::Completed)
        .await
        .unwrap();
    assert_eq!(done.status, CaseStatus::Completed);

    let err = repo.update_progress(tenant_id, case.id, 100).await.unwrap_err();
    assert!(matches!(err, OnboardingError::Lifecycle(LifecycleError::ProgressLocked)));
}

// ============================================================================
// Test: Offboarding completion needs every clearance item
// ============================================================================
#[tokio::test]
async fn test_offboarding_clearance() {
    let (db, tenant_id) = setup().await;
    let repo = OffboardingRepository::new(db.clone());
    let rahul = employee(&db, tenant_id, "EMP008").await;

    let case = repo
        .open(
            tenant_id,
            NewOffboardingCase {
                employee_id: rahul,
                position: "Sales Manager".to_string(),
                last_working_day: chrono::NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
                reason: SeparationReason::Resignation,
                clearance: vec!["Laptop returned".to_string(), "Final settlement".to_string()],
            },
        )
        .await
        .unwrap();

    let err = repo
        .open(
            tenant_id,
            NewOffboardingCase {
                employee_id: rahul,
                position: "Sales Manager".to_string(),
                last_working_day: chrono::NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
                reason: SeparationReason::Resignation,
                clearance: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OnboardingError::DuplicateCase(id) if id == rahul));

    repo.transition(tenant_id, case.id, CaseStatus::InProgress)
        .await
        .unwrap();
    repo.update_progress(tenant_id, case.id, 100).await.unwrap();
    repo.clear_item(tenant_id, case.id, "laptop returned")
        .await
        .unwrap();

    let err = repo
        .transition(tenant_id, case.id, CaseStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OnboardingError::Lifecycle(LifecycleError::ClearancePending { pending: 1 })
    ));

    let err = repo
        .clear_item(tenant_id, case.id, "Parking pass")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OnboardingError::Record(RecordError::UnknownClearanceItem(_))
    ));

    let cleared = repo
        .clear_item(tenant_id, case.id, "Final settlement")
        .await
        .unwrap();
    assert_eq!(cleared.pending_clearance(), 0);
    let done = repo
        .transition(tenant_id, case.id, CaseStatus::Completed)
        .await
        .unwrap();
    assert_eq!(done.status, CaseStatus::Completed);
}

// ============================================================================
// Test: Timesheet totals, duplicates and approval
// ============================================================================
#[tokio::test]
async fn test_timesheet_flow() {
    let (db, tenant_id) = setup().await;
    let repo = TimesheetRepository::new(db.clone());
    let arjun = employee(&db, tenant_id, "EMP006").await;
    let monday = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

    let sheet = repo
        .create(
            tenant_id,
            NewTimesheet {
                employee_id: arjun,
                project: "Project Alpha".to_string(),
                week_start: monday,
                hours: [dec!(7.5), dec!(8), dec!(8), dec!(8), dec!(4.5), dec!(0), dec!(0)],
            },
        )
        .await
        .unwrap();
    assert_eq!(sheet.total_hours, dec!(36));

    let err = repo
        .create(
            tenant_id,
            NewTimesheet {
                employee_id: arjun,
                project: "Project Alpha".to_string(),
                week_start: monday,
                hours: [dec!(1); 7],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TimesheetError::DuplicateWeek { .. }));

    let err = repo
        .transition(tenant_id, sheet.id, TimesheetStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, TimesheetError::Lifecycle(_)));

    repo.transition(tenant_id, sheet.id, TimesheetStatus::Submitted)
        .await
        .unwrap();
    let approved = repo
        .transition(tenant_id, sheet.id, TimesheetStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, TimesheetStatus::Approved);

    let stored = repo.find(tenant_id, sheet.id).await.unwrap().unwrap();
    assert_eq!(stored.total_hours, dec!(36));
    assert_eq!(stored.status, TimesheetStatus::Approved);
}

// ============================================================================
// Test: Enrollment activation and duplicate enrollment
// ============================================================================
#[tokio::test]
async fn test_enrollment_flow() {
    let (db, tenant_id) = setup().await;
    let repo = BenefitRepository::new(db.clone());
    let meera = employee(&db, tenant_id, "EMP009").await;

    let plan = repo
        .create_plan(
            tenant_id,
            NewBenefitPlan {
                name: "Vision Basic".to_string(),
                benefit_type: BenefitType::Vision,
                provider: "ClearSight".to_string(),
                coverage: Coverage::Insurance {
                    coverage_amount: dec!(25000),
                    monthly_premium: dec!(150),
                },
            },
        )
        .await
        .unwrap();

    let request = NewEnrollment {
        employee_id: meera,
        plan_id: plan.id,
        effective_from: chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
    };
    let enrollment = repo.enroll(tenant_id, request.clone()).await.unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Pending);

    let err = repo.enroll(tenant_id, request).await.unwrap_err();
    assert!(matches!(err, BenefitError::AlreadyEnrolled { .. }));

    let active = repo
        .transition_enrollment(tenant_id, enrollment.id, EnrollmentStatus::Active)
        .await
        .unwrap();
    assert_eq!(active.status, EnrollmentStatus::Active);
    let err = repo
        .transition_enrollment(tenant_id, enrollment.id, EnrollmentStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, BenefitError::Lifecycle(_)));

    let plans = repo.list_plans(tenant_id).await.unwrap();
    assert_eq!(plans.len(), 3);
}
