//! Sample organization seed: one tenant, five departments, a ten-person
//! hierarchy and a handful of workflow records.
//!
//! Inserts run in dependency order (departments before employees, managers
//! before their reports). Existing records are looked up by natural key and
//! skipped, so the seed can be re-run safely.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc, Weekday};
use hrm_core::directory::{
    Address, Gender, MaritalStatus, NewDepartment, NewEmployee, NewTenant, SalaryComponents,
    EmploymentType, Subscription, SubscriptionPlan, Tenant, TenantSettings,
};
use hrm_core::org::OrgChart;
use hrm_core::workflow::{
    BenefitType, Coverage, ExpenseCategory, NewBenefitPlan, NewEnrollment, NewExpenseItem,
    NewExpenseReport, NewOffboardingCase, NewOnboardingCase, NewTimesheet, SeparationReason,
};
use hrm_shared::types::{BenefitPlanId, Currency, DepartmentId, EmployeeId, TenantId};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use super::{ProvisionError, Tally};
use crate::entities::expense_reports;
use crate::repositories::{
    BenefitError, BenefitRepository, DepartmentRepository, EmployeeError, EmployeeRepository,
    ExpenseRepository, OffboardingRepository, OnboardingError, OnboardingRepository,
    TenantError, TenantRepository, TimesheetError, TimesheetRepository,
};

/// Slug of the sample tenant.
pub const SAMPLE_TENANT_SLUG: &str = "techcorp";

/// Result of a seed run.
#[derive(Debug, Clone)]
pub struct SeedSummary {
    /// The sample tenant.
    pub tenant_id: TenantId,
    /// Tenant row.
    pub tenants: Tally,
    /// Department rows.
    pub departments: Tally,
    /// Employee rows.
    pub employees: Tally,
    /// Benefit, expense, case and timesheet rows.
    pub workflow: Tally,
    /// The tenant's hierarchy after seeding.
    pub chart: OrgChart,
}

struct SampleDepartment {
    name: &'static str,
    code: &'static str,
    description: &'static str,
}

#[rustfmt::skip]
const DEPARTMENTS: [SampleDepartment; 5] = [
    SampleDepartment { name: "Executive", code: "EXEC", description: "Leadership team" },
    SampleDepartment { name: "Engineering", code: "ENG", description: "Product development" },
    SampleDepartment { name: "Human Resources", code: "HR", description: "People operations" },
    SampleDepartment { name: "Finance", code: "FIN", description: "Accounts and payroll" },
    SampleDepartment { name: "Sales & Marketing", code: "SALES", description: "Revenue and brand" },
];

struct SampleEmployee {
    code: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    gender: Gender,
    designation: &'static str,
    department: &'static str,
    manager: Option<&'static str>,
    joined: (i32, u32, u32),
    born: (i32, u32, u32),
    city: &'static str,
    /// basic, hra, allowances, deductions (whole rupees).
    salary: [i64; 4],
}

// Managers are listed before their reports.
#[rustfmt::skip]
const EMPLOYEES: [SampleEmployee; 10] = [
    SampleEmployee { code: "EMP001", first_name: "Rajesh", last_name: "Kumar", gender: Gender::Male, designation: "CEO", department: "EXEC", manager: None, joined: (2015, 4, 1), born: (1975, 8, 12), city: "Mumbai", salary: [400_000, 160_000, 90_000, 110_000] },
    SampleEmployee { code: "EMP002", first_name: "Priya", last_name: "Sharma", gender: Gender::Female, designation: "CTO", department: "ENG", manager: Some("EMP001"), joined: (2016, 7, 1), born: (1980, 2, 24), city: "Bengaluru", salary: [300_000, 120_000, 70_000, 85_000] },
    SampleEmployee { code: "EMP003", first_name: "Vikram", last_name: "Singh", gender: Gender::Male, designation: "CFO", department: "FIN", manager: Some("EMP001"), joined: (2016, 9, 15), born: (1978, 11, 3), city: "Mumbai", salary: [280_000, 112_000, 60_000, 80_000] },
    SampleEmployee { code: "EMP004", first_name: "Anita", last_name: "Desai", gender: Gender::Female, designation: "HR Director", department: "HR", manager: Some("EMP001"), joined: (2017, 1, 10), born: (1982, 5, 19), city: "Pune", salary: [200_000, 80_000, 40_000, 55_000] },
    SampleEmployee { code: "EMP005", first_name: "Karthik", last_name: "Iyer", gender: Gender::Male, designation: "Engineering Manager", department: "ENG", manager: Some("EMP002"), joined: (2018, 3, 5), born: (1985, 9, 30), city: "Chennai", salary: [180_000, 72_000, 35_000, 48_000] },
    SampleEmployee { code: "EMP006", first_name: "Arjun", last_name: "Menon", gender: Gender::Male, designation: "Senior Software Engineer", department: "ENG", manager: Some("EMP005"), joined: (2021, 6, 1), born: (1992, 3, 14), city: "Bengaluru", salary: [80_000, 32_000, 15_000, 12_000] },
    SampleEmployee { code: "EMP007", first_name: "Sneha", last_name: "Reddy", gender: Gender::Female, designation: "Software Engineer", department: "ENG", manager: Some("EMP005"), joined: (2024, 1, 15), born: (1998, 7, 22), city: "Hyderabad", salary: [60_000, 24_000, 10_000, 8_000] },
    SampleEmployee { code: "EMP008", first_name: "Rahul", last_name: "Verma", gender: Gender::Male, designation: "Sales Manager", department: "SALES", manager: Some("EMP001"), joined: (2019, 8, 19), born: (1987, 12, 5), city: "Delhi", salary: [120_000, 48_000, 30_000, 30_000] },
    SampleEmployee { code: "EMP009", first_name: "Meera", last_name: "Nair", gender: Gender::Female, designation: "HR Executive", department: "HR", manager: Some("EMP004"), joined: (2022, 2, 1), born: (1995, 4, 8), city: "Kochi", salary: [50_000, 20_000, 8_000, 6_500] },
    SampleEmployee { code: "EMP010", first_name: "Deepak", last_name: "Joshi", gender: Gender::Male, designation: "Accountant", department: "FIN", manager: Some("EMP003"), joined: (2020, 10, 12), born: (1990, 1, 27), city: "Mumbai", salary: [55_000, 22_000, 9_000, 7_000] },
];

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, ProvisionError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ProvisionError::InvalidSample(format!("date {year}-{month}-{day}")))
}

fn rupees(whole: i64) -> Decimal {
    Decimal::from(whole)
}

/// Seeds the TechCorp sample organization.
///
/// # Errors
///
/// Returns a `ProvisionError` if any step fails for a reason other than the
/// record already existing.
pub async fn seed_sample_org(db: &DatabaseConnection) -> Result<SeedSummary, ProvisionError> {
    let mut tenants = Tally::default();
    let (tenant, created) = ensure_tenant(db).await?;
    tenants.record(created);
    let tenant_id = tenant.id;

    let departments = DepartmentRepository::new(db.clone());
    let mut department_tally = Tally::default();
    let mut department_ids: HashMap<&str, DepartmentId> = HashMap::new();
    for sample in &DEPARTMENTS {
        let department = match departments.find_by_code(tenant_id, sample.code).await? {
            Some(existing) => {
                department_tally.record(false);
                existing
            }
            None => {
                let input = NewDepartment {
                    name: sample.name.to_string(),
                    code: sample.code.to_string(),
                    description: Some(sample.description.to_string()),
                };
                department_tally.record(true);
                departments.create(tenant_id, input).await?
            }
        };
        department_ids.insert(sample.code, department.id);
    }
    tracing::info!(?department_tally, "departments seeded");

    let employees = EmployeeRepository::new(db.clone());
    let mut employee_tally = Tally::default();
    let mut employee_ids: HashMap<&str, EmployeeId> = HashMap::new();
    for sample in &EMPLOYEES {
        let id = if let Some(existing) = employees.find_by_code(tenant_id, sample.code).await? {
            employee_tally.record(false);
            existing.id
        } else {
            let input = new_employee(sample, &department_ids, &employee_ids)?;
            match employees.create(tenant_id, input).await {
                Ok(employee) => {
                    employee_tally.record(true);
                    employee.id
                }
                Err(EmployeeError::DuplicateCode(code)) => {
                    employee_tally.record(false);
                    employees
                        .find_by_code(tenant_id, &code)
                        .await?
                        .ok_or(ProvisionError::DuplicateKey(code))?
                        .id
                }
                Err(e) => return Err(e.into()),
            }
        };
        employee_ids.insert(sample.code, id);
    }
    tracing::info!(?employee_tally, "employees seeded");

    let workflow = seed_workflow(db, tenant_id, &employee_ids).await?;
    let chart = employees.load_chart(tenant_id).await?;

    Ok(SeedSummary {
        tenant_id,
        tenants,
        departments: department_tally,
        employees: employee_tally,
        workflow,
        chart,
    })
}

async fn ensure_tenant(db: &DatabaseConnection) -> Result<(Tenant, bool), ProvisionError> {
    let repo = TenantRepository::new(db.clone());
    if let Some(tenant) = repo.find_by_slug(SAMPLE_TENANT_SLUG).await? {
        tracing::info!(slug = SAMPLE_TENANT_SLUG, "sample tenant already exists, skipping");
        return Ok((tenant, false));
    }

    let input = NewTenant {
        name: "TechCorp Solutions".to_string(),
        slug: SAMPLE_TENANT_SLUG.to_string(),
        domain: Some("techcorp.in".to_string()),
        settings: TenantSettings {
            timezone: "Asia/Kolkata".to_string(),
            currency: Currency::Inr,
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            working_hours_per_day: 9,
        },
        subscription: Subscription {
            plan: SubscriptionPlan::Enterprise,
            max_employees: 500,
            features: SubscriptionPlan::Enterprise.default_features(),
            expires_at: Utc::now() + Duration::days(365),
        },
    };

    match repo.create(input).await {
        Ok(tenant) => Ok((tenant, true)),
        Err(TenantError::DuplicateSlug(slug)) => repo
            .find_by_slug(&slug)
            .await?
            .map(|t| (t, false))
            .ok_or(ProvisionError::DuplicateKey(slug)),
        Err(e) => Err(e.into()),
    }
}

fn new_employee(
    sample: &SampleEmployee,
    departments: &HashMap<&str, DepartmentId>,
    employees: &HashMap<&str, EmployeeId>,
) -> Result<NewEmployee, ProvisionError> {
    let department_id = *departments
        .get(sample.department)
        .ok_or_else(|| ProvisionError::InvalidSample(format!("department {}", sample.department)))?;
    let reporting_manager_id = sample
        .manager
        .map(|code| {
            employees
                .get(code)
                .copied()
                .ok_or_else(|| ProvisionError::InvalidSample(format!("manager {code}")))
        })
        .transpose()?;
    let [basic, hra, allowances, deductions] = sample.salary;

    Ok(NewEmployee {
        employee_code: sample.code.to_string(),
        first_name: sample.first_name.to_string(),
        last_name: sample.last_name.to_string(),
        email: format!(
            "{}.{}@techcorp.in",
            sample.first_name.to_lowercase(),
            sample.last_name.to_lowercase()
        ),
        phone: None,
        date_of_birth: Some(date(sample.born)?),
        gender: Some(sample.gender),
        marital_status: Some(MaritalStatus::Single),
        department_id,
        designation: sample.designation.to_string(),
        employment_type: EmploymentType::FullTime,
        joining_date: date(sample.joined)?,
        reporting_manager_id,
        salary: SalaryComponents {
            basic: rupees(basic),
            hra: rupees(hra),
            allowances: rupees(allowances),
            deductions: rupees(deductions),
        },
        address: Address {
            city: sample.city.to_string(),
            country: "India".to_string(),
            ..Address::default()
        },
    })
}

async fn seed_workflow(
    db: &DatabaseConnection,
    tenant_id: TenantId,
    ids: &HashMap<&str, EmployeeId>,
) -> Result<Tally, ProvisionError> {
    let employee = |code: &str| {
        ids.get(code)
            .copied()
            .ok_or_else(|| ProvisionError::InvalidSample(format!("employee {code}")))
    };
    let arjun = employee("EMP006")?;
    let sneha = employee("EMP007")?;
    let deepak = employee("EMP010")?;
    let mut tally = Tally::default();

    // Benefits
    let benefits = BenefitRepository::new(db.clone());
    let health = ensure_plan(
        &benefits,
        tenant_id,
        NewBenefitPlan {
            name: "Family Health Cover".to_string(),
            benefit_type: BenefitType::Health,
            provider: "Star Health".to_string(),
            coverage: Coverage::Insurance {
                coverage_amount: rupees(500_000),
                monthly_premium: rupees(1_200),
            },
        },
        &mut tally,
    )
    .await?;
    ensure_plan(
        &benefits,
        tenant_id,
        NewBenefitPlan {
            name: "Provident Fund Match".to_string(),
            benefit_type: BenefitType::Retirement,
            provider: "EPFO".to_string(),
            coverage: Coverage::EmployerMatch {
                match_percent: rupees(12),
            },
        },
        &mut tally,
    )
    .await?;

    let enrollment = NewEnrollment {
        employee_id: arjun,
        plan_id: health,
        effective_from: date((2024, 1, 1))?,
    };
    match benefits.enroll(tenant_id, enrollment).await {
        Ok(_) => tally.record(true),
        Err(BenefitError::AlreadyEnrolled { .. }) => tally.record(false),
        Err(e) => return Err(e.into()),
    }

    // Expenses
    let title = "Client visit Bengaluru";
    let filed = expense_reports::Entity::find()
        .filter(expense_reports::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(expense_reports::Column::EmployeeId.eq(arjun.into_inner()))
        .filter(expense_reports::Column::Title.eq(title))
        .count(db)
        .await?
        > 0;
    if filed {
        tally.record(false);
    } else {
        let report = NewExpenseReport {
            employee_id: arjun,
            title: title.to_string(),
            currency: Currency::Inr,
            items: vec![
                NewExpenseItem {
                    category: ExpenseCategory::Travel,
                    description: "Flight Mumbai to Bengaluru".to_string(),
                    amount: Decimal::new(450_000, 2),
                    incurred_on: date((2024, 2, 5))?,
                },
                NewExpenseItem {
                    category: ExpenseCategory::Accommodation,
                    description: "Hotel, two nights".to_string(),
                    amount: Decimal::new(600_000, 2),
                    incurred_on: date((2024, 2, 6))?,
                },
                NewExpenseItem {
                    category: ExpenseCategory::Meals,
                    description: "Client dinner".to_string(),
                    amount: Decimal::new(125_050, 2),
                    incurred_on: date((2024, 2, 6))?,
                },
            ],
        };
        ExpenseRepository::new(db.clone())
            .submit(tenant_id, report)
            .await?;
        tally.record(true);
    }

    // Onboarding and offboarding
    let onboarding = NewOnboardingCase {
        employee_id: sneha,
        position: "Software Engineer".to_string(),
        start_date: date((2024, 1, 15))?,
        buddy_id: Some(arjun),
    };
    match OnboardingRepository::new(db.clone()).open(tenant_id, onboarding).await {
        Ok(_) => tally.record(true),
        Err(OnboardingError::DuplicateCase(_)) => tally.record(false),
        Err(e) => return Err(e.into()),
    }

    let offboarding = NewOffboardingCase {
        employee_id: deepak,
        position: "Accountant".to_string(),
        last_working_day: date((2024, 12, 31))?,
        reason: SeparationReason::Resignation,
        clearance: Vec::new(),
    };
    match OffboardingRepository::new(db.clone()).open(tenant_id, offboarding).await {
        Ok(_) => tally.record(true),
        Err(OnboardingError::DuplicateCase(_)) => tally.record(false),
        Err(e) => return Err(e.into()),
    }

    // Timesheets
    let timesheets = TimesheetRepository::new(db.clone());
    let week = date((2024, 1, 8))?;
    for (employee_id, project, hours) in [
        (arjun, "Project Alpha", [8, 8, 7, 8, 6, 0, 0]),
        (sneha, "Project Beta", [8, 8, 8, 8, 8, 0, 0]),
    ] {
        let input = NewTimesheet {
            employee_id,
            project: project.to_string(),
            week_start: week,
            hours: hours.map(Decimal::from),
        };
        match timesheets.create(tenant_id, input).await {
            Ok(_) => tally.record(true),
            Err(TimesheetError::DuplicateWeek { .. }) => tally.record(false),
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(?tally, "workflow records seeded");
    Ok(tally)
}

async fn ensure_plan(
    repo: &BenefitRepository,
    tenant_id: TenantId,
    input: NewBenefitPlan,
    tally: &mut Tally,
) -> Result<BenefitPlanId, ProvisionError> {
    if let Some(plan) = repo.find_plan_by_name(tenant_id, &input.name).await? {
        tally.record(false);
        return Ok(plan.id);
    }
    let plan = repo.create_plan(tenant_id, input).await?;
    tally.record(true);
    Ok(plan.id)
}
