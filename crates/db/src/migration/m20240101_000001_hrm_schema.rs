//! Initial HR schema.
//!
//! Built with the schema builder rather than raw SQL so the same migration
//! runs on Postgres and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    Slug,
    Domain,
    Settings,
    Subscription,
    IsActive,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    TenantId,
    Name,
    Code,
    Description,
    Status,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    TenantId,
    EmployeeCode,
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    MaritalStatus,
    DepartmentId,
    Designation,
    EmploymentType,
    JoiningDate,
    Status,
    ReportingManagerId,
    Salary,
    Address,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    TenantId,
    Email,
    PasswordHash,
    FullName,
    Role,
    Permissions,
    IsActive,
}

#[derive(DeriveIden)]
enum BenefitPlans {
    Table,
    Id,
    TenantId,
    Name,
    BenefitType,
    Provider,
    Coverage,
    IsActive,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    TenantId,
    EmployeeId,
    PlanId,
    EffectiveFrom,
    Status,
}

#[derive(DeriveIden)]
enum ExpenseReports {
    Table,
    Id,
    TenantId,
    EmployeeId,
    Title,
    Currency,
    TotalMinor,
    Status,
}

#[derive(DeriveIden)]
enum ExpenseItems {
    Table,
    Id,
    TenantId,
    ReportId,
    Category,
    Description,
    AmountMinor,
    IncurredOn,
    Status,
}

#[derive(DeriveIden)]
enum OnboardingCases {
    Table,
    Id,
    TenantId,
    EmployeeId,
    Position,
    StartDate,
    BuddyId,
    Progress,
    Status,
}

#[derive(DeriveIden)]
enum OffboardingCases {
    Table,
    Id,
    TenantId,
    EmployeeId,
    Position,
    LastWorkingDay,
    Reason,
    Clearance,
    Progress,
    Status,
}

#[derive(DeriveIden)]
enum Timesheets {
    Table,
    Id,
    TenantId,
    EmployeeId,
    Project,
    WeekStart,
    Hours,
    TotalHours,
    Status,
}

#[derive(DeriveIden)]
enum Timestamps {
    CreatedAt,
    UpdatedAt,
}

fn id() -> ColumnDef {
    ColumnDef::new(Alias::new("id")).uuid().not_null().primary_key().take()
}

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Timestamps::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Timestamps::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
}

fn tenant_fk(from: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from_col(Alias::new("tenant_id"))
        .to(Tenants::Table, Tenants::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .from_tbl(from)
        .to_owned()
}

fn employee_fk(
    from: impl IntoIden + 'static,
    col: impl IntoIden + 'static,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .from_tbl(from)
        .from_col(col)
        .to(Employees::Table, Employees::Id)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // DIRECTORY
        // ============================================================
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(Tenants::Name).string().not_null())
                        .col(ColumnDef::new(Tenants::Slug).string().not_null())
                        .col(ColumnDef::new(Tenants::Domain).string())
                        .col(ColumnDef::new(Tenants::Settings).json_binary().not_null())
                        .col(ColumnDef::new(Tenants::Subscription).json_binary().not_null())
                        .col(ColumnDef::new(Tenants::IsActive).boolean().not_null()),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_tenants_slug")
                    .table(Tenants::Table)
                    .col(Tenants::Slug)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(Departments::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Departments::Name).string().not_null())
                        .col(ColumnDef::new(Departments::Code).string().not_null())
                        .col(ColumnDef::new(Departments::Description).text())
                        .col(ColumnDef::new(Departments::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(Departments::Table)),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_departments_tenant_code")
                    .table(Departments::Table)
                    .col(Departments::TenantId)
                    .col(Departments::Code)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(Employees::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Employees::EmployeeCode).string().not_null())
                        .col(ColumnDef::new(Employees::FirstName).string().not_null())
                        .col(ColumnDef::new(Employees::LastName).string().not_null())
                        .col(ColumnDef::new(Employees::Email).string().not_null())
                        .col(ColumnDef::new(Employees::Phone).string())
                        .col(ColumnDef::new(Employees::DateOfBirth).date())
                        .col(ColumnDef::new(Employees::Gender).string())
                        .col(ColumnDef::new(Employees::MaritalStatus).string())
                        .col(ColumnDef::new(Employees::DepartmentId).uuid().not_null())
                        .col(ColumnDef::new(Employees::Designation).string().not_null())
                        .col(ColumnDef::new(Employees::EmploymentType).string().not_null())
                        .col(ColumnDef::new(Employees::JoiningDate).date().not_null())
                        .col(ColumnDef::new(Employees::Status).string().not_null())
                        .col(ColumnDef::new(Employees::ReportingManagerId).uuid())
                        .col(ColumnDef::new(Employees::Salary).json_binary().not_null())
                        .col(ColumnDef::new(Employees::Address).json_binary().not_null())
                        .foreign_key(&mut tenant_fk(Employees::Table))
                        .foreign_key(
                            ForeignKey::create()
                                .from(Employees::Table, Employees::DepartmentId)
                                .to(Departments::Table, Departments::Id),
                        )
                        .foreign_key(&mut employee_fk(
                            Employees::Table,
                            Employees::ReportingManagerId,
                        )),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_employees_tenant_code")
                    .table(Employees::Table)
                    .col(Employees::TenantId)
                    .col(Employees::EmployeeCode)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_employees_manager")
                    .table(Employees::Table)
                    .col(Employees::TenantId)
                    .col(Employees::ReportingManagerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(Users::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FullName).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(ColumnDef::new(Users::Permissions).json_binary().not_null())
                        .col(ColumnDef::new(Users::IsActive).boolean().not_null())
                        .foreign_key(&mut tenant_fk(Users::Table)),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_users_tenant_email")
                    .table(Users::Table)
                    .col(Users::TenantId)
                    .col(Users::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // BENEFITS
        // ============================================================
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(BenefitPlans::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(BenefitPlans::TenantId).uuid().not_null())
                        .col(ColumnDef::new(BenefitPlans::Name).string().not_null())
                        .col(ColumnDef::new(BenefitPlans::BenefitType).string().not_null())
                        .col(ColumnDef::new(BenefitPlans::Provider).string().not_null())
                        .col(ColumnDef::new(BenefitPlans::Coverage).json_binary().not_null())
                        .col(ColumnDef::new(BenefitPlans::IsActive).boolean().not_null())
                        .foreign_key(&mut tenant_fk(BenefitPlans::Table)),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_benefit_plans_tenant_name")
                    .table(BenefitPlans::Table)
                    .col(BenefitPlans::TenantId)
                    .col(BenefitPlans::Name)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Enrollments::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(Enrollments::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Enrollments::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(Enrollments::PlanId).uuid().not_null())
                        .col(ColumnDef::new(Enrollments::EffectiveFrom).date().not_null())
                        .col(ColumnDef::new(Enrollments::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(Enrollments::Table))
                        .foreign_key(&mut employee_fk(
                            Enrollments::Table,
                            Enrollments::EmployeeId,
                        ))
                        .foreign_key(
                            ForeignKey::create()
                                .from(Enrollments::Table, Enrollments::PlanId)
                                .to(BenefitPlans::Table, BenefitPlans::Id),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_enrollments_employee_plan")
                    .table(Enrollments::Table)
                    .col(Enrollments::TenantId)
                    .col(Enrollments::EmployeeId)
                    .col(Enrollments::PlanId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // EXPENSES
        // ============================================================
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(ExpenseReports::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(ExpenseReports::TenantId).uuid().not_null())
                        .col(ColumnDef::new(ExpenseReports::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(ExpenseReports::Title).string().not_null())
                        .col(ColumnDef::new(ExpenseReports::Currency).string_len(3).not_null())
                        .col(ColumnDef::new(ExpenseReports::TotalMinor).big_integer().not_null())
                        .col(ColumnDef::new(ExpenseReports::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(ExpenseReports::Table))
                        .foreign_key(&mut employee_fk(
                            ExpenseReports::Table,
                            ExpenseReports::EmployeeId,
                        )),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(ExpenseItems::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(ExpenseItems::TenantId).uuid().not_null())
                        .col(ColumnDef::new(ExpenseItems::ReportId).uuid().not_null())
                        .col(ColumnDef::new(ExpenseItems::Category).string().not_null())
                        .col(ColumnDef::new(ExpenseItems::Description).text().not_null())
                        .col(ColumnDef::new(ExpenseItems::AmountMinor).big_integer().not_null())
                        .col(ColumnDef::new(ExpenseItems::IncurredOn).date().not_null())
                        .col(ColumnDef::new(ExpenseItems::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(ExpenseItems::Table))
                        .foreign_key(
                            ForeignKey::create()
                                .from(ExpenseItems::Table, ExpenseItems::ReportId)
                                .to(ExpenseReports::Table, ExpenseReports::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_expense_items_report")
                    .table(ExpenseItems::Table)
                    .col(ExpenseItems::ReportId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // ONBOARDING / OFFBOARDING
        // ============================================================
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(OnboardingCases::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(OnboardingCases::TenantId).uuid().not_null())
                        .col(ColumnDef::new(OnboardingCases::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(OnboardingCases::Position).string().not_null())
                        .col(ColumnDef::new(OnboardingCases::StartDate).date().not_null())
                        .col(ColumnDef::new(OnboardingCases::BuddyId).uuid())
                        .col(ColumnDef::new(OnboardingCases::Progress).small_integer().not_null())
                        .col(ColumnDef::new(OnboardingCases::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(OnboardingCases::Table))
                        .foreign_key(&mut employee_fk(
                            OnboardingCases::Table,
                            OnboardingCases::EmployeeId,
                        )),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_onboarding_employee")
                    .table(OnboardingCases::Table)
                    .col(OnboardingCases::TenantId)
                    .col(OnboardingCases::EmployeeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(OffboardingCases::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(OffboardingCases::TenantId).uuid().not_null())
                        .col(ColumnDef::new(OffboardingCases::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(OffboardingCases::Position).string().not_null())
                        .col(ColumnDef::new(OffboardingCases::LastWorkingDay).date().not_null())
                        .col(ColumnDef::new(OffboardingCases::Reason).string().not_null())
                        .col(ColumnDef::new(OffboardingCases::Clearance).json_binary().not_null())
                        .col(ColumnDef::new(OffboardingCases::Progress).small_integer().not_null())
                        .col(ColumnDef::new(OffboardingCases::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(OffboardingCases::Table))
                        .foreign_key(&mut employee_fk(
                            OffboardingCases::Table,
                            OffboardingCases::EmployeeId,
                        )),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_offboarding_employee")
                    .table(OffboardingCases::Table)
                    .col(OffboardingCases::TenantId)
                    .col(OffboardingCases::EmployeeId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // TIMESHEETS
        // ============================================================
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Timesheets::Table)
                        .if_not_exists()
                        .col(id())
                        .col(ColumnDef::new(Timesheets::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Timesheets::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(Timesheets::Project).string().not_null())
                        .col(ColumnDef::new(Timesheets::WeekStart).date().not_null())
                        .col(ColumnDef::new(Timesheets::Hours).json_binary().not_null())
                        .col(ColumnDef::new(Timesheets::TotalHours).string().not_null())
                        .col(ColumnDef::new(Timesheets::Status).string().not_null())
                        .foreign_key(&mut tenant_fk(Timesheets::Table))
                        .foreign_key(&mut employee_fk(
                            Timesheets::Table,
                            Timesheets::EmployeeId,
                        )),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ux_timesheets_week")
                    .table(Timesheets::Table)
                    .col(Timesheets::TenantId)
                    .col(Timesheets::EmployeeId)
                    .col(Timesheets::Project)
                    .col(Timesheets::WeekStart)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Timesheets::Table.into_iden(),
            OffboardingCases::Table.into_iden(),
            OnboardingCases::Table.into_iden(),
            ExpenseItems::Table.into_iden(),
            ExpenseReports::Table.into_iden(),
            Enrollments::Table.into_iden(),
            BenefitPlans::Table.into_iden(),
            Users::Table.into_iden(),
            Employees::Table.into_iden(),
            Departments::Table.into_iden(),
            Tenants::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
