//! Employee repository: directory records and the persisted reporting hierarchy.

use chrono::Utc;
use hrm_core::directory::{
    DirectoryError, Employee, EmployeeStatus, EmploymentType, Gender, MaritalStatus, NewEmployee,
    SalaryBreakdown, Subscription,
};
use hrm_core::org::{OrgChart, OrgError, OrgNode};
use hrm_shared::AppError;
use hrm_shared::types::{DepartmentId, EmployeeId, PageRequest, PageResponse, TenantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::domain_into_app;
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::{departments, employees, tenants};

/// Error types for employee operations.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    /// Employee code already used in this tenant.
    #[error("Employee code '{0}' already exists")]
    DuplicateCode(String),

    /// Owning tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// Department is not part of the tenant.
    #[error("Department not found: {0}")]
    DepartmentNotFound(DepartmentId),

    /// Employee not found.
    #[error("Employee not found: {0}")]
    NotFound(EmployeeId),

    /// Input or stored data failed validation.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Hierarchy rule violated.
    #[error(transparent)]
    Org(#[from] OrgError),

    /// Stored row could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] CorruptRow),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EmployeeError> for AppError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            EmployeeError::TenantNotFound(_)
            | EmployeeError::DepartmentNotFound(_)
            | EmployeeError::NotFound(_) => Self::NotFound(err.to_string()),
            EmployeeError::Directory(e) => domain_into_app!(e),
            EmployeeError::Org(e) => domain_into_app!(e),
            EmployeeError::Corrupt(e) => Self::Internal(e.to_string()),
            EmployeeError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Employee repository.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and inserts an employee.
    ///
    /// Checks the tenant's subscription cap, the department, and the manager
    /// reference against the tenant's current org chart before writing.
    ///
    /// # Errors
    ///
    /// - `TenantNotFound` / `DepartmentNotFound` for unknown references
    /// - `Directory` for invalid input or an exhausted subscription
    /// - `Org` for an unknown manager
    /// - `DuplicateCode` if the employee code is taken
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: NewEmployee,
    ) -> Result<Employee, EmployeeError> {
        let now = Utc::now();
        let subscription = self.subscription(tenant_id).await?;
        let headcount = employees::Entity::find()
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
            .count(&self.db)
            .await?;
        subscription.check_employee_capacity(headcount, now)?;

        let department_known = departments::Entity::find_by_id(input.department_id.into_inner())
            .filter(departments::Column::TenantId.eq(tenant_id.into_inner()))
            .count(&self.db)
            .await?
            > 0;
        if !department_known {
            return Err(EmployeeError::DepartmentNotFound(input.department_id));
        }

        let employee = Employee::create(tenant_id, input, now)?;
        let mut chart = self.load_chart(tenant_id).await?;
        chart.create(OrgNode::from(&employee))?;

        to_active_model(&employee)?
            .insert(&self.db)
            .await
            .map_err(|e| {
                if codec::is_unique_violation(&e) {
                    EmployeeError::DuplicateCode(employee.employee_code.clone())
                } else {
                    EmployeeError::Database(e)
                }
            })?;

        tracing::info!(
            tenant_id = %tenant_id,
            employee_id = %employee.id,
            code = %employee.employee_code,
            "employee created"
        );
        Ok(employee)
    }

    /// Finds an employee by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeError> {
        employees::Entity::find_by_id(id.into_inner())
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Fetches an employee, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such employee in the tenant.
    pub async fn get(&self, tenant_id: TenantId, id: EmployeeId) -> Result<Employee, EmployeeError> {
        self.find(tenant_id, id)
            .await?
            .ok_or(EmployeeError::NotFound(id))
    }

    /// Finds an employee by HR code within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find_by_code(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> Result<Option<Employee>, EmployeeError> {
        employees::Entity::find()
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(employees::Column::EmployeeCode.eq(code.trim().to_uppercase()))
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Lists employees ordered by code, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<PageResponse<Employee>, EmployeeError> {
        let page = page.normalized();
        let query = employees::Entity::find()
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()));

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_asc(employees::Column::EmployeeCode)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Builds the tenant's org chart from stored employees.
    ///
    /// Rows are replayed in creation order so sibling order is stable.
    ///
    /// # Errors
    ///
    /// Returns `Org` if the stored hierarchy is broken (dangling manager or loop).
    pub async fn load_chart(&self, tenant_id: TenantId) -> Result<OrgChart, EmployeeError> {
        let rows = employees::Entity::find()
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(employees::Column::CreatedAt)
            .order_by_asc(employees::Column::EmployeeCode)
            .all(&self.db)
            .await?;

        let nodes = rows.into_iter().map(|row| OrgNode {
            id: EmployeeId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            name: format!("{} {}", row.first_name, row.last_name),
            designation: row.designation,
            manager_id: row.reporting_manager_id.map(EmployeeId::from_uuid),
        });
        Ok(OrgChart::from_nodes(tenant_id, nodes)?)
    }

    /// Moves an employee under a new manager, or to the top when `None`.
    ///
    /// # Errors
    ///
    /// Returns `Org` with `EmployeeNotFound`, `InvalidReference` or `CycleDetected`.
    pub async fn reassign(
        &self,
        tenant_id: TenantId,
        id: EmployeeId,
        manager_id: Option<EmployeeId>,
    ) -> Result<Employee, EmployeeError> {
        let mut chart = self.load_chart(tenant_id).await?;
        chart.reassign(id, manager_id)?;

        let model = employees::Entity::find_by_id(id.into_inner())
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(EmployeeError::NotFound(id))?;

        let mut active: employees::ActiveModel = model.into();
        active.reporting_manager_id = Set(manager_id.map(EmployeeId::into_inner));
        active.updated_at = Set(codec::stamp(Utc::now()));
        let updated = active.update(&self.db).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            employee_id = %id,
            manager_id = ?manager_id,
            "reporting manager changed"
        );
        decode(updated)
    }

    /// Everyone who transitively reports to the employee, breadth-first.
    ///
    /// # Errors
    ///
    /// Returns `Org(EmployeeNotFound)` for an unknown employee.
    pub async fn subtree(
        &self,
        tenant_id: TenantId,
        id: EmployeeId,
    ) -> Result<Vec<OrgNode>, EmployeeError> {
        let chart = self.load_chart(tenant_id).await?;
        Ok(chart.subtree(id)?.cloned().collect())
    }

    /// The employee's managers, nearest first.
    ///
    /// # Errors
    ///
    /// Returns `Org(EmployeeNotFound)` for an unknown employee.
    pub async fn chain(
        &self,
        tenant_id: TenantId,
        id: EmployeeId,
    ) -> Result<Vec<OrgNode>, EmployeeError> {
        let chart = self.load_chart(tenant_id).await?;
        Ok(chart.chain(id)?.cloned().collect())
    }

    async fn subscription(&self, tenant_id: TenantId) -> Result<Subscription, EmployeeError> {
        let tenant = tenants::Entity::find_by_id(tenant_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EmployeeError::TenantNotFound(tenant_id))?;
        let row = RowDecoder::new("tenants", tenant.id);
        Ok(row.json("subscription", tenant.subscription)?)
    }
}

fn to_active_model(employee: &Employee) -> Result<employees::ActiveModel, DbErr> {
    Ok(employees::ActiveModel {
        id: Set(employee.id.into_inner()),
        tenant_id: Set(employee.tenant_id.into_inner()),
        employee_code: Set(employee.employee_code.clone()),
        first_name: Set(employee.first_name.clone()),
        last_name: Set(employee.last_name.clone()),
        email: Set(employee.email.clone()),
        phone: Set(employee.phone.clone()),
        date_of_birth: Set(employee.date_of_birth),
        gender: Set(employee.gender.map(|g| g.as_str().to_string())),
        marital_status: Set(employee.marital_status.map(|m| m.as_str().to_string())),
        department_id: Set(employee.department_id.into_inner()),
        designation: Set(employee.designation.clone()),
        employment_type: Set(employee.employment_type.as_str().to_string()),
        joining_date: Set(employee.joining_date),
        status: Set(employee.status.as_str().to_string()),
        reporting_manager_id: Set(employee.reporting_manager_id.map(EmployeeId::into_inner)),
        salary: Set(codec::to_json(&employee.salary)?),
        address: Set(codec::to_json(&employee.address)?),
        created_at: Set(codec::stamp(employee.created_at)),
        updated_at: Set(codec::stamp(employee.updated_at)),
    })
}

fn decode(model: employees::Model) -> Result<Employee, EmployeeError> {
    let row = RowDecoder::new("employees", model.id);
    let salary: SalaryBreakdown = row.json("salary", model.salary)?;
    salary.validate()?;

    Ok(Employee {
        id: EmployeeId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        employee_code: model.employee_code,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        date_of_birth: model.date_of_birth,
        gender: model
            .gender
            .map(|g| row.parse("gender", &g, Gender::parse))
            .transpose()?,
        marital_status: model
            .marital_status
            .map(|m| row.parse("marital_status", &m, MaritalStatus::parse))
            .transpose()?,
        department_id: DepartmentId::from_uuid(model.department_id),
        designation: model.designation,
        employment_type: row.parse(
            "employment_type",
            &model.employment_type,
            EmploymentType::parse,
        )?,
        joining_date: model.joining_date,
        status: row.parse("status", &model.status, EmployeeStatus::parse)?,
        reporting_manager_id: model.reporting_manager_id.map(EmployeeId::from_uuid),
        salary,
        address: row.json("address", model.address)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
