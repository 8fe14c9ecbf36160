//! Timesheet repository.

use chrono::Utc;
use hrm_core::workflow::{
    LifecycleError, NewTimesheet, RecordError, Timesheet, TimesheetStatus, WeekHours, transition,
    weekly_total,
};
use hrm_shared::AppError;
use hrm_shared::types::{EmployeeId, TenantId, TimesheetId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{domain_into_app, employee_exists};
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::timesheets;

/// Error types for timesheet operations.
#[derive(Debug, thiserror::Error)]
pub enum TimesheetError {
    /// Timesheet not found.
    #[error("Timesheet not found: {0}")]
    NotFound(TimesheetId),

    /// Employee is not part of the tenant.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// The employee already logged this project for the week.
    #[error("Timesheet for '{project}' in week {week_start} already exists")]
    DuplicateWeek {
        /// Project name.
        project: String,
        /// Monday of the week.
        week_start: chrono::NaiveDate,
    },

    /// Stored total disagrees with the daily hours.
    #[error("Timesheet {id} total {stored} does not match daily sum {computed}")]
    TotalMismatch {
        /// Timesheet ID.
        id: TimesheetId,
        /// Stored total.
        stored: Decimal,
        /// Sum of daily hours.
        computed: Decimal,
    },

    /// Input failed validation.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Status change refused.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Stored row could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] CorruptRow),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TimesheetError> for AppError {
    fn from(err: TimesheetError) -> Self {
        match err {
            TimesheetError::NotFound(_) | TimesheetError::EmployeeNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            TimesheetError::DuplicateWeek { .. } => Self::Conflict(err.to_string()),
            TimesheetError::TotalMismatch { .. } => Self::Internal(err.to_string()),
            TimesheetError::Record(e) => domain_into_app!(e),
            TimesheetError::Lifecycle(e) => domain_into_app!(e),
            TimesheetError::Corrupt(e) => Self::Internal(e.to_string()),
            TimesheetError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Timesheet repository.
#[derive(Debug, Clone)]
pub struct TimesheetRepository {
    db: DatabaseConnection,
}

impl TimesheetRepository {
    /// Creates a new timesheet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a draft timesheet.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound`, `DuplicateWeek` or a validation error.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: NewTimesheet,
    ) -> Result<Timesheet, TimesheetError> {
        if !employee_exists(&self.db, tenant_id, input.employee_id).await? {
            return Err(TimesheetError::EmployeeNotFound(input.employee_id));
        }
        let sheet = Timesheet::create(tenant_id, input, Utc::now())?;

        timesheets::ActiveModel {
            id: Set(sheet.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(sheet.employee_id.into_inner()),
            project: Set(sheet.project.clone()),
            week_start: Set(sheet.week_start),
            hours: Set(codec::to_json(&sheet.hours)?),
            total_hours: Set(sheet.total_hours.to_string()),
            status: Set(sheet.status.as_str().to_string()),
            created_at: Set(codec::stamp(sheet.created_at)),
            updated_at: Set(codec::stamp(sheet.updated_at)),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if codec::is_unique_violation(&e) {
                TimesheetError::DuplicateWeek {
                    project: sheet.project.clone(),
                    week_start: sheet.week_start,
                }
            } else {
                TimesheetError::Database(e)
            }
        })?;

        tracing::info!(
            timesheet_id = %sheet.id,
            employee_id = %sheet.employee_id,
            total_hours = %sheet.total_hours,
            "timesheet recorded"
        );
        Ok(sheet)
    }

    /// Finds a timesheet, checking its stored total.
    ///
    /// # Errors
    ///
    /// Returns `TotalMismatch` if the stored total disagrees with the days.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: TimesheetId,
    ) -> Result<Option<Timesheet>, TimesheetError> {
        timesheets::Entity::find_by_id(id.into_inner())
            .filter(timesheets::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Lists timesheets by week, optionally for one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<Timesheet>, TimesheetError> {
        let mut query = timesheets::Entity::find()
            .filter(timesheets::Column::TenantId.eq(tenant_id.into_inner()));
        if let Some(employee_id) = employee_id {
            query = query.filter(timesheets::Column::EmployeeId.eq(employee_id.into_inner()));
        }
        query
            .order_by_asc(timesheets::Column::WeekStart)
            .order_by_asc(timesheets::Column::Project)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Moves a timesheet to a new status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Lifecycle(InvalidTransition)`.
    pub async fn transition(
        &self,
        tenant_id: TenantId,
        id: TimesheetId,
        next: TimesheetStatus,
    ) -> Result<Timesheet, TimesheetError> {
        let mut sheet = self
            .find(tenant_id, id)
            .await?
            .ok_or(TimesheetError::NotFound(id))?;
        transition(&mut sheet, next, Utc::now())?;

        timesheets::ActiveModel {
            id: Set(id.into_inner()),
            status: Set(sheet.status.as_str().to_string()),
            updated_at: Set(codec::stamp(sheet.updated_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        tracing::info!(timesheet_id = %id, status = %sheet.status, "timesheet status changed");
        Ok(sheet)
    }
}

fn decode(model: timesheets::Model) -> Result<Timesheet, TimesheetError> {
    let row = RowDecoder::new("timesheets", model.id);
    let id = TimesheetId::from_uuid(model.id);
    let hours: WeekHours = row.json("hours", model.hours)?;
    let total_hours = row.decimal("total_hours", &model.total_hours)?;

    let computed = weekly_total(&hours);
    if computed != total_hours {
        return Err(TimesheetError::TotalMismatch {
            id,
            stored: total_hours,
            computed,
        });
    }

    Ok(Timesheet {
        id,
        tenant_id: TenantId::from_uuid(model.tenant_id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        project: model.project,
        week_start: model.week_start,
        hours,
        total_hours,
        status: row.parse("status", &model.status, TimesheetStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
