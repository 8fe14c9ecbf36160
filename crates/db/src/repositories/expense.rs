//! Expense report repository.
//!
//! A report and its items are written together on submit; the stored
//! `total_minor` must always equal the sum of the items, and every read that
//! feeds a write re-checks it.

use chrono::Utc;
use hrm_core::workflow::{
    ExpenseCategory, ExpenseItem, ExpenseItemStatus, ExpenseReport, ExpenseReportStatus,
    LifecycleError, NewExpenseReport, RecordError, expense::total_of, transition,
};
use hrm_shared::AppError;
use hrm_shared::types::money::from_minor_units;
use hrm_shared::types::{EmployeeId, ExpenseItemId, ExpenseReportId, TenantId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::{domain_into_app, employee_exists};
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::{expense_items, expense_reports};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Report not found.
    #[error("Expense report not found: {0}")]
    NotFound(ExpenseReportId),

    /// Item not found.
    #[error("Expense item not found: {0}")]
    ItemNotFound(ExpenseItemId),

    /// Claimant is not an employee of the tenant.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// Stored total disagrees with the items.
    #[error("Expense report {report} total {stored} does not match item sum {computed}")]
    TotalMismatch {
        /// Report ID.
        report: ExpenseReportId,
        /// Stored total.
        stored: Decimal,
        /// Sum of the stored items.
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

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound(_)
            | ExpenseError::ItemNotFound(_)
            | ExpenseError::EmployeeNotFound(_) => Self::NotFound(err.to_string()),
            ExpenseError::TotalMismatch { .. } => Self::Internal(err.to_string()),
            ExpenseError::Record(e) => domain_into_app!(e),
            ExpenseError::Lifecycle(e) => domain_into_app!(e),
            ExpenseError::Corrupt(e) => Self::Internal(e.to_string()),
            ExpenseError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Files a report with its items.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` or a validation error.
    pub async fn submit(
        &self,
        tenant_id: TenantId,
        input: NewExpenseReport,
    ) -> Result<(ExpenseReport, Vec<ExpenseItem>), ExpenseError> {
        if !employee_exists(&self.db, tenant_id, input.employee_id).await? {
            return Err(ExpenseError::EmployeeNotFound(input.employee_id));
        }
        let (report, items) = ExpenseReport::submit(tenant_id, input, Utc::now())?;
        self.store(&report, &items).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            report_id = %report.id,
            items = items.len(),
            total = %report.total,
            "expense report submitted"
        );
        Ok((report, items))
    }

    /// Writes a validated report and its items in one transaction. Nothing
    /// is stored if any row fails to insert.
    ///
    /// # Errors
    ///
    /// Returns `TotalMismatch` if `report.total` is not the item sum, or a
    /// database error from any insert.
    pub async fn store(
        &self,
        report: &ExpenseReport,
        items: &[ExpenseItem],
    ) -> Result<(), ExpenseError> {
        let computed = total_of(items)?;
        if computed != report.total {
            return Err(ExpenseError::TotalMismatch {
                report: report.id,
                stored: report.total,
                computed,
            });
        }

        let txn = self.db.begin().await?;

        expense_reports::ActiveModel {
            id: Set(report.id.into_inner()),
            tenant_id: Set(report.tenant_id.into_inner()),
            employee_id: Set(report.employee_id.into_inner()),
            title: Set(report.title.clone()),
            currency: Set(report.currency.as_str().to_string()),
            total_minor: Set(codec::to_minor(report.total)?),
            status: Set(report.status.as_str().to_string()),
            created_at: Set(codec::stamp(report.created_at)),
            updated_at: Set(codec::stamp(report.updated_at)),
        }
        .insert(&txn)
        .await?;

        for item in items {
            expense_items::ActiveModel {
                id: Set(item.id.into_inner()),
                tenant_id: Set(item.tenant_id.into_inner()),
                report_id: Set(report.id.into_inner()),
                category: Set(item.category.as_str().to_string()),
                description: Set(item.description.clone()),
                amount_minor: Set(codec::to_minor(item.amount)?),
                incurred_on: Set(item.incurred_on),
                status: Set(item.status.as_str().to_string()),
                created_at: Set(codec::stamp(item.created_at)),
                updated_at: Set(codec::stamp(item.updated_at)),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Loads a report and its items, checking the stored total.
    ///
    /// # Errors
    ///
    /// Returns `TotalMismatch` if the stored total disagrees with the items.
    pub async fn find_with_items(
        &self,
        tenant_id: TenantId,
        id: ExpenseReportId,
    ) -> Result<Option<(ExpenseReport, Vec<ExpenseItem>)>, ExpenseError> {
        let Some(model) = expense_reports::Entity::find_by_id(id.into_inner())
            .filter(expense_reports::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let report = decode_report(model)?;

        let items = expense_items::Entity::find()
            .filter(expense_items::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(expense_items::Column::ReportId.eq(id.into_inner()))
            .order_by_asc(expense_items::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode_item)
            .collect::<Result<Vec<_>, _>>()?;

        let computed = total_of(&items)?;
        if computed != report.total {
            return Err(ExpenseError::TotalMismatch {
                report: id,
                stored: report.total,
                computed,
            });
        }
        Ok(Some((report, items)))
    }

    /// Lists a tenant's reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<ExpenseReport>, ExpenseError> {
        let mut query = expense_reports::Entity::find()
            .filter(expense_reports::Column::TenantId.eq(tenant_id.into_inner()));
        if let Some(employee_id) = employee_id {
            query = query.filter(expense_reports::Column::EmployeeId.eq(employee_id.into_inner()));
        }
        query
            .order_by_desc(expense_reports::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode_report)
            .collect()
    }

    /// Moves a report to a new status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `TotalMismatch` or `Lifecycle(InvalidTransition)`.
    pub async fn transition_report(
        &self,
        tenant_id: TenantId,
        id: ExpenseReportId,
        next: ExpenseReportStatus,
    ) -> Result<ExpenseReport, ExpenseError> {
        let (mut report, _) = self
            .find_with_items(tenant_id, id)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;
        transition(&mut report, next, Utc::now())?;

        expense_reports::ActiveModel {
            id: Set(id.into_inner()),
            status: Set(report.status.as_str().to_string()),
            updated_at: Set(codec::stamp(report.updated_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        tracing::info!(report_id = %id, status = %report.status, "expense report status changed");
        Ok(report)
    }

    /// Moves a single item to a new status.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` or `Lifecycle(InvalidTransition)`.
    pub async fn transition_item(
        &self,
        tenant_id: TenantId,
        id: ExpenseItemId,
        next: ExpenseItemStatus,
    ) -> Result<ExpenseItem, ExpenseError> {
        let model = expense_items::Entity::find_by_id(id.into_inner())
            .filter(expense_items::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::ItemNotFound(id))?;
        let mut item = decode_item(model)?;
        transition(&mut item, next, Utc::now())?;

        expense_items::ActiveModel {
            id: Set(id.into_inner()),
            status: Set(item.status.as_str().to_string()),
            updated_at: Set(codec::stamp(item.updated_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        tracing::info!(item_id = %id, status = %item.status, "expense item status changed");
        Ok(item)
    }
}

fn decode_report(model: expense_reports::Model) -> Result<ExpenseReport, ExpenseError> {
    let row = RowDecoder::new("expense_reports", model.id);
    Ok(ExpenseReport {
        id: ExpenseReportId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        title: model.title,
        currency: row.parse("currency", &model.currency, |s| s.parse().ok())?,
        total: from_minor_units(model.total_minor),
        status: row.parse("status", &model.status, ExpenseReportStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}

fn decode_item(model: expense_items::Model) -> Result<ExpenseItem, ExpenseError> {
    let row = RowDecoder::new("expense_items", model.id);
    Ok(ExpenseItem {
        id: ExpenseItemId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        report_id: ExpenseReportId::from_uuid(model.report_id),
        category: row.parse("category", &model.category, ExpenseCategory::parse)?,
        description: model.description,
        amount: from_minor_units(model.amount_minor),
        incurred_on: model.incurred_on,
        status: row.parse("status", &model.status, ExpenseItemStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
