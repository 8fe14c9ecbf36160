//! Expense reports and their line items.

use chrono::{DateTime, NaiveDate, Utc};
use hrm_shared::types::money::MINOR_UNIT_SCALE;
use hrm_shared::types::{Currency, EmployeeId, ExpenseItemId, ExpenseReportId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{RecordError, require_text};
use super::lifecycle::StatusRecord;
use super::types::{ExpenseItemStatus, ExpenseReportStatus};

/// What an expense was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Flights, trains, cabs.
    Travel,
    /// Food while travelling or with clients.
    Meals,
    /// Hotels.
    Accommodation,
    /// Hardware and supplies.
    Equipment,
    /// Courses and certifications.
    Training,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Meals => "meals",
            Self::Accommodation => "accommodation",
            Self::Equipment => "equipment",
            Self::Training => "training",
            Self::Other => "other",
        }
    }

    /// Parses the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "travel" => Some(Self::Travel),
            "meals" => Some(Self::Meals),
            "accommodation" => Some(Self::Accommodation),
            "equipment" => Some(Self::Equipment),
            "training" => Some(Self::Training),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// One line of an expense report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Item ID.
    pub id: ExpenseItemId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Parent report.
    pub report_id: ExpenseReportId,
    /// Category.
    pub category: ExpenseCategory,
    /// Free-text description.
    pub description: String,
    /// Amount in the report's currency; always positive.
    pub amount: Decimal,
    /// Date the expense was incurred.
    pub incurred_on: NaiveDate,
    /// Approval status.
    pub status: ExpenseItemStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for one expense line.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpenseItem {
    /// Category.
    pub category: ExpenseCategory,
    /// Description.
    pub description: String,
    /// Amount, must be positive.
    pub amount: Decimal,
    /// Date incurred.
    pub incurred_on: NaiveDate,
}

/// A reimbursement claim grouping expense items for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseReport {
    /// Report ID.
    pub id: ExpenseReportId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Claimant.
    pub employee_id: EmployeeId,
    /// Short title, e.g. "Client visit Mumbai".
    pub title: String,
    /// Currency of every item.
    pub currency: Currency,
    /// Sum of item amounts.
    pub total: Decimal,
    /// Review status.
    pub status: ExpenseReportStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for filing an expense report.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpenseReport {
    /// Claimant.
    pub employee_id: EmployeeId,
    /// Title.
    pub title: String,
    /// Currency; INR when omitted.
    #[serde(default)]
    pub currency: Currency,
    /// Lines, at least one.
    pub items: Vec<NewExpenseItem>,
}

impl ExpenseReport {
    /// Builds a submitted report and its pending items.
    ///
    /// # Errors
    ///
    /// Fails on a blank title or description, an empty item list, a
    /// non-positive amount, or an amount above [`MAX_EXPENSE_AMOUNT`].
    pub fn submit(
        tenant_id: TenantId,
        input: NewExpenseReport,
        now: DateTime<Utc>,
    ) -> Result<(Self, Vec<ExpenseItem>), RecordError> {
        let title = require_text("title", &input.title)?;
        if input.items.is_empty() {
            return Err(RecordError::EmptyExpenseReport);
        }

        let id = ExpenseReportId::new();
        let items = input
            .items
            .into_iter()
            .map(|item| ExpenseItem::create(tenant_id, id, item, now))
            .collect::<Result<Vec<_>, _>>()?;

        let report = Self {
            id,
            tenant_id,
            employee_id: input.employee_id,
            title,
            currency: input.currency,
            total: total_of(&items)?,
            status: ExpenseReportStatus::Submitted,
            created_at: now,
            updated_at: now,
        };
        Ok((report, items))
    }

    /// Returns true if `total` equals the sum of `items`. A sum that
    /// overflows never matches.
    #[must_use]
    pub fn total_matches(&self, items: &[ExpenseItem]) -> bool {
        total_of(items).is_ok_and(|sum| sum == self.total)
    }
}

impl ExpenseItem {
    /// Builds a pending item for a report.
    ///
    /// # Errors
    ///
    /// Fails on a blank description, or an amount that is not positive or
    /// has more than two decimal places, or exceeds [`MAX_EXPENSE_AMOUNT`].
    pub fn create(
        tenant_id: TenantId,
        report_id: ExpenseReportId,
        input: NewExpenseItem,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        if input.amount <= Decimal::ZERO || input.amount.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(RecordError::InvalidAmount(input.amount));
        }
        if input.amount > MAX_EXPENSE_AMOUNT {
            return Err(RecordError::AmountOutOfRange(input.amount));
        }
        Ok(Self {
            id: ExpenseItemId::new(),
            tenant_id,
            report_id,
            category: input.category,
            description: require_text("description", &input.description)?,
            amount: input.amount,
            incurred_on: input.incurred_on,
            status: ExpenseItemStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Largest amount accepted on a single expense line.
pub const MAX_EXPENSE_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Sum of item amounts.
///
/// # Errors
///
/// Returns `RecordError::AmountOutOfRange` with the offending item amount if
/// the running total overflows.
pub fn total_of(items: &[ExpenseItem]) -> Result<Decimal, RecordError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.amount)
            .ok_or(RecordError::AmountOutOfRange(item.amount))
    })
}

impl StatusRecord for ExpenseItem {
    type Status = ExpenseItemStatus;
    const KIND: &'static str = "expense item";

    fn status(&self) -> ExpenseItemStatus {
        self.status
    }

    fn set_status(&mut self, status: ExpenseItemStatus) {
        self.status = status;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl StatusRecord for ExpenseReport {
    type Status = ExpenseReportStatus;
    const KIND: &'static str = "expense report";

    fn status(&self) -> ExpenseReportStatus {
        self.status
    }

    fn set_status(&mut self, status: ExpenseReportStatus) {
        self.status = status;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
