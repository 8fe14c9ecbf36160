//! Workflow error types.
//!
//! [`LifecycleError`] covers status changes and the progress rules tied to
//! them. [`RecordError`] covers field validation when a record is built.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by a status transition or a progress update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The target status is not reachable from the current one.
    #[error("Invalid {kind} status transition from {from} to {to}")]
    InvalidTransition {
        /// Record kind, e.g. "expense item".
        kind: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// A case cannot be completed before its progress reaches 100.
    #[error("Cannot complete at {progress}% progress")]
    IncompleteProgress {
        /// Current progress.
        progress: u8,
    },

    /// Offboarding cannot complete while clearance items remain.
    #[error("{pending} clearance item(s) still pending")]
    ClearancePending {
        /// Items not yet cleared.
        pending: usize,
    },

    /// Progress may only move forward.
    #[error("Progress cannot go back from {current}% to {requested}%")]
    ProgressRegression {
        /// Stored progress.
        current: u8,
        /// Requested progress.
        requested: u8,
    },

    /// Progress is a percentage.
    #[error("Progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),

    /// Progress is frozen once the case is completed.
    #[error("Progress of a completed case cannot change")]
    ProgressLocked,

    /// The status string is not a known variant.
    #[error("Unknown {kind} status: {value}")]
    UnknownStatus {
        /// Record kind.
        kind: &'static str,
        /// The unrecognized input.
        value: String,
    },
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownStatus { .. } | Self::ProgressOutOfRange(_) => 400,
            Self::InvalidTransition { .. }
            | Self::IncompleteProgress { .. }
            | Self::ClearancePending { .. }
            | Self::ProgressRegression { .. }
            | Self::ProgressLocked => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::IncompleteProgress { .. } => "INCOMPLETE_PROGRESS",
            Self::ClearancePending { .. } => "CLEARANCE_PENDING",
            Self::ProgressRegression { .. } => "PROGRESS_REGRESSION",
            Self::ProgressOutOfRange(_) => "PROGRESS_OUT_OF_RANGE",
            Self::ProgressLocked => "PROGRESS_LOCKED",
            Self::UnknownStatus { .. } => "UNKNOWN_STATUS",
        }
    }
}

/// Field validation failures for workflow records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A required text field is empty.
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    /// Expense amounts must be positive with at most two decimal places.
    #[error("Expense amount must be positive with at most two decimal places, got {0}")]
    InvalidAmount(Decimal),

    /// An item amount is above the per-item ceiling, or the report total
    /// no longer fits a `Decimal`.
    #[error("Expense amount {0} is out of range")]
    AmountOutOfRange(Decimal),

    /// An expense report needs at least one item.
    #[error("Expense report has no items")]
    EmptyExpenseReport,

    /// Daily hours must be within 0..=24.
    #[error("Hours for day {day} must be between 0 and 24, got {hours}")]
    InvalidHours {
        /// Zero-based day of the week, Monday first.
        day: usize,
        /// Offending value.
        hours: Decimal,
    },

    /// Timesheet weeks start on Monday.
    #[error("Week must start on a Monday")]
    WeekStartNotMonday,

    /// The named clearance item is not on the checklist.
    #[error("Unknown clearance item: {0}")]
    UnknownClearanceItem(String),

    /// Coverage figures are out of range.
    #[error("Invalid coverage: {0}")]
    InvalidCoverage(String),
}

impl RecordError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnknownClearanceItem(_) => 404,
            _ => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BlankField(_) => "BLANK_FIELD",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::EmptyExpenseReport => "EMPTY_EXPENSE_REPORT",
            Self::InvalidHours { .. } => "INVALID_HOURS",
            Self::WeekStartNotMonday => "WEEK_START_NOT_MONDAY",
            Self::UnknownClearanceItem(_) => "UNKNOWN_CLEARANCE_ITEM",
            Self::InvalidCoverage(_) => "INVALID_COVERAGE",
        }
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RecordError::BlankField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_transition_error() {
        let err = LifecycleError::InvalidTransition {
            kind: "expense item",
            from: "approved".to_string(),
            to: "pending".to_string(),
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(
            err.to_string(),
            "Invalid expense item status transition from approved to pending"
        );
    }

    #[test]
    fn test_progress_errors() {
        let err = LifecycleError::ProgressRegression {
            current: 60,
            requested: 40,
        };
        assert_eq!(err.error_code(), "PROGRESS_REGRESSION");
        assert!(err.to_string().contains("60%"));
        assert_eq!(LifecycleError::ProgressLocked.status_code(), 422);
    }

    #[test]
    fn test_record_errors() {
        let err = RecordError::InvalidHours {
            day: 2,
            hours: dec!(25),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_HOURS");
        assert_eq!(
            RecordError::UnknownClearanceItem("Laptop".into()).status_code(),
            404
        );
        let err = RecordError::AmountOutOfRange(Decimal::MAX);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "AMOUNT_OUT_OF_RANGE");
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  Trip  ").unwrap(), "Trip");
        assert_eq!(
            require_text("title", "   "),
            Err(RecordError::BlankField("title"))
        );
    }
}
