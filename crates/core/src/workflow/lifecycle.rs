//! Transition tables and the generic `transition` operation.

use chrono::{DateTime, Utc};
use std::fmt;

use super::error::LifecycleError;
use super::types::{
    CaseStatus, EnrollmentStatus, ExpenseItemStatus, ExpenseReportStatus, TimesheetStatus,
};

/// A closed status enum with an exhaustive table of legal moves.
pub trait Lifecycle: Copy + Eq + fmt::Display + 'static {
    /// Statuses reachable in one step from `self`.
    fn allowed_next(self) -> &'static [Self];

    /// Returns true if `next` is reachable in one step.
    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Returns true if no further transition is possible.
    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl Lifecycle for ExpenseItemStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

impl Lifecycle for ExpenseReportStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Submitted => &[Self::Processing, Self::Approved, Self::Rejected],
            Self::Processing => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

impl Lifecycle for CaseStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[],
        }
    }
}

impl Lifecycle for TimesheetStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::Submitted => &[Self::Approved],
            Self::Approved => &[],
        }
    }
}

impl Lifecycle for EnrollmentStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Active],
            Self::Active => &[],
        }
    }
}

/// A record whose status moves through a [`Lifecycle`].
pub trait StatusRecord {
    /// The record's status enum.
    type Status: Lifecycle;

    /// Human-readable record kind used in error messages.
    const KIND: &'static str;

    /// Current status.
    fn status(&self) -> Self::Status;

    /// Overwrites the status. Only [`transition`] should call this.
    fn set_status(&mut self, status: Self::Status);

    /// Stamps `updated_at`.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Record-specific preconditions for entering `next`.
    fn check_guards(&self, _next: Self::Status) -> Result<(), LifecycleError> {
        Ok(())
    }
}

/// Moves `record` to `next`, stamping `updated_at = now`.
///
/// The record is untouched on failure.
///
/// # Errors
///
/// Returns `InvalidTransition` if `next` is not reachable from the current
/// status, or whatever guard error the record raises.
pub fn transition<R: StatusRecord>(
    record: &mut R,
    next: R::Status,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    let from = record.status();
    if !from.can_transition_to(next) {
        return Err(LifecycleError::InvalidTransition {
            kind: R::KIND,
            from: from.to_string(),
            to: next.to_string(),
        });
    }
    record.check_guards(next)?;

    record.set_status(next);
    record.touch(now);
    tracing::debug!(kind = R::KIND, %from, to = %next, "status changed");
    Ok(())
}

/// Parses a status string for a record kind.
///
/// # Errors
///
/// Returns `UnknownStatus` if the string names no variant.
pub fn parse_status<S>(
    kind: &'static str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<S>,
) -> Result<S, LifecycleError> {
    parse(value).ok_or_else(|| LifecycleError::UnknownStatus {
        kind,
        value: value.to_string(),
    })
}
