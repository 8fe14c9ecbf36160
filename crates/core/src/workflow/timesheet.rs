//! Weekly timesheets.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use hrm_shared::types::{EmployeeId, TenantId, TimesheetId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{RecordError, require_text};
use super::lifecycle::StatusRecord;
use super::types::TimesheetStatus;

/// Maximum hours that can be logged against a single day.
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Hours per weekday, Monday first.
pub type WeekHours = [Decimal; 7];

/// One employee's hours on one project for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timesheet {
    /// Timesheet ID.
    pub id: TimesheetId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Who logged the hours.
    pub employee_id: EmployeeId,
    /// Project name.
    pub project: String,
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Daily hours, Monday first.
    pub hours: WeekHours,
    /// Sum of `hours`.
    pub total_hours: Decimal,
    /// Approval status.
    pub status: TimesheetStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for a new timesheet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTimesheet {
    /// Who logged the hours.
    pub employee_id: EmployeeId,
    /// Project name.
    pub project: String,
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Daily hours, Monday first.
    pub hours: WeekHours,
}

/// Sum of a week's hours. Saturates instead of overflowing on unvalidated input.
#[must_use]
pub fn weekly_total(hours: &WeekHours) -> Decimal {
    hours
        .iter()
        .fold(Decimal::ZERO, |acc, h| acc.saturating_add(*h))
}

/// Checks each day is within 0..=24.
///
/// # Errors
///
/// Returns `InvalidHours` naming the first bad day.
pub fn validate_hours(hours: &WeekHours) -> Result<(), RecordError> {
    match hours
        .iter()
        .enumerate()
        .find(|(_, h)| h.is_sign_negative() || **h > MAX_DAILY_HOURS)
    {
        Some((day, hours)) => Err(RecordError::InvalidHours { day, hours: *hours }),
        None => Ok(()),
    }
}

impl Timesheet {
    /// Builds a draft timesheet with its total computed.
    ///
    /// # Errors
    ///
    /// Fails on a blank project, a week that does not start on Monday, or
    /// out-of-range hours.
    pub fn create(
        tenant_id: TenantId,
        input: NewTimesheet,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        let project = require_text("project", &input.project)?;
        if input.week_start.weekday() != Weekday::Mon {
            return Err(RecordError::WeekStartNotMonday);
        }
        validate_hours(&input.hours)?;

        Ok(Self {
            id: TimesheetId::new(),
            tenant_id,
            employee_id: input.employee_id,
            project,
            week_start: input.week_start,
            total_hours: weekly_total(&input.hours),
            hours: input.hours,
            status: TimesheetStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if `total_hours` equals the sum of `hours`.
    #[must_use]
    pub fn total_matches(&self) -> bool {
        self.total_hours == weekly_total(&self.hours)
    }
}

impl StatusRecord for Timesheet {
    type Status = TimesheetStatus;
    const KIND: &'static str = "timesheet";

    fn status(&self) -> TimesheetStatus {
        self.status
    }

    fn set_status(&mut self, status: TimesheetStatus) {
        self.status = status;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::transition;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn input(hours: WeekHours) -> NewTimesheet {
        NewTimesheet {
            employee_id: EmployeeId::new(),
            project: "Project Alpha".to_string(),
            week_start: monday(),
            hours,
        }
    }

    #[rstest]
    #[case([dec!(8), dec!(8), dec!(7), dec!(8), dec!(6), dec!(0), dec!(0)], dec!(37))]
    #[case([dec!(0); 7], dec!(0))]
    #[case([dec!(7.5), dec!(7.5), dec!(7.5), dec!(7.5), dec!(7.5), dec!(2.25), dec!(0)], dec!(39.75))]
    fn test_weekly_total(#[case] hours: WeekHours, #[case] expected: Decimal) {
        let sheet = Timesheet::create(TenantId::new(), input(hours), Utc::now()).unwrap();
        assert_eq!(sheet.total_hours, expected);
        assert!(sheet.total_matches());
    }

    #[test]
    fn test_weekly_total_of_unvalidated_hours_does_not_panic() {
        let hours = [Decimal::MAX, Decimal::MAX, dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)];
        assert_eq!(weekly_total(&hours), Decimal::MAX);
    }

    #[test]
    fn test_rejects_day_over_24() {
        let mut hours = [dec!(8); 7];
        hours[3] = dec!(24.5);
        assert_eq!(
            Timesheet::create(TenantId::new(), input(hours), Utc::now()),
            Err(RecordError::InvalidHours {
                day: 3,
                hours: dec!(24.5)
            })
        );
    }

    #[test]
    fn test_rejects_negative_hours() {
        let mut hours = [dec!(0); 7];
        hours[0] = dec!(-1);
        assert!(matches!(
            validate_hours(&hours),
            Err(RecordError::InvalidHours { day: 0, .. })
        ));
    }

    #[test]
    fn test_week_must_start_monday() {
        let mut new = input([dec!(1); 7]);
        new.week_start = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        assert_eq!(
            Timesheet::create(TenantId::new(), new, Utc::now()),
            Err(RecordError::WeekStartNotMonday)
        );
    }

    #[test]
    fn test_draft_submitted_approved() {
        let mut sheet = Timesheet::create(TenantId::new(), input([dec!(8); 7]), Utc::now()).unwrap();
        assert!(transition(&mut sheet, TimesheetStatus::Approved, Utc::now()).is_err());
        transition(&mut sheet, TimesheetStatus::Submitted, Utc::now()).unwrap();
        transition(&mut sheet, TimesheetStatus::Approved, Utc::now()).unwrap();
        assert!(transition(&mut sheet, TimesheetStatus::Draft, Utc::now()).is_err());
    }
}
