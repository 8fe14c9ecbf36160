//! Property-based tests for the status lifecycles.

use chrono::{NaiveDate, TimeZone, Utc};
use hrm_shared::types::{EmployeeId, TenantId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::lifecycle::Lifecycle;
use super::onboarding::{NewOnboardingCase, OnboardingCase};
use super::timesheet::{NewTimesheet, Timesheet, weekly_total};
use super::types::{
    CaseStatus, EnrollmentStatus, ExpenseItemStatus, ExpenseReportStatus, TimesheetStatus,
};
use super::{LifecycleError, transition};

fn arb_from<S: Lifecycle + std::fmt::Debug>(all: &'static [S]) -> impl Strategy<Value = S> {
    prop::sample::select(all)
}

/// Quarter-hour values between 0 and 24.
fn arb_day_hours() -> impl Strategy<Value = Decimal> {
    (0i64..=96).prop_map(|q| Decimal::new(q * 25, 2))
}

/// Walks `steps` from `start`, applying only legal moves, and returns the
/// longest path length seen.
fn walk<S: Lifecycle>(start: S, steps: &[prop::sample::Index]) -> usize {
    let mut current = start;
    let mut taken = 0;
    for step in steps {
        let next = current.allowed_next();
        if next.is_empty() {
            break;
        }
        current = next[step.index(next.len())];
        taken += 1;
    }
    taken
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No status can move to itself.
    #[test]
    fn prop_no_self_transitions(
        item in arb_from(ExpenseItemStatus::VARIANTS),
        report in arb_from(ExpenseReportStatus::VARIANTS),
        case in arb_from(CaseStatus::VARIANTS),
        sheet in arb_from(TimesheetStatus::VARIANTS),
        enrollment in arb_from(EnrollmentStatus::VARIANTS),
    ) {
        prop_assert!(!item.can_transition_to(item));
        prop_assert!(!report.can_transition_to(report));
        prop_assert!(!case.can_transition_to(case));
        prop_assert!(!sheet.can_transition_to(sheet));
        prop_assert!(!enrollment.can_transition_to(enrollment));
    }

    /// Every lifecycle reaches a terminal status in a bounded number of steps.
    #[test]
    fn prop_lifecycles_terminate(steps in prop::collection::vec(any::<prop::sample::Index>(), 0..20)) {
        prop_assert!(walk(ExpenseItemStatus::Pending, &steps) <= 1);
        prop_assert!(walk(ExpenseReportStatus::Submitted, &steps) <= 2);
        prop_assert!(walk(CaseStatus::Pending, &steps) <= 2);
        prop_assert!(walk(TimesheetStatus::Draft, &steps) <= 2);
        prop_assert!(walk(EnrollmentStatus::Pending, &steps) <= 1);
    }

    /// `transition` agrees with the table and never edits a record it refuses.
    #[test]
    fn prop_transition_matches_table(
        from in arb_from(TimesheetStatus::VARIANTS),
        to in arb_from(TimesheetStatus::VARIANTS),
        hours in prop::array::uniform7(arb_day_hours()),
    ) {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let mut sheet = Timesheet::create(
            TenantId::new(),
            NewTimesheet {
                employee_id: EmployeeId::new(),
                project: "Project Beta".into(),
                week_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                hours,
            },
            created,
        ).unwrap();
        sheet.status = from;

        let result = transition(&mut sheet, to, later);
        if from.can_transition_to(to) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(sheet.status, to);
            prop_assert_eq!(sheet.updated_at, later);
        } else {
            let is_invalid = matches!(result, Err(LifecycleError::InvalidTransition { .. }));
            prop_assert!(is_invalid);
            prop_assert_eq!(sheet.status, from);
            prop_assert_eq!(sheet.updated_at, created);
        }
    }

    /// The stored total always equals the sum of the seven days.
    #[test]
    fn prop_timesheet_total_is_sum(hours in prop::array::uniform7(arb_day_hours())) {
        let sheet = Timesheet::create(
            TenantId::new(),
            NewTimesheet {
                employee_id: EmployeeId::new(),
                project: "Project Gamma".into(),
                week_start: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                hours,
            },
            Utc::now(),
        ).unwrap();
        let expected: Decimal = hours.iter().copied().sum();
        prop_assert_eq!(sheet.total_hours, expected);
        prop_assert_eq!(weekly_total(&sheet.hours), expected);
    }

    /// Any sequence of progress updates leaves progress non-decreasing.
    #[test]
    fn prop_progress_never_decreases(updates in prop::collection::vec(0u8..=120, 1..30)) {
        let mut case = OnboardingCase::open(
            TenantId::new(),
            NewOnboardingCase {
                employee_id: EmployeeId::new(),
                position: "Analyst".into(),
                start_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                buddy_id: None,
            },
            Utc::now(),
        ).unwrap();

        let mut last = case.progress;
        for value in updates {
            let _ = case.update_progress(value, Utc::now());
            prop_assert!(case.progress >= last);
            prop_assert!(case.progress <= 100);
            last = case.progress;
        }
    }
}
