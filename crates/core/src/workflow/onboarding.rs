//! Onboarding and offboarding cases.
//!
//! Both kinds share [`CaseStatus`] and a progress percentage that only moves
//! forward and freezes once the case is completed.

use chrono::{DateTime, NaiveDate, Utc};
use hrm_shared::types::{EmployeeId, OffboardingCaseId, OnboardingCaseId, TenantId};
use serde::{Deserialize, Serialize};

use super::error::{LifecycleError, RecordError, require_text};
use super::lifecycle::StatusRecord;
use super::types::CaseStatus;

/// Upper bound of case progress.
pub const FULL_PROGRESS: u8 = 100;

/// Checklist used when an offboarding case is opened without one.
pub const DEFAULT_CLEARANCE: [&str; 5] = [
    "IT assets returned",
    "System access revoked",
    "Finance settlement",
    "Knowledge transfer",
    "Exit interview",
];

/// Validates a progress update against the current state.
fn next_progress(status: CaseStatus, current: u8, requested: u8) -> Result<u8, LifecycleError> {
    if status == CaseStatus::Completed {
        return Err(LifecycleError::ProgressLocked);
    }
    if requested > FULL_PROGRESS {
        return Err(LifecycleError::ProgressOutOfRange(requested));
    }
    if requested < current {
        return Err(LifecycleError::ProgressRegression { current, requested });
    }
    Ok(requested)
}

/// A new joiner's onboarding case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingCase {
    /// Case ID.
    pub id: OnboardingCaseId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The joiner.
    pub employee_id: EmployeeId,
    /// Position being filled.
    pub position: String,
    /// First working day.
    pub start_date: NaiveDate,
    /// Colleague assigned to help the joiner settle in.
    pub buddy_id: Option<EmployeeId>,
    /// Percent of tasks done.
    pub progress: u8,
    /// Case status.
    pub status: CaseStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for opening an onboarding case.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOnboardingCase {
    /// The joiner.
    pub employee_id: EmployeeId,
    /// Position.
    pub position: String,
    /// First working day.
    pub start_date: NaiveDate,
    /// Optional buddy.
    #[serde(default)]
    pub buddy_id: Option<EmployeeId>,
}

impl OnboardingCase {
    /// Opens a pending case at 0% progress.
    ///
    /// # Errors
    ///
    /// Fails on a blank position.
    pub fn open(
        tenant_id: TenantId,
        input: NewOnboardingCase,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            id: OnboardingCaseId::new(),
            tenant_id,
            employee_id: input.employee_id,
            position: require_text("position", &input.position)?,
            start_date: input.start_date,
            buddy_id: input.buddy_id,
            progress: 0,
            status: CaseStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves progress forward.
    ///
    /// # Errors
    ///
    /// Fails if completed, above 100, or lower than the current value.
    pub fn update_progress(&mut self, progress: u8, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.progress = next_progress(self.status, self.progress, progress)?;
        self.updated_at = now;
        Ok(())
    }
}

impl StatusRecord for OnboardingCase {
    type Status = CaseStatus;
    const KIND: &'static str = "onboarding";

    fn status(&self) -> CaseStatus {
        self.status
    }

    fn set_status(&mut self, status: CaseStatus) {
        self.status = status;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn check_guards(&self, next: CaseStatus) -> Result<(), LifecycleError> {
        if next == CaseStatus::Completed && self.progress < FULL_PROGRESS {
            return Err(LifecycleError::IncompleteProgress {
                progress: self.progress,
            });
        }
        Ok(())
    }
}

/// Why an employee is leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationReason {
    /// Employee resigned.
    Resignation,
    /// Employer ended the contract.
    Termination,
    /// Retirement.
    Retirement,
    /// Fixed-term contract ran out.
    ContractEnd,
}

impl SeparationReason {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resignation => "resignation",
            Self::Termination => "termination",
            Self::Retirement => "retirement",
            Self::ContractEnd => "contract_end",
        }
    }

    /// Parses the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resignation" => Some(Self::Resignation),
            "termination" => Some(Self::Termination),
            "retirement" => Some(Self::Retirement),
            "contract_end" => Some(Self::ContractEnd),
            _ => None,
        }
    }
}

/// One line of the exit checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceItem {
    /// What must be cleared.
    pub name: String,
    /// Whether it has been.
    pub cleared: bool,
}

/// A leaver's offboarding case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffboardingCase {
    /// Case ID.
    pub id: OffboardingCaseId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The leaver.
    pub employee_id: EmployeeId,
    /// Position being vacated.
    pub position: String,
    /// Last day at work.
    pub last_working_day: NaiveDate,
    /// Reason for leaving.
    pub reason: SeparationReason,
    /// Exit checklist.
    pub clearance: Vec<ClearanceItem>,
    /// Percent of tasks done.
    pub progress: u8,
    /// Case status.
    pub status: CaseStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for opening an offboarding case.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOffboardingCase {
    /// The leaver.
    pub employee_id: EmployeeId,
    /// Position.
    pub position: String,
    /// Last working day.
    pub last_working_day: NaiveDate,
    /// Reason.
    pub reason: SeparationReason,
    /// Checklist item names; [`DEFAULT_CLEARANCE`] when empty.
    #[serde(default)]
    pub clearance: Vec<String>,
}

impl OffboardingCase {
    /// Opens a pending case with every clearance item outstanding.
    ///
    /// # Errors
    ///
    /// Fails on a blank position or checklist item.
    pub fn open(
        tenant_id: TenantId,
        input: NewOffboardingCase,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        let names: Vec<String> = if input.clearance.is_empty() {
            DEFAULT_CLEARANCE.iter().map(|s| (*s).to_string()).collect()
        } else {
            input.clearance
        };
        let clearance = names
            .iter()
            .map(|name| {
                Ok(ClearanceItem {
                    name: require_text("clearance item", name)?,
                    cleared: false,
                })
            })
            .collect::<Result<Vec<_>, RecordError>>()?;

        Ok(Self {
            id: OffboardingCaseId::new(),
            tenant_id,
            employee_id: input.employee_id,
            position: require_text("position", &input.position)?,
            last_working_day: input.last_working_day,
            reason: input.reason,
            clearance,
            progress: 0,
            status: CaseStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves progress forward.
    ///
    /// # Errors
    ///
    /// Fails if completed, above 100, or lower than the current value.
    pub fn update_progress(&mut self, progress: u8, now: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.progress = next_progress(self.status, self.progress, progress)?;
        self.updated_at = now;
        Ok(())
    }

    /// Marks a checklist item cleared. Names match case-insensitively;
    /// clearing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `UnknownClearanceItem` if no item has that name.
    pub fn clear_item(&mut self, name: &str, now: DateTime<Utc>) -> Result<(), RecordError> {
        let needle = name.trim();
        let item = self
            .clearance
            .iter_mut()
            .find(|item| item.name.eq_ignore_ascii_case(needle))
            .ok_or_else(|| RecordError::UnknownClearanceItem(needle.to_string()))?;
        if !item.cleared {
            item.cleared = true;
            self.updated_at = now;
        }
        Ok(())
    }

    /// Number of checklist items not yet cleared.
    #[must_use]
    pub fn pending_clearance(&self) -> usize {
        self.clearance.iter().filter(|item| !item.cleared).count()
    }
}

impl StatusRecord for OffboardingCase {
    type Status = CaseStatus;
    const KIND: &'static str = "offboarding";

    fn status(&self) -> CaseStatus {
        self.status
    }

    fn set_status(&mut self, status: CaseStatus) {
        self.status = status;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn check_guards(&self, next: CaseStatus) -> Result<(), LifecycleError> {
        if next != CaseStatus::Completed {
            return Ok(());
        }
        if self.progress < FULL_PROGRESS {
            return Err(LifecycleError::IncompleteProgress {
                progress: self.progress,
            });
        }
        match self.pending_clearance() {
            0 => Ok(()),
            pending => Err(LifecycleError::ClearancePending { pending }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::transition;

    fn onboarding() -> OnboardingCase {
        OnboardingCase::open(
            TenantId::new(),
            NewOnboardingCase {
                employee_id: EmployeeId::new(),
                position: "Software Engineer".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                buddy_id: Some(EmployeeId::new()),
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn offboarding(clearance: Vec<String>) -> OffboardingCase {
        OffboardingCase::open(
            TenantId::new(),
            NewOffboardingCase {
                employee_id: EmployeeId::new(),
                position: "Accountant".to_string(),
                last_working_day: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
                reason: SeparationReason::Resignation,
                clearance,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_onboarding_happy_path() {
        let mut case = onboarding();
        transition(&mut case, CaseStatus::InProgress, Utc::now()).unwrap();
        case.update_progress(40, Utc::now()).unwrap();
        case.update_progress(100, Utc::now()).unwrap();
        transition(&mut case, CaseStatus::Completed, Utc::now()).unwrap();
        assert_eq!(case.status, CaseStatus::Completed);
    }

    #[test]
    fn test_complete_requires_full_progress() {
        let mut case = onboarding();
        transition(&mut case, CaseStatus::InProgress, Utc::now()).unwrap();
        case.update_progress(75, Utc::now()).unwrap();
        assert_eq!(
            transition(&mut case, CaseStatus::Completed, Utc::now()),
            Err(LifecycleError::IncompleteProgress { progress: 75 })
        );
        assert_eq!(case.status, CaseStatus::InProgress);
    }

    #[test]
    fn test_progress_rules() {
        let mut case = onboarding();
        case.update_progress(50, Utc::now()).unwrap();
        case.update_progress(50, Utc::now()).unwrap();
        assert_eq!(
            case.update_progress(20, Utc::now()),
            Err(LifecycleError::ProgressRegression {
                current: 50,
                requested: 20
            })
        );
        assert_eq!(
            case.update_progress(101, Utc::now()),
            Err(LifecycleError::ProgressOutOfRange(101))
        );
        assert_eq!(case.progress, 50);
    }

    #[test]
    fn test_progress_locked_after_completion() {
        let mut case = onboarding();
        transition(&mut case, CaseStatus::InProgress, Utc::now()).unwrap();
        case.update_progress(100, Utc::now()).unwrap();
        transition(&mut case, CaseStatus::Completed, Utc::now()).unwrap();
        assert_eq!(
            case.update_progress(100, Utc::now()),
            Err(LifecycleError::ProgressLocked)
        );
    }

    #[test]
    fn test_offboarding_default_checklist() {
        let case = offboarding(vec![]);
        assert_eq!(case.clearance.len(), DEFAULT_CLEARANCE.len());
        assert_eq!(case.pending_clearance(), DEFAULT_CLEARANCE.len());
    }

    #[test]
    fn test_offboarding_needs_clearance() {
        let mut case = offboarding(vec!["Laptop".into(), "Badge".into()]);
        transition(&mut case, CaseStatus::InProgress, Utc::now()).unwrap();
        case.update_progress(100, Utc::now()).unwrap();

        case.clear_item("laptop", Utc::now()).unwrap();
        assert_eq!(
            transition(&mut case, CaseStatus::Completed, Utc::now()),
            Err(LifecycleError::ClearancePending { pending: 1 })
        );

        case.clear_item("Badge", Utc::now()).unwrap();
        transition(&mut case, CaseStatus::Completed, Utc::now()).unwrap();
    }

    #[test]
    fn test_clear_unknown_item() {
        let mut case = offboarding(vec!["Laptop".into()]);
        assert_eq!(
            case.clear_item("Car", Utc::now()),
            Err(RecordError::UnknownClearanceItem("Car".into()))
        );
    }

    #[test]
    fn test_blank_checklist_entry_rejected() {
        let result = OffboardingCase::open(
            TenantId::new(),
            NewOffboardingCase {
                employee_id: EmployeeId::new(),
                position: "Analyst".into(),
                last_working_day: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                reason: SeparationReason::ContractEnd,
                clearance: vec!["  ".into()],
            },
            Utc::now(),
        );
        assert_eq!(result, Err(RecordError::BlankField("clearance item")));
    }
}
