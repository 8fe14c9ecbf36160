//! Benefit plans and employee enrollments.

use chrono::{DateTime, NaiveDate, Utc};
use hrm_shared::types::{BenefitPlanId, EmployeeId, EnrollmentId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{RecordError, require_text};
use super::lifecycle::StatusRecord;
use super::types::EnrollmentStatus;

/// Kind of benefit a plan provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitType {
    /// Medical insurance.
    Health,
    /// Dental insurance.
    Dental,
    /// Vision insurance.
    Vision,
    /// Life insurance.
    Life,
    /// Retirement savings with employer match.
    Retirement,
}

impl BenefitType {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Dental => "dental",
            Self::Vision => "vision",
            Self::Life => "life",
            Self::Retirement => "retirement",
        }
    }

    /// Parses the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "health" => Some(Self::Health),
            "dental" => Some(Self::Dental),
            "vision" => Some(Self::Vision),
            "life" => Some(Self::Life),
            "retirement" => Some(Self::Retirement),
            _ => None,
        }
    }
}

/// What a plan pays out or contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coverage {
    /// Insurance cover bought with a monthly premium.
    Insurance {
        /// Sum insured.
        coverage_amount: Decimal,
        /// Employee's monthly premium.
        monthly_premium: Decimal,
    },
    /// Employer matches employee contributions up to a percentage of salary.
    EmployerMatch {
        /// Match percentage, 0 < p <= 100.
        match_percent: Decimal,
    },
}

impl Coverage {
    /// Checks the figures are in range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoverage` describing the bad figure.
    pub fn validate(&self) -> Result<(), RecordError> {
        match *self {
            Self::Insurance {
                coverage_amount,
                monthly_premium,
            } => {
                if coverage_amount <= Decimal::ZERO {
                    return Err(RecordError::InvalidCoverage(
                        "coverage amount must be positive".into(),
                    ));
                }
                if monthly_premium.is_sign_negative() {
                    return Err(RecordError::InvalidCoverage(
                        "monthly premium must not be negative".into(),
                    ));
                }
                Ok(())
            }
            Self::EmployerMatch { match_percent } => {
                if match_percent <= Decimal::ZERO || match_percent > Decimal::ONE_HUNDRED {
                    return Err(RecordError::InvalidCoverage(format!(
                        "match percent must be in (0, 100], got {match_percent}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A benefit offered by a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitPlan {
    /// Plan ID.
    pub id: BenefitPlanId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Plan name.
    pub name: String,
    /// Benefit kind.
    pub benefit_type: BenefitType,
    /// Insurer or fund manager.
    pub provider: String,
    /// Cover or match terms.
    pub coverage: Coverage,
    /// Whether new enrollments are accepted.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for a new benefit plan.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBenefitPlan {
    /// Plan name.
    pub name: String,
    /// Benefit kind.
    pub benefit_type: BenefitType,
    /// Provider.
    pub provider: String,
    /// Terms.
    pub coverage: Coverage,
}

impl BenefitPlan {
    /// Builds an active plan.
    ///
    /// # Errors
    ///
    /// Fails on blank text or out-of-range coverage.
    pub fn create(
        tenant_id: TenantId,
        input: NewBenefitPlan,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordError> {
        input.coverage.validate()?;
        Ok(Self {
            id: BenefitPlanId::new(),
            tenant_id,
            name: require_text("name", &input.name)?,
            benefit_type: input.benefit_type,
            provider: require_text("provider", &input.provider)?,
            coverage: input.coverage,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

/// An employee's enrollment in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrollment ID.
    pub id: EnrollmentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Enrolled employee.
    pub employee_id: EmployeeId,
    /// Plan.
    pub plan_id: BenefitPlanId,
    /// Date cover starts.
    pub effective_from: NaiveDate,
    /// Enrollment status.
    pub status: EnrollmentStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
}

/// Input for enrolling an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEnrollment {
    /// Employee.
    pub employee_id: EmployeeId,
    /// Plan.
    pub plan_id: BenefitPlanId,
    /// Date cover starts.
    pub effective_from: NaiveDate,
}

impl Enrollment {
    /// Builds a pending enrollment.
    #[must_use]
    pub fn request(tenant_id: TenantId, input: NewEnrollment, now: DateTime<Utc>) -> Self {
        Self {
            id: EnrollmentId::new(),
            tenant_id,
            employee_id: input.employee_id,
            plan_id: input.plan_id,
            effective_from: input.effective_from,
            status: EnrollmentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl StatusRecord for Enrollment {
    type Status = EnrollmentStatus;
    const KIND: &'static str = "enrollment";

    fn status(&self) -> EnrollmentStatus {
        self.status
    }

    fn set_status(&mut self, status: EnrollmentStatus) {
        self.status = status;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
