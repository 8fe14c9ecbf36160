//! Benefit plan and enrollment repository.

use chrono::Utc;
use hrm_core::workflow::{
    BenefitPlan, BenefitType, Enrollment, EnrollmentStatus, LifecycleError, NewBenefitPlan,
    NewEnrollment, RecordError, transition,
};
use hrm_shared::AppError;
use hrm_shared::types::{BenefitPlanId, EmployeeId, EnrollmentId, TenantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{domain_into_app, employee_exists, tenant_exists};
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::{benefit_plans, enrollments};

/// Error types for benefit operations.
#[derive(Debug, thiserror::Error)]
pub enum BenefitError {
    /// Plan not found.
    #[error("Benefit plan not found: {0}")]
    PlanNotFound(BenefitPlanId),

    /// Enrollment not found.
    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(EnrollmentId),

    /// Owning tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// Employee is not part of the tenant.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// Plan name already used in this tenant.
    #[error("Benefit plan '{0}' already exists")]
    DuplicatePlan(String),

    /// Employee is already enrolled in the plan.
    #[error("Employee {employee} is already enrolled in plan {plan}")]
    AlreadyEnrolled {
        /// Employee.
        employee: EmployeeId,
        /// Plan.
        plan: BenefitPlanId,
    },

    /// Plan no longer accepts enrollments.
    #[error("Benefit plan {0} is not active")]
    PlanInactive(BenefitPlanId),

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

impl From<BenefitError> for AppError {
    fn from(err: BenefitError) -> Self {
        match err {
            BenefitError::PlanNotFound(_)
            | BenefitError::EnrollmentNotFound(_)
            | BenefitError::TenantNotFound(_)
            | BenefitError::EmployeeNotFound(_) => Self::NotFound(err.to_string()),
            BenefitError::DuplicatePlan(_) | BenefitError::AlreadyEnrolled { .. } => {
                Self::Conflict(err.to_string())
            }
            BenefitError::PlanInactive(_) => Self::rule("PLAN_INACTIVE", err.to_string()),
            BenefitError::Record(e) => domain_into_app!(e),
            BenefitError::Lifecycle(e) => domain_into_app!(e),
            BenefitError::Corrupt(e) => Self::Internal(e.to_string()),
            BenefitError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Benefit repository.
#[derive(Debug, Clone)]
pub struct BenefitRepository {
    db: DatabaseConnection,
}

impl BenefitRepository {
    /// Creates a new benefit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active plan.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound`, `DuplicatePlan` or a validation error.
    pub async fn create_plan(
        &self,
        tenant_id: TenantId,
        input: NewBenefitPlan,
    ) -> Result<BenefitPlan, BenefitError> {
        if !tenant_exists(&self.db, tenant_id).await? {
            return Err(BenefitError::TenantNotFound(tenant_id));
        }
        let plan = BenefitPlan::create(tenant_id, input, Utc::now())?;

        benefit_plans::ActiveModel {
            id: Set(plan.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(plan.name.clone()),
            benefit_type: Set(plan.benefit_type.as_str().to_string()),
            provider: Set(plan.provider.clone()),
            coverage: Set(codec::to_json(&plan.coverage)?),
            is_active: Set(plan.is_active),
            created_at: Set(codec::stamp(plan.created_at)),
            updated_at: Set(codec::stamp(plan.updated_at)),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if codec::is_unique_violation(&e) {
                BenefitError::DuplicatePlan(plan.name.clone())
            } else {
                BenefitError::Database(e)
            }
        })?;

        Ok(plan)
    }

    /// Finds a plan by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find_plan(
        &self,
        tenant_id: TenantId,
        id: BenefitPlanId,
    ) -> Result<Option<BenefitPlan>, BenefitError> {
        benefit_plans::Entity::find_by_id(id.into_inner())
            .filter(benefit_plans::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .map(decode_plan)
            .transpose()
    }

    /// Finds a plan by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find_plan_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> Result<Option<BenefitPlan>, BenefitError> {
        benefit_plans::Entity::find()
            .filter(benefit_plans::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(benefit_plans::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await?
            .map(decode_plan)
            .transpose()
    }

    /// Lists a tenant's plans by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list_plans(&self, tenant_id: TenantId) -> Result<Vec<BenefitPlan>, BenefitError> {
        benefit_plans::Entity::find()
            .filter(benefit_plans::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(benefit_plans::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode_plan)
            .collect()
    }

    /// Requests a pending enrollment.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound`, `PlanNotFound`, `PlanInactive` or
    /// `AlreadyEnrolled`.
    pub async fn enroll(
        &self,
        tenant_id: TenantId,
        input: NewEnrollment,
    ) -> Result<Enrollment, BenefitError> {
        if !employee_exists(&self.db, tenant_id, input.employee_id).await? {
            return Err(BenefitError::EmployeeNotFound(input.employee_id));
        }
        let plan = self
            .find_plan(tenant_id, input.plan_id)
            .await?
            .ok_or(BenefitError::PlanNotFound(input.plan_id))?;
        if !plan.is_active {
            return Err(BenefitError::PlanInactive(plan.id));
        }

        let enrollment = Enrollment::request(tenant_id, input, Utc::now());
        enrollments::ActiveModel {
            id: Set(enrollment.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(enrollment.employee_id.into_inner()),
            plan_id: Set(enrollment.plan_id.into_inner()),
            effective_from: Set(enrollment.effective_from),
            status: Set(enrollment.status.as_str().to_string()),
            created_at: Set(codec::stamp(enrollment.created_at)),
            updated_at: Set(codec::stamp(enrollment.updated_at)),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if codec::is_unique_violation(&e) {
                BenefitError::AlreadyEnrolled {
                    employee: enrollment.employee_id,
                    plan: enrollment.plan_id,
                }
            } else {
                BenefitError::Database(e)
            }
        })?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            employee_id = %enrollment.employee_id,
            plan_id = %enrollment.plan_id,
            "enrollment requested"
        );
        Ok(enrollment)
    }

    /// Lists enrollments, optionally for one employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list_enrollments(
        &self,
        tenant_id: TenantId,
        employee_id: Option<EmployeeId>,
    ) -> Result<Vec<Enrollment>, BenefitError> {
        let mut query = enrollments::Entity::find()
            .filter(enrollments::Column::TenantId.eq(tenant_id.into_inner()));
        if let Some(employee_id) = employee_id {
            query = query.filter(enrollments::Column::EmployeeId.eq(employee_id.into_inner()));
        }
        query
            .order_by_asc(enrollments::Column::EffectiveFrom)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode_enrollment)
            .collect()
    }

    /// Moves an enrollment to a new status.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentNotFound` or `Lifecycle(InvalidTransition)`.
    pub async fn transition_enrollment(
        &self,
        tenant_id: TenantId,
        id: EnrollmentId,
        next: EnrollmentStatus,
    ) -> Result<Enrollment, BenefitError> {
        let model = enrollments::Entity::find_by_id(id.into_inner())
            .filter(enrollments::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BenefitError::EnrollmentNotFound(id))?;
        let mut enrollment = decode_enrollment(model)?;
        transition(&mut enrollment, next, Utc::now())?;

        enrollments::ActiveModel {
            id: Set(id.into_inner()),
            status: Set(enrollment.status.as_str().to_string()),
            updated_at: Set(codec::stamp(enrollment.updated_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        tracing::info!(enrollment_id = %id, status = %enrollment.status, "enrollment status changed");
        Ok(enrollment)
    }
}

fn decode_plan(model: benefit_plans::Model) -> Result<BenefitPlan, BenefitError> {
    let row = RowDecoder::new("benefit_plans", model.id);
    Ok(BenefitPlan {
        id: BenefitPlanId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        name: model.name,
        benefit_type: row.parse("benefit_type", &model.benefit_type, BenefitType::parse)?,
        provider: model.provider,
        coverage: row.json("coverage", model.coverage)?,
        is_active: model.is_active,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}

fn decode_enrollment(model: enrollments::Model) -> Result<Enrollment, BenefitError> {
    let row = RowDecoder::new("enrollments", model.id);
    Ok(Enrollment {
        id: EnrollmentId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        plan_id: BenefitPlanId::from_uuid(model.plan_id),
        effective_from: model.effective_from,
        status: row.parse("status", &model.status, EnrollmentStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
