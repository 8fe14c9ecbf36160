//! Onboarding and offboarding case repositories.

use chrono::Utc;
use hrm_core::workflow::{
    CaseStatus, LifecycleError, NewOffboardingCase, NewOnboardingCase, OffboardingCase,
    OnboardingCase, RecordError, SeparationReason, transition,
};
use hrm_shared::AppError;
use hrm_shared::types::{EmployeeId, OffboardingCaseId, OnboardingCaseId, TenantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{domain_into_app, employee_exists};
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::{offboarding_cases, onboarding_cases};

/// Error types for onboarding and offboarding operations.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    /// Case not found.
    #[error("{kind} case not found: {id}")]
    NotFound {
        /// `onboarding` or `offboarding`.
        kind: &'static str,
        /// Case ID.
        id: uuid::Uuid,
    },

    /// The employee already has a case of this kind.
    #[error("Employee {0} already has an open case")]
    DuplicateCase(EmployeeId),

    /// Referenced employee is not part of the tenant.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// Input failed validation.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Progress or status change refused.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Stored row could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] CorruptRow),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OnboardingError> for AppError {
    fn from(err: OnboardingError) -> Self {
        match err {
            OnboardingError::NotFound { .. } | OnboardingError::EmployeeNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            OnboardingError::DuplicateCase(_) => Self::Conflict(err.to_string()),
            OnboardingError::Record(e) => domain_into_app!(e),
            OnboardingError::Lifecycle(e) => domain_into_app!(e),
            OnboardingError::Corrupt(e) => Self::Internal(e.to_string()),
            OnboardingError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

fn duplicate_or(employee_id: EmployeeId) -> impl FnOnce(DbErr) -> OnboardingError {
    move |e| {
        if codec::is_unique_violation(&e) {
            OnboardingError::DuplicateCase(employee_id)
        } else {
            OnboardingError::Database(e)
        }
    }
}

/// Onboarding case repository.
#[derive(Debug, Clone)]
pub struct OnboardingRepository {
    db: DatabaseConnection,
}

impl OnboardingRepository {
    /// Creates a new onboarding repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a pending case for a joiner.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` for an unknown joiner or buddy, and
    /// `DuplicateCase` if the joiner already has one.
    pub async fn open(
        &self,
        tenant_id: TenantId,
        input: NewOnboardingCase,
    ) -> Result<OnboardingCase, OnboardingError> {
        for employee_id in std::iter::once(input.employee_id).chain(input.buddy_id) {
            if !employee_exists(&self.db, tenant_id, employee_id).await? {
                return Err(OnboardingError::EmployeeNotFound(employee_id));
            }
        }
        let case = OnboardingCase::open(tenant_id, input, Utc::now())?;

        onboarding_cases::ActiveModel {
            id: Set(case.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(case.employee_id.into_inner()),
            position: Set(case.position.clone()),
            start_date: Set(case.start_date),
            buddy_id: Set(case.buddy_id.map(EmployeeId::into_inner)),
            progress: Set(i16::from(case.progress)),
            status: Set(case.status.as_str().to_string()),
            created_at: Set(codec::stamp(case.created_at)),
            updated_at: Set(codec::stamp(case.updated_at)),
        }
        .insert(&self.db)
        .await
        .map_err(duplicate_or(case.employee_id))?;

        tracing::info!(case_id = %case.id, employee_id = %case.employee_id, "onboarding case opened");
        Ok(case)
    }

    /// Finds a case by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: OnboardingCaseId,
    ) -> Result<Option<OnboardingCase>, OnboardingError> {
        onboarding_cases::Entity::find_by_id(id.into_inner())
            .filter(onboarding_cases::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .map(decode_onboarding)
            .transpose()
    }

    /// Lists a tenant's cases by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<OnboardingCase>, OnboardingError> {
        onboarding_cases::Entity::find()
            .filter(onboarding_cases::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(onboarding_cases::Column::StartDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode_onboarding)
            .collect()
    }

    /// Moves progress forward.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `Lifecycle` progress error.
    pub async fn update_progress(
        &self,
        tenant_id: TenantId,
        id: OnboardingCaseId,
        progress: u8,
    ) -> Result<OnboardingCase, OnboardingError> {
        let mut case = self.get(tenant_id, id).await?;
        case.update_progress(progress, Utc::now())?;
        self.save(&case).await?;
        Ok(case)
    }

    /// Moves the case to a new status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidTransition` or `IncompleteProgress`.
    pub async fn transition(
        &self,
        tenant_id: TenantId,
        id: OnboardingCaseId,
        next: CaseStatus,
    ) -> Result<OnboardingCase, OnboardingError> {
        let mut case = self.get(tenant_id, id).await?;
        transition(&mut case, next, Utc::now())?;
        self.save(&case).await?;
        tracing::info!(case_id = %id, status = %case.status, "onboarding status changed");
        Ok(case)
    }

    async fn get(
        &self,
        tenant_id: TenantId,
        id: OnboardingCaseId,
    ) -> Result<OnboardingCase, OnboardingError> {
        self.find(tenant_id, id)
            .await?
            .ok_or(OnboardingError::NotFound {
                kind: "Onboarding",
                id: id.into_inner(),
            })
    }

    async fn save(&self, case: &OnboardingCase) -> Result<(), DbErr> {
        onboarding_cases::ActiveModel {
            id: Set(case.id.into_inner()),
            progress: Set(i16::from(case.progress)),
            status: Set(case.status.as_str().to_string()),
            updated_at: Set(codec::stamp(case.updated_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(())
    }
}

/// Offboarding case repository.
#[derive(Debug, Clone)]
pub struct OffboardingRepository {
    db: DatabaseConnection,
}

impl OffboardingRepository {
    /// Creates a new offboarding repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a pending case for a leaver.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` or `DuplicateCase`.
    pub async fn open(
        &self,
        tenant_id: TenantId,
        input: NewOffboardingCase,
    ) -> Result<OffboardingCase, OnboardingError> {
        if !employee_exists(&self.db, tenant_id, input.employee_id).await? {
            return Err(OnboardingError::EmployeeNotFound(input.employee_id));
        }
        let case = OffboardingCase::open(tenant_id, input, Utc::now())?;

        offboarding_cases::ActiveModel {
            id: Set(case.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(case.employee_id.into_inner()),
            position: Set(case.position.clone()),
            last_working_day: Set(case.last_working_day),
            reason: Set(case.reason.as_str().to_string()),
            clearance: Set(codec::to_json(&case.clearance)?),
            progress: Set(i16::from(case.progress)),
            status: Set(case.status.as_str().to_string()),
            created_at: Set(codec::stamp(case.created_at)),
            updated_at: Set(codec::stamp(case.updated_at)),
        }
        .insert(&self.db)
        .await
        .map_err(duplicate_or(case.employee_id))?;

        tracing::info!(case_id = %case.id, employee_id = %case.employee_id, "offboarding case opened");
        Ok(case)
    }

    /// Finds a case by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: OffboardingCaseId,
    ) -> Result<Option<OffboardingCase>, OnboardingError> {
        offboarding_cases::Entity::find_by_id(id.into_inner())
            .filter(offboarding_cases::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .map(decode_offboarding)
            .transpose()
    }

    /// Lists a tenant's cases by last working day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row does not decode.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<OffboardingCase>, OnboardingError> {
        offboarding_cases::Entity::find()
            .filter(offboarding_cases::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(offboarding_cases::Column::LastWorkingDay)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode_offboarding)
            .collect()
    }

    /// Moves progress forward.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a `Lifecycle` progress error.
    pub async fn update_progress(
        &self,
        tenant_id: TenantId,
        id: OffboardingCaseId,
        progress: u8,
    ) -> Result<OffboardingCase, OnboardingError> {
        let mut case = self.get(tenant_id, id).await?;
        case.update_progress(progress, Utc::now())?;
        self.save(&case).await?;
        Ok(case)
    }

    /// Marks a checklist item cleared.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Record(UnknownClearanceItem)`.
    pub async fn clear_item(
        &self,
        tenant_id: TenantId,
        id: OffboardingCaseId,
        item: &str,
    ) -> Result<OffboardingCase, OnboardingError> {
        let mut case = self.get(tenant_id, id).await?;
        case.clear_item(item, Utc::now())?;
        self.save(&case).await?;
        tracing::info!(
            case_id = %id,
            item = item.trim(),
            pending = case.pending_clearance(),
            "clearance item cleared"
        );
        Ok(case)
    }

    /// Moves the case to a new status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidTransition`, `IncompleteProgress` or
    /// `ClearancePending`.
    pub async fn transition(
        &self,
        tenant_id: TenantId,
        id: OffboardingCaseId,
        next: CaseStatus,
    ) -> Result<OffboardingCase, OnboardingError> {
        let mut case = self.get(tenant_id, id).await?;
        transition(&mut case, next, Utc::now())?;
        self.save(&case).await?;
        tracing::info!(case_id = %id, status = %case.status, "offboarding status changed");
        Ok(case)
    }

    async fn get(
        &self,
        tenant_id: TenantId,
        id: OffboardingCaseId,
    ) -> Result<OffboardingCase, OnboardingError> {
        self.find(tenant_id, id)
            .await?
            .ok_or(OnboardingError::NotFound {
                kind: "Offboarding",
                id: id.into_inner(),
            })
    }

    async fn save(&self, case: &OffboardingCase) -> Result<(), DbErr> {
        offboarding_cases::ActiveModel {
            id: Set(case.id.into_inner()),
            clearance: Set(codec::to_json(&case.clearance)?),
            progress: Set(i16::from(case.progress)),
            status: Set(case.status.as_str().to_string()),
            updated_at: Set(codec::stamp(case.updated_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await?;
        Ok(())
    }
}

fn decode_onboarding(model: onboarding_cases::Model) -> Result<OnboardingCase, OnboardingError> {
    let row = RowDecoder::new("onboarding_cases", model.id);
    Ok(OnboardingCase {
        id: OnboardingCaseId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        position: model.position,
        start_date: model.start_date,
        buddy_id: model.buddy_id.map(EmployeeId::from_uuid),
        progress: row.progress(model.progress)?,
        status: row.parse("status", &model.status, CaseStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}

fn decode_offboarding(model: offboarding_cases::Model) -> Result<OffboardingCase, OnboardingError> {
    let row = RowDecoder::new("offboarding_cases", model.id);
    Ok(OffboardingCase {
        id: OffboardingCaseId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        position: model.position,
        last_working_day: model.last_working_day,
        reason: row.parse("reason", &model.reason, SeparationReason::parse)?,
        clearance: row.json("clearance", model.clearance)?,
        progress: row.progress(model.progress)?,
        status: row.parse("status", &model.status, CaseStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
