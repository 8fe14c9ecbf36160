//! Department repository for database operations.

use chrono::Utc;
use hrm_core::directory::department::normalize_code;
use hrm_core::directory::{Department, DepartmentStatus, DirectoryError, NewDepartment};
use hrm_shared::AppError;
use hrm_shared::types::{DepartmentId, TenantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{domain_into_app, tenant_exists};
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::departments;

/// Error types for department operations.
#[derive(Debug, thiserror::Error)]
pub enum DepartmentError {
    /// Code already used in this tenant.
    #[error("Department code '{0}' already exists")]
    DuplicateCode(String),

    /// Owning tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// Department not found.
    #[error("Department not found: {0}")]
    NotFound(DepartmentId),

    /// Input failed validation.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Stored row could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] CorruptRow),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DepartmentError> for AppError {
    fn from(err: DepartmentError) -> Self {
        match err {
            DepartmentError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            DepartmentError::TenantNotFound(_) | DepartmentError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            DepartmentError::Directory(e) => domain_into_app!(e),
            DepartmentError::Corrupt(e) => Self::Internal(e.to_string()),
            DepartmentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Department repository.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new department repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a department in a tenant.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound`, `DuplicateCode` or a validation error.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: NewDepartment,
    ) -> Result<Department, DepartmentError> {
        if !tenant_exists(&self.db, tenant_id).await? {
            return Err(DepartmentError::TenantNotFound(tenant_id));
        }
        let department = Department::create(tenant_id, input, Utc::now())?;

        let model = departments::ActiveModel {
            id: Set(department.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(department.name.clone()),
            code: Set(department.code.clone()),
            description: Set(department.description.clone()),
            status: Set(department.status.as_str().to_string()),
            created_at: Set(codec::stamp(department.created_at)),
            updated_at: Set(codec::stamp(department.updated_at)),
        };
        model.insert(&self.db).await.map_err(|e| {
            if codec::is_unique_violation(&e) {
                DepartmentError::DuplicateCode(department.code.clone())
            } else {
                DepartmentError::Database(e)
            }
        })?;

        Ok(department)
    }

    /// Finds a department by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn find(
        &self,
        tenant_id: TenantId,
        id: DepartmentId,
    ) -> Result<Option<Department>, DepartmentError> {
        departments::Entity::find_by_id(id.into_inner())
            .filter(departments::Column::TenantId.eq(tenant_id.into_inner()))
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Finds a department by its code within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is blank or the query fails.
    pub async fn find_by_code(
        &self,
        tenant_id: TenantId,
        code: &str,
    ) -> Result<Option<Department>, DepartmentError> {
        departments::Entity::find()
            .filter(departments::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(departments::Column::Code.eq(normalize_code(code)?))
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Lists a tenant's departments by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<Department>, DepartmentError> {
        departments::Entity::find()
            .filter(departments::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(departments::Column::Code)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

fn decode(model: departments::Model) -> Result<Department, DepartmentError> {
    let row = RowDecoder::new("departments", model.id);
    Ok(Department {
        id: DepartmentId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        name: model.name,
        code: model.code,
        description: model.description,
        status: row.parse("status", &model.status, DepartmentStatus::parse)?,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
