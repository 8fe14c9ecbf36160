//! Tenant repository for database operations.

use chrono::Utc;
use hrm_core::directory::{DirectoryError, NewTenant, Tenant};
use hrm_shared::AppError;
use hrm_shared::types::TenantId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::domain_into_app;
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::tenants;

/// Error types for tenant operations.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    /// Slug is already taken.
    #[error("Tenant slug '{0}' already exists")]
    DuplicateSlug(String),

    /// Tenant not found.
    #[error("Tenant not found: {0}")]
    NotFound(TenantId),

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

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::DuplicateSlug(_) => Self::Conflict(err.to_string()),
            TenantError::NotFound(_) => Self::NotFound(err.to_string()),
            TenantError::Directory(e) => domain_into_app!(e),
            TenantError::Corrupt(e) => Self::Internal(e.to_string()),
            TenantError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Tenant repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and inserts a tenant.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSlug` if the slug is taken, or a validation error.
    pub async fn create(&self, input: NewTenant) -> Result<Tenant, TenantError> {
        let tenant = Tenant::create(input, Utc::now())?;

        let model = tenants::ActiveModel {
            id: Set(tenant.id.into_inner()),
            name: Set(tenant.name.clone()),
            slug: Set(tenant.slug.clone()),
            domain: Set(tenant.domain.clone()),
            settings: Set(codec::to_json(&tenant.settings)?),
            subscription: Set(codec::to_json(&tenant.subscription)?),
            is_active: Set(tenant.is_active),
            created_at: Set(codec::stamp(tenant.created_at)),
            updated_at: Set(codec::stamp(tenant.updated_at)),
        };

        model.insert(&self.db).await.map_err(|e| {
            if codec::is_unique_violation(&e) {
                TenantError::DuplicateSlug(tenant.slug.clone())
            } else {
                TenantError::Database(e)
            }
        })?;

        tracing::info!(tenant_id = %tenant.id, slug = %tenant.slug, "tenant created");
        Ok(tenant)
    }

    /// Finds a tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn find_by_id(&self, id: TenantId) -> Result<Option<Tenant>, TenantError> {
        tenants::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Finds a tenant by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, TenantError> {
        tenants::Entity::find()
            .filter(tenants::Column::Slug.eq(slug.trim().to_lowercase()))
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Fetches a tenant, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such tenant.
    pub async fn get(&self, id: TenantId) -> Result<Tenant, TenantError> {
        self.find_by_id(id).await?.ok_or(TenantError::NotFound(id))
    }

    /// Lists all tenants by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is corrupt.
    pub async fn list(&self) -> Result<Vec<Tenant>, TenantError> {
        tenants::Entity::find()
            .order_by_asc(tenants::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

fn decode(model: tenants::Model) -> Result<Tenant, TenantError> {
    let row = RowDecoder::new("tenants", model.id);
    Ok(Tenant {
        id: TenantId::from_uuid(model.id),
        name: model.name,
        slug: model.slug,
        domain: model.domain,
        settings: row.json("settings", model.settings)?,
        subscription: row.json("subscription", model.subscription)?,
        is_active: model.is_active,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
