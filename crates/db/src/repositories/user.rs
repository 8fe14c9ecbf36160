//! User repository: tenant-scoped login accounts.

use chrono::{DateTime, Utc};
use hrm_core::auth::{Permission, UserRole};
use hrm_core::directory::DirectoryError;
use hrm_core::directory::error::validate_email;
use hrm_shared::AppError;
use hrm_shared::types::{TenantId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use super::{domain_into_app, tenant_exists};
use crate::codec::{self, CorruptRow, RowDecoder};
use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered in this tenant.
    #[error("User '{0}' already exists")]
    DuplicateEmail(String),

    /// Owning tenant does not exist.
    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

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

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
            UserError::TenantNotFound(_) => Self::NotFound(err.to_string()),
            UserError::Directory(e) => domain_into_app!(e),
            UserError::Corrupt(e) => Self::Internal(e.to_string()),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A login account. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Login email, lowercase.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Role.
    pub role: UserRole,
    /// Granted permissions.
    pub permissions: Vec<Permission>,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Role; permissions default from it.
    pub role: UserRole,
}

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a user with the role's default permissions.
    ///
    /// # Errors
    ///
    /// Returns `TenantNotFound`, `DuplicateEmail` or an invalid email error.
    pub async fn create(&self, tenant_id: TenantId, input: NewUser) -> Result<User, UserError> {
        if !tenant_exists(&self.db, tenant_id).await? {
            return Err(UserError::TenantNotFound(tenant_id));
        }
        let email = validate_email(&input.email)?;
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            tenant_id,
            email,
            full_name: input.full_name.trim().to_string(),
            role: input.role,
            permissions: input.role.default_permissions(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let model = users::ActiveModel {
            id: Set(user.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            email: Set(user.email.clone()),
            password_hash: Set(input.password_hash),
            full_name: Set(user.full_name.clone()),
            role: Set(user.role.as_str().to_string()),
            permissions: Set(codec::to_json(&user.permissions)?),
            is_active: Set(true),
            created_at: Set(codec::stamp(now)),
            updated_at: Set(codec::stamp(now)),
        };
        model.insert(&self.db).await.map_err(|e| {
            if codec::is_unique_violation(&e) {
                UserError::DuplicateEmail(user.email.clone())
            } else {
                UserError::Database(e)
            }
        })?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user created");
        Ok(user)
    }

    /// Finds a user by email within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<User>, UserError> {
        self.find_model(tenant_id, email)
            .await?
            .map(decode)
            .transpose()
    }

    /// Finds the oldest user holding `role` within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row does not decode.
    pub async fn find_first_with_role(
        &self,
        tenant_id: TenantId,
        role: UserRole,
    ) -> Result<Option<User>, UserError> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(users::Column::Role.eq(role.as_str()))
            .order_by_asc(users::Column::CreatedAt)
            .one(&self.db)
            .await?
            .map(decode)
            .transpose()
    }

    /// Counts users holding `role` within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_with_role(
        &self,
        tenant_id: TenantId,
        role: UserRole,
    ) -> Result<u64, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(users::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await?)
    }

    /// Returns the stored password hash for an active user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn password_hash(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<String>, UserError> {
        Ok(self
            .find_model(tenant_id, email)
            .await?
            .filter(|m| m.is_active)
            .map(|m| m.password_hash))
    }

    /// Counts users with the email across all tenants.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_by_email(&self, email: &str) -> Result<u64, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .count(&self.db)
            .await?)
    }

    async fn find_model(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }
}

fn decode(model: users::Model) -> Result<User, UserError> {
    let row = RowDecoder::new("users", model.id);
    Ok(User {
        id: UserId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        email: model.email,
        full_name: model.full_name,
        role: row.parse("role", &model.role, UserRole::parse)?,
        permissions: row.json("permissions", model.permissions)?,
        is_active: model.is_active,
        created_at: codec::utc(model.created_at),
        updated_at: codec::utc(model.updated_at),
    })
}
