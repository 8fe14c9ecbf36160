//! Departments within a tenant.

use chrono::{DateTime, Utc};
use hrm_shared::types::{DepartmentId, TenantId};
use serde::{Deserialize, Serialize};

use super::error::{DirectoryError, require};

/// Department status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentStatus {
    /// Accepting employees.
    #[default]
    Active,
    /// Kept for history.
    Inactive,
}

impl DepartmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department ID.
    pub id: DepartmentId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Short code, unique within the tenant (e.g. `ENG`).
    pub code: String,
    /// Optional description.
    pub description: Option<String>,
    /// Status.
    pub status: DepartmentStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
    /// Display name.
    pub name: String,
    /// Short code; uppercased on create.
    pub code: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Department {
    /// Validates the input and builds an active department.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::BlankField` for an empty name or code.
    pub fn create(
        tenant_id: TenantId,
        input: NewDepartment,
        now: DateTime<Utc>,
    ) -> Result<Self, DirectoryError> {
        Ok(Self {
            id: DepartmentId::new(),
            tenant_id,
            name: require("name", &input.name)?,
            code: normalize_code(&input.code)?,
            description: input.description.filter(|d| !d.trim().is_empty()),
            status: DepartmentStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Trims and uppercases a department code.
///
/// # Errors
///
/// Returns `DirectoryError::BlankField` for an empty code.
pub fn normalize_code(raw: &str) -> Result<String, DirectoryError> {
    Ok(require("code", raw)?.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_uppercases_code() {
        let dept = Department::create(
            TenantId::new(),
            NewDepartment {
                name: "Engineering".into(),
                code: " eng ".into(),
                description: Some("  ".into()),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(dept.code, "ENG");
        assert_eq!(dept.description, None);
        assert_eq!(dept.status, DepartmentStatus::Active);
    }

    #[test]
    fn test_blank_code_rejected() {
        let result = Department::create(
            TenantId::new(),
            NewDepartment {
                name: "Finance".into(),
                code: String::new(),
                description: None,
            },
            Utc::now(),
        );
        assert_eq!(result, Err(DirectoryError::BlankField("code")));
    }
}
