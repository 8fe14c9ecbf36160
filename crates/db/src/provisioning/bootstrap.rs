//! Super-admin bootstrap.

use chrono::{Duration, Utc};
use hrm_core::auth::{UserRole, hash_password_with_cost};
use hrm_core::directory::{
    Feature, NewTenant, Subscription, SubscriptionPlan, Tenant, TenantSettings,
};
use hrm_shared::config::BootstrapConfig;
use hrm_shared::types::{TenantId, UserId};
use sea_orm::DatabaseConnection;

use super::ProvisionError;
use crate::repositories::{NewUser, TenantError, TenantRepository, UserError, UserRepository};

/// The system tenant never lapses in practice.
const SYSTEM_SUBSCRIPTION_YEARS: i64 = 100;

/// What the bootstrap found or created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// The system tenant.
    pub tenant_id: TenantId,
    /// The super-admin account.
    pub user_id: UserId,
    /// Super-admin login.
    pub email: String,
    /// True if this run created the system tenant.
    pub tenant_created: bool,
    /// True if this run created the super-admin.
    pub user_created: bool,
}

/// Ensures the system tenant and its super-admin exist.
///
/// Running it again finds both and changes nothing. The system tenant holds
/// at most one super-admin: an existing one is kept even when the configured
/// admin email has since changed.
///
/// # Errors
///
/// Returns a `ProvisionError` if a lookup or insert fails, or hashing fails.
pub async fn ensure_super_admin(
    db: &DatabaseConnection,
    config: &BootstrapConfig,
) -> Result<BootstrapOutcome, ProvisionError> {
    let (tenant, tenant_created) = ensure_system_tenant(db, config).await?;
    let users = UserRepository::new(db.clone());

    if let Some(user) = users
        .find_first_with_role(tenant.id, UserRole::SuperAdmin)
        .await?
    {
        if !user.email.eq_ignore_ascii_case(config.admin_email.trim()) {
            tracing::warn!(
                existing = %user.email,
                configured = %config.admin_email,
                "super-admin exists under a different email, keeping it"
            );
        }
        tracing::info!(email = %user.email, "super-admin already exists, skipping");
        return Ok(BootstrapOutcome {
            tenant_id: tenant.id,
            user_id: user.id,
            email: user.email,
            tenant_created,
            user_created: false,
        });
    }

    let password_hash = hash_password_with_cost(&config.admin_password, config.hash_cost)?;
    let input = NewUser {
        email: config.admin_email.clone(),
        password_hash,
        full_name: "Super Admin".to_string(),
        role: UserRole::SuperAdmin,
    };

    let (user, user_created) = match users.create(tenant.id, input).await {
        Ok(user) => (user, true),
        Err(UserError::DuplicateEmail(email)) => {
            let user = users
                .find_by_email(tenant.id, &email)
                .await?
                .ok_or(ProvisionError::DuplicateKey(email))?;
            (user, false)
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(email = %user.email, created = user_created, "super-admin ensured");
    Ok(BootstrapOutcome {
        tenant_id: tenant.id,
        user_id: user.id,
        email: user.email,
        tenant_created,
        user_created,
    })
}

async fn ensure_system_tenant(
    db: &DatabaseConnection,
    config: &BootstrapConfig,
) -> Result<(Tenant, bool), ProvisionError> {
    let tenants = TenantRepository::new(db.clone());
    if let Some(tenant) = tenants.find_by_slug(&config.system_tenant_slug).await? {
        tracing::info!(slug = %tenant.slug, "system tenant already exists, skipping");
        return Ok((tenant, false));
    }

    let input = NewTenant {
        name: config.system_tenant_name.clone(),
        slug: config.system_tenant_slug.clone(),
        domain: None,
        settings: TenantSettings::default(),
        subscription: Subscription {
            plan: SubscriptionPlan::Enterprise,
            max_employees: 0,
            features: Feature::ALL.into_iter().collect(),
            expires_at: Utc::now() + Duration::days(365 * SYSTEM_SUBSCRIPTION_YEARS),
        },
    };

    match tenants.create(input).await {
        Ok(tenant) => Ok((tenant, true)),
        Err(TenantError::DuplicateSlug(slug)) => tenants
            .find_by_slug(&slug)
            .await?
            .map(|tenant| (tenant, false))
            .ok_or(ProvisionError::DuplicateKey(slug)),
        Err(e) => Err(e.into()),
    }
}
