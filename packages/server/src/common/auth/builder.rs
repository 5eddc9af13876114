use super::{AdminCapability, AuthError};
use crate::common::entity_ids::UserId;
use sqlx::PgPool;
use tracing::debug;

/// Entry point for authorization checks
///
/// Usage:
/// ```rust,ignore
/// Actor::new(actor_id, is_admin)
///     .can(AdminCapability::ModerateReports)
///     .check(&deps)
///     .await?;
/// ```
pub struct Actor {
    actor_id: UserId,
    is_admin: bool,
}

impl Actor {
    /// `is_admin` is the claim carried by the already-verified JWT.
    pub fn new(actor_id: UserId, is_admin: bool) -> Self {
        Self { actor_id, is_admin }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: AdminCapability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor_id: self.actor_id,
            is_admin: self.is_admin,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor_id: UserId,
    is_admin: bool,
    capability: AdminCapability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    pub async fn check<D>(self, deps: &D) -> Result<(), AuthError>
    where
        D: HasAuthContext,
    {
        check_admin_permission(self.actor_id, self.is_admin, self.capability, deps).await
    }
}

/// Trait for dependencies that can perform auth checks
pub trait HasAuthContext: Send + Sync {
    fn auth_pool(&self) -> &PgPool;
}

/// The JWT claim is checked first so non-admins never cost a query. Admins
/// are then re-checked against `users.role`: tokens live for 24 hours and a
/// demotion must take effect before that.
async fn check_admin_permission<D>(
    actor_id: UserId,
    is_admin: bool,
    capability: AdminCapability,
    deps: &D,
) -> Result<(), AuthError>
where
    D: HasAuthContext,
{
    if !is_admin {
        return Err(AuthError::AdminRequired);
    }

    let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(actor_id)
        .fetch_optional(deps.auth_pool())
        .await?;

    match role.as_deref() {
        Some("admin") => {
            debug!(actor_id = %actor_id, capability = capability.as_str(), "admin check passed");
            Ok(())
        }
        Some(_) => Err(AuthError::AdminRequired),
        None => Err(AuthError::PermissionDenied(format!(
            "unknown user {}",
            actor_id
        ))),
    }
}
