/// Authorization checks for admin-only operations.
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, AdminCapability};
///
/// Actor::new(user.user_id, user.is_admin)
///     .can(AdminCapability::ModerateReports)
///     .check(&deps)
///     .await?;
/// ```
///
/// Handlers run the check before calling into a domain action, so domain
/// code receives an actor that is already known to be an admin.
mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder, HasAuthContext};
pub use capability::AdminCapability;
pub use errors::AuthError;
