//! Authorization policy for console handlers.
//!
//! Every console route requires organization-admin capability. The decision
//! is a pure function of (config, caller) so it can be tested without IO.

use crate::config::Config;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

/// Require organization-admin capability for the caller's organization.
///
/// Grants access when the token carries the `admin` or `owner` role, or when
/// the caller's email is on the platform-admin allowlist.
pub fn require_org_admin(config: &Config, auth: &AuthUser) -> PolicyResult<()> {
    if config.is_platform_admin_email(&auth.email) {
        return Ok(());
    }

    if auth.roles.iter().any(|r| r == "admin" || r == "owner") {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "Organization admin required".to_string(),
    ))
}
