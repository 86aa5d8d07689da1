//! API-side authorization guard.
//!
//! Checked in the handler before any store access, keeping the domain crates
//! auth-agnostic.

use storefront_auth::{AuthzError, Permission, authorize};

use crate::context::PrincipalContext;

/// Require `permission` for the current caller.
pub fn require(principal: &PrincipalContext, permission: &Permission) -> Result<(), AuthzError> {
    authorize(principal.principal(), permission).inspect_err(|_| {
        tracing::info!(
            customer_id = %principal.customer_id(),
            permission = %permission,
            "permission denied"
        );
    })
}
