use std::collections::HashSet;

use thiserror::Error;

use storefront_core::CustomerId;

use crate::{JwtClaims, Permission, Role, permissions_for_roles};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub customer_id: CustomerId,
    pub roles: Vec<Role>,
    pub admin: bool,
    pub permissions: Vec<Permission>,
}

impl Principal {
    /// Resolve a principal from verified claims.
    ///
    /// The provider's `admin` claim is folded into the role list so the
    /// policy only has to look at roles.
    pub fn from_claims(claims: &JwtClaims) -> Self {
        let mut roles = claims.roles.clone();
        if claims.admin && !roles.iter().any(Role::is_admin) {
            roles.push(Role::new(Role::ADMIN));
        }
        let permissions = permissions_for_roles(&roles);

        Self {
            customer_id: claims.sub,
            admin: claims.is_admin(),
            roles,
            permissions,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Check that a principal holds `required`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}
