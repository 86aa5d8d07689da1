use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::permissions::{self, Permission};

/// Role identifier used for RBAC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const CUSTOMER: &'static str = "customer";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static role → permission policy.
///
/// Every signed-in user is a customer. "admin" grants everything.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(Role::is_admin) {
        return vec![Permission::new("*")];
    }

    vec![
        permissions::CATALOG_READ,
        permissions::CART_QUOTE,
        permissions::ORDERS_READ_OWN,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_grants_wildcard() {
        let perms = permissions_for_roles(&[Role::new("customer"), Role::new("admin")]);
        assert_eq!(perms.len(), 1);
        assert!(perms[0].is_wildcard());
    }

    #[test]
    fn anyone_else_is_a_customer() {
        let perms = permissions_for_roles(&[]);
        assert!(perms.contains(&permissions::ORDERS_READ_OWN));
        assert!(!perms.contains(&permissions::ADMIN_ORDERS_WRITE));
    }
}
