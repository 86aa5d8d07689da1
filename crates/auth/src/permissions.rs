use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "admin.orders.write").
/// A special wildcard permission `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const CATALOG_READ: Permission = Permission::from_static("catalog.read");
pub const CART_QUOTE: Permission = Permission::from_static("cart.quote");
pub const ORDERS_READ_OWN: Permission = Permission::from_static("orders.read_own");
pub const ADMIN_ORDERS_READ: Permission = Permission::from_static("admin.orders.read");
pub const ADMIN_ORDERS_WRITE: Permission = Permission::from_static("admin.orders.write");
pub const ADMIN_CUSTOMERS_READ: Permission = Permission::from_static("admin.customers.read");
pub const ADMIN_REFERENCE_REFRESH: Permission = Permission::from_static("admin.reference.refresh");
