use storefront_auth::{Principal, Role};
use storefront_core::CustomerId;
use storefront_orders::Actor;

/// Authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn customer_id(&self) -> CustomerId {
        self.principal.customer_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.principal.roles
    }

    pub fn is_admin(&self) -> bool {
        self.principal.admin
    }

    /// The caller as seen by the order lifecycle.
    pub fn actor(&self) -> Actor {
        if self.is_admin() {
            Actor::admin(self.customer_id())
        } else {
            Actor::customer(self.customer_id())
        }
    }
}
