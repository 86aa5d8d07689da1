use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Money};

/// Shipping settings (`settings/shipping` document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    pub standard_price: Money,
    /// Subtotal from which shipping is free. `None` disables free shipping.
    #[serde(default)]
    pub free_shipping_threshold: Option<Money>,
}

impl ShippingConfig {
    /// Shipping price for a cart with the given subtotal.
    pub fn price_for(&self, subtotal: Money) -> Money {
        match self.free_shipping_threshold {
            Some(threshold) if subtotal >= threshold => Money::ZERO,
            _ => self.standard_price,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.standard_price.is_negative() {
            return Err(DomainError::validation("standard shipping price must not be negative"));
        }
        if self.free_shipping_threshold.is_some_and(Money::is_negative) {
            return Err(DomainError::validation("free shipping threshold must not be negative"));
        }
        Ok(())
    }
}
