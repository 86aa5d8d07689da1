use serde::{Deserialize, Serialize};

use storefront_core::{Money, ProductId};

/// A single purchased product line as stored on the order document.
///
/// `quantity` is signed on purpose: documents come from an external store and
/// the aggregator is the place that rejects malformed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub unit_price: Money,
    #[serde(default)]
    pub discount_price: Option<Money>,
    pub quantity: i64,
    /// Variant label (e.g. size or color) chosen at checkout.
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub sku_variant: Option<String>,
}

impl LineItem {
    pub fn new(product_id: ProductId, name: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        Self {
            product_id,
            name: name.into(),
            image: None,
            unit_price,
            discount_price: None,
            quantity,
            variant: None,
            sku_variant: None,
        }
    }

    pub fn with_discount(mut self, discount_price: Money) -> Self {
        self.discount_price = Some(discount_price);
        self
    }

    /// Discount price when set, product price otherwise.
    pub fn effective_unit_price(&self) -> Money {
        self.discount_price.unwrap_or(self.unit_price)
    }
}
