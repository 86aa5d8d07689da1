//! Order total aggregation in integer minor units.

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Money};

use crate::line_item::LineItem;

/// Result of pricing a set of line items plus shipping.
///
/// Invariant: `total == subtotal + shipping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    /// Amount saved through discount prices (already reflected in `subtotal`).
    pub discount: Money,
    pub shipping: Money,
    pub total: Money,
    /// Sum of quantities across all lines.
    pub item_count: i64,
}

/// Price a set of line items and add shipping.
///
/// Each line contributes `effective_unit_price * quantity`. Lines with a
/// non-positive quantity or a negative price are rejected with
/// `InvalidLineItem`, as is any arithmetic overflow.
pub fn compute_totals(items: &[LineItem], shipping: Money) -> DomainResult<OrderTotals> {
    if shipping.is_negative() {
        return Err(DomainError::validation("shipping price must not be negative"));
    }

    let mut subtotal = Money::ZERO;
    let mut discount = Money::ZERO;
    let mut item_count: i64 = 0;

    for (index, item) in items.iter().enumerate() {
        let line = line_total(index, item)?;

        subtotal = subtotal
            .checked_add(line)
            .ok_or_else(|| DomainError::invalid_line_item(index, "subtotal overflows"))?;

        item_count = item_count
            .checked_add(item.quantity)
            .ok_or_else(|| DomainError::invalid_line_item(index, "item count overflows"))?;

        let effective = item.effective_unit_price();
        if effective < item.unit_price {
            let saved = item
                .unit_price
                .checked_sub(effective)
                .and_then(|d| d.checked_mul(item.quantity))
                .ok_or_else(|| DomainError::invalid_line_item(index, "discount overflows"))?;
            discount = discount
                .checked_add(saved)
                .ok_or_else(|| DomainError::invalid_line_item(index, "discount overflows"))?;
        }
    }

    // Shipping can only overflow on top of at least one line; blame the last.
    let total = subtotal.checked_add(shipping).ok_or_else(|| {
        DomainError::invalid_line_item(items.len().saturating_sub(1), "order total overflows")
    })?;

    Ok(OrderTotals {
        subtotal,
        discount,
        shipping,
        total,
        item_count,
    })
}

fn line_total(index: usize, item: &LineItem) -> DomainResult<Money> {
    if item.quantity <= 0 {
        return Err(DomainError::invalid_line_item(index, "quantity must be at least 1"));
    }
    if item.unit_price.is_negative() {
        return Err(DomainError::invalid_line_item(index, "unit price must not be negative"));
    }
    if item.discount_price.is_some_and(Money::is_negative) {
        return Err(DomainError::invalid_line_item(index, "discount price must not be negative"));
    }

    item.effective_unit_price()
        .checked_mul(item.quantity)
        .ok_or_else(|| DomainError::invalid_line_item(index, "line total overflows"))
}
