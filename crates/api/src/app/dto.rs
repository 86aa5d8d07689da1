use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use storefront_catalog::{Category, ShippingConfig, Subcategory};
use storefront_core::{AggregateRoot, DomainError, DomainResult, Money};
use storefront_customers::{Address, Customer};
use storefront_orders::{LineItem, Order, OrderStatus, OrderTotals};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page_token: Option<String>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminOrderListParams {
    pub status: Option<String>,
    pub page_token: Option<String>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttachTrackingRequest {
    pub tracking_number: String,
}

#[derive(Debug, Deserialize)]
pub struct CartQuoteRequest {
    pub items: Vec<LineItem>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn money_to_json(m: Money) -> JsonValue {
    json!({ "minor": m.minor(), "display": m.to_string() })
}

pub fn totals_to_json(t: &OrderTotals) -> JsonValue {
    json!({
        "subtotal": money_to_json(t.subtotal),
        "discount": money_to_json(t.discount),
        "shipping": money_to_json(t.shipping),
        "total": money_to_json(t.total),
        "item_count": t.item_count,
    })
}

pub fn line_item_to_json(item: &LineItem) -> JsonValue {
    json!({
        "product_id": item.product_id.to_string(),
        "name": item.name,
        "image": item.image,
        "variant": item.variant,
        "sku_variant": item.sku_variant,
        "quantity": item.quantity,
        "unit_price": money_to_json(item.unit_price),
        "discount_price": item.discount_price.map(money_to_json),
    })
}

/// Totals of a stored order. Line items that cannot be priced mean the
/// document itself is bad.
fn stored_totals(order: &Order) -> DomainResult<OrderTotals> {
    order.totals().map_err(|e| match e {
        DomainError::InvalidLineItem { index, reason } => DomainError::schema_mismatch(
            "orders",
            format!("order {}: line item {index}: {reason}", order.id()),
        ),
        other => other,
    })
}

pub fn admin_order_to_json(order: &Order) -> DomainResult<JsonValue> {
    let totals = stored_totals(order)?;
    Ok(json!({
        "id": order.id().to_string(),
        "customer_id": order.customer_id().to_string(),
        "status": order.status().as_str(),
        "status_label": order.status().admin_label(),
        "allowed_next_statuses": order
            .status()
            .allowed_next()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>(),
        "tracking_number": order.tracking_number(),
        "items": order.items().iter().map(line_item_to_json).collect::<Vec<_>>(),
        "totals": totals_to_json(&totals),
        "shipping_address": order.shipping_address().map(address_to_json),
        "created_at": order.created_at().to_rfc3339(),
        "updated_at": order.updated_at().to_rfc3339(),
    }))
}

pub fn customer_order_to_json(order: &Order) -> DomainResult<JsonValue> {
    let totals = stored_totals(order)?;
    Ok(json!({
        "id": order.id().to_string(),
        "status": order.status().as_str(),
        "status_label": order.status().customer_label(),
        "tracking_number": order.tracking_number(),
        "items": order.items().iter().map(line_item_to_json).collect::<Vec<_>>(),
        "totals": totals_to_json(&totals),
        "shipping_address": order.shipping_address().map(address_to_json),
        "created_at": order.created_at().to_rfc3339(),
    }))
}

pub fn orders_page_to_json(
    orders: &[Order],
    next_page_token: Option<String>,
    to_json: fn(&Order) -> DomainResult<JsonValue>,
) -> DomainResult<JsonValue> {
    let items = orders.iter().map(to_json).collect::<DomainResult<Vec<_>>>()?;
    Ok(json!({ "items": items, "next_page_token": next_page_token }))
}

pub fn customer_to_json(c: &Customer) -> JsonValue {
    json!({
        "id": c.id.to_string(),
        "email": c.email,
        "display_name": c.display_name,
        "label": c.label(),
        "admin": c.admin,
        "created_at": c.created_at.to_rfc3339(),
    })
}

pub fn address_to_json(a: &Address) -> JsonValue {
    json!({
        "id": a.id.to_string(),
        "name": a.name,
        "street": a.street,
        "city": a.city,
        "postal_code": a.postal_code,
        "country": a.country,
        "phone": a.phone,
        "business": a.business,
        "business_details": a.business_details(),
    })
}

/// Categories with their subcategories nested, in category order.
pub fn categories_to_json(categories: &[Category], subcategories: &[Subcategory]) -> JsonValue {
    let items = categories
        .iter()
        .map(|c| {
            let subs = subcategories
                .iter()
                .filter(|s| s.category_id == c.id)
                .collect::<Vec<_>>();
            json!({
                "id": c.id,
                "name": c.name,
                "slug": c.slug,
                "image": c.image,
                "position": c.position,
                "subcategories": subs,
            })
        })
        .collect::<Vec<_>>();
    json!({ "items": items })
}

pub fn quote_to_json(totals: &OrderTotals, shipping: &ShippingConfig) -> JsonValue {
    let remaining = shipping
        .free_shipping_threshold
        .and_then(|threshold| threshold.checked_sub(totals.subtotal))
        .filter(|m| !m.is_negative() && *m != Money::ZERO);

    json!({
        "totals": totals_to_json(totals),
        "free_shipping_threshold": shipping.free_shipping_threshold.map(money_to_json),
        "remaining_for_free_shipping": remaining.map(money_to_json),
    })
}

/// Parse an optional `status` query value.
pub fn parse_status_filter(raw: Option<&str>) -> DomainResult<Option<OrderStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}
