use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::{Value as JsonValue, json};

use storefront_auth::permissions;
use storefront_catalog::ReferenceKind;
use storefront_core::{CustomerId, OrderId};
use storefront_infra::OrderFilter;
use storefront_orders::OrderStatus;

use crate::app::dto;
use crate::app::errors::ApiResult;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", post(change_status))
        .route("/orders/:id/tracking", post(attach_tracking))
        .route("/customers", get(list_customers))
        .route("/customers/:id", get(get_customer))
        .route("/reference/:kind/refresh", post(refresh_reference))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(params): Query<dto::AdminOrderListParams>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_ORDERS_READ)?;

    let filter = OrderFilter {
        status: dto::parse_status_filter(params.status.as_deref())?,
        customer_id: None,
    };
    let page = services
        .orders
        .list(&filter, params.page_token, services.config.page_size(params.page_size))
        .await?;

    Ok(Json(dto::orders_page_to_json(
        &page.items,
        page.next_page_token,
        dto::admin_order_to_json,
    )?))
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_ORDERS_READ)?;
    let order_id: OrderId = id.parse()?;

    let order = services.orders.get(order_id).await?;
    Ok(Json(dto::admin_order_to_json(&order)?))
}

pub async fn change_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ChangeStatusRequest>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_ORDERS_WRITE)?;
    let order_id: OrderId = id.parse()?;
    let to: OrderStatus = body.status.parse()?;

    let order = services
        .order_admin
        .change_status(principal.actor(), order_id, to, body.tracking_number, Utc::now())
        .await?;

    Ok(Json(dto::admin_order_to_json(&order)?))
}

pub async fn attach_tracking(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AttachTrackingRequest>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_ORDERS_WRITE)?;
    let order_id: OrderId = id.parse()?;

    let order = services
        .order_admin
        .attach_tracking_number(principal.actor(), order_id, body.tracking_number, Utc::now())
        .await?;

    Ok(Json(dto::admin_order_to_json(&order)?))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(params): Query<dto::ListParams>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_CUSTOMERS_READ)?;

    let page = services
        .customers
        .list(params.page_token, services.config.page_size(params.page_size))
        .await?;

    Ok(Json(json!({
        "items": page.items.iter().map(dto::customer_to_json).collect::<Vec<_>>(),
        "next_page_token": page.next_page_token,
    })))
}

/// Customer profile with saved addresses and the first page of orders.
pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_CUSTOMERS_READ)?;
    let customer_id: CustomerId = id.parse()?;

    let customer = services.customers.get(customer_id).await?;
    let addresses = services.customers.addresses_for(customer_id).await?;
    let orders = services
        .orders
        .list(
            &OrderFilter::by_customer(customer_id),
            None,
            services.config.page_size(None),
        )
        .await?;

    Ok(Json(json!({
        "customer": dto::customer_to_json(&customer),
        "addresses": addresses.iter().map(dto::address_to_json).collect::<Vec<_>>(),
        "orders": dto::orders_page_to_json(&orders.items, orders.next_page_token, dto::admin_order_to_json)?,
    })))
}

pub async fn refresh_reference(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(kind): Path<String>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ADMIN_REFERENCE_REFRESH)?;
    let kind: ReferenceKind = kind.parse()?;

    let data = services.reference.refresh(kind).await?;
    Ok(Json(json!({
        "kind": kind.as_str(),
        "data": data.as_ref(),
    })))
}
