use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    routing::get,
};
use serde_json::Value as JsonValue;

use storefront_auth::permissions;
use storefront_core::{DomainError, OrderId};
use storefront_infra::OrderFilter;

use crate::app::dto;
use crate::app::errors::ApiResult;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_my_orders))
        .route("/:id", get(get_my_order))
}

pub async fn list_my_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(params): Query<dto::ListParams>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ORDERS_READ_OWN)?;

    let page = services
        .orders
        .list(
            &OrderFilter::by_customer(principal.customer_id()),
            params.page_token,
            services.config.page_size(params.page_size),
        )
        .await?;

    Ok(Json(dto::orders_page_to_json(
        &page.items,
        page.next_page_token,
        dto::customer_order_to_json,
    )?))
}

/// Someone else's order is reported as missing.
pub async fn get_my_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::ORDERS_READ_OWN)?;
    let order_id: OrderId = id.parse()?;

    let order = services.orders.get(order_id).await?;
    if !order.is_owned_by(principal.customer_id()) {
        return Err(DomainError::NotFound.into());
    }

    Ok(Json(dto::customer_order_to_json(&order)?))
}
