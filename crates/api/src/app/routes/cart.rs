use std::sync::Arc;

use axum::{Json, Router, extract::Extension, routing::post};
use serde_json::Value as JsonValue;

use storefront_auth::permissions;
use storefront_core::Money;
use storefront_orders::compute_totals;

use crate::app::dto;
use crate::app::errors::ApiResult;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/quote", post(quote))
}

/// Price a cart with the current shipping settings.
pub async fn quote(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CartQuoteRequest>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::CART_QUOTE)?;

    // Validate the lines before touching the store.
    let unshipped = compute_totals(&body.items, Money::ZERO)?;

    let shipping = services.reference.shipping().await?;
    let totals = compute_totals(&body.items, shipping.price_for(unshipped.subtotal))?;

    Ok(Json(dto::quote_to_json(&totals, &shipping)))
}
