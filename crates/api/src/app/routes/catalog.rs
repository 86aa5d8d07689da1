use std::sync::Arc;

use axum::{Json, Router, extract::Extension, routing::get};
use serde_json::{Value as JsonValue, json};

use storefront_auth::permissions;
use storefront_catalog::StoreInfo;

use crate::app::dto;
use crate::app::errors::ApiResult;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/categories", get(categories))
        .route("/brands", get(brands))
        .route("/slides", get(slides))
        .route("/info", get(info))
        .route("/shipping", get(shipping))
}

pub async fn categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::CATALOG_READ)?;
    let categories = services.reference.categories().await?;
    let subcategories = services.reference.subcategories().await?;
    Ok(Json(dto::categories_to_json(&categories, &subcategories)))
}

pub async fn brands(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::CATALOG_READ)?;
    let brands = services.reference.brands().await?;
    Ok(Json(json!({ "items": brands })))
}

pub async fn slides(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::CATALOG_READ)?;
    let slides = services.reference.slides().await?;
    Ok(Json(json!({ "items": slides })))
}

pub async fn info(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<StoreInfo>> {
    authz::require(&principal, &permissions::CATALOG_READ)?;
    Ok(Json(services.reference.store_info().await?))
}

pub async fn shipping(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<JsonValue>> {
    authz::require(&principal, &permissions::CATALOG_READ)?;
    let shipping = services.reference.shipping().await?;
    Ok(Json(json!({
        "standard_price": dto::money_to_json(shipping.standard_price),
        "free_shipping_threshold": shipping.free_shipping_threshold.map(dto::money_to_json),
    })))
}
