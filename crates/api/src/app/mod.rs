//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: document store, repositories, reference cache
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use storefront_core::DomainResult;
use storefront_infra::{AppConfig, DocumentStore, InMemoryDocumentStore, seed};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router over an in-memory document store (public
/// entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> DomainResult<Router> {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    if config.seed_demo_data {
        seed::seed_demo_data(store.as_ref()).await?;
    }
    Ok(build_app_with_store(config, store))
}

/// Build the router over an existing store.
pub fn build_app_with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Router {
    let jwt = Arc::new(storefront_auth::Hs256JwtValidator::new(
        config.jwt_secret.clone().into_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::AppServices::new(config, store));

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
