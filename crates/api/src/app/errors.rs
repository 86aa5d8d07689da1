use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use storefront_auth::AuthzError;
use storefront_core::DomainError;

/// Handler error: anything that turns into a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Forbidden(err) => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvalidLineItem { index, reason } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "invalid_line_item",
                "message": format!("line item {index}: {reason}"),
                "index": index,
            })),
        )
            .into_response(),
        err @ DomainError::InvalidTransition { .. } => {
            json_error(StatusCode::CONFLICT, "invalid_transition", err.to_string())
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
        DomainError::UpstreamUnavailable(msg) => {
            tracing::error!(error = %msg, "document store unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable", msg)
        }
        err @ DomainError::SchemaMismatch { .. } => {
            tracing::error!(error = %err, "stored data failed schema validation");
            json_error(StatusCode::BAD_GATEWAY, "schema_mismatch", err.to_string())
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
