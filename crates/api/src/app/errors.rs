use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use vendra_checkout::PlaceOrderError;
use vendra_core::{DomainError, StoreError};

pub fn place_order_error_to_response(err: PlaceOrderError) -> axum::response::Response {
    match err {
        PlaceOrderError::InvalidInput(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        PlaceOrderError::ProductNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("product {id} not found"),
        ),
        PlaceOrderError::InsufficientStock { product } => json_error(
            StatusCode::CONFLICT,
            "insufficient_stock",
            format!("insufficient stock for {product}"),
        ),
        PlaceOrderError::Persistence(e) => {
            tracing::error!(error = %e, "order placement failed in storage");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "persistence_failure",
                "order could not be persisted",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "storage failure");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        "storage failure",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
