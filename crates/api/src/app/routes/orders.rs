use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use vendra_checkout::PlaceOrderRequest;
use vendra_core::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::BuyerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/:id", get(get_order))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(buyer): Extension<BuyerContext>,
    Json(body): Json<PlaceOrderRequest>,
) -> axum::response::Response {
    match services.placement.place(buyer.buyer_id(), &body).await {
        Ok(placed) => {
            (StatusCode::CREATED, Json(dto::placed_order_to_json(&placed))).into_response()
        }
        Err(e) => errors::place_order_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(buyer): Extension<BuyerContext>,
) -> axum::response::Response {
    match services.orders.list_orders(buyer.buyer_id()).await {
        Ok(orders) => {
            let body: Vec<_> = orders.iter().map(dto::order_to_json).collect();
            Json(body).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(buyer): Extension<BuyerContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.orders.get_order(OrderId::new(id)).await {
        Ok(Some(detail)) if detail.order.buyer_id == buyer.buyer_id() => {
            Json(dto::order_detail_to_json(&detail)).into_response()
        }
        // Someone else's order: existence is not secret, its contents are.
        Ok(Some(_)) => errors::json_error(StatusCode::FORBIDDEN, "forbidden", "not your order"),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
