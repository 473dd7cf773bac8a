use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use vendra_checkout::NewAddress;
use vendra_core::AddressId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::BuyerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route("/:id", get(get_address))
}

pub async fn create_address(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(buyer): Extension<BuyerContext>,
    Json(body): Json<dto::CreateAddressRequest>,
) -> axum::response::Response {
    let new = match NewAddress::new(
        buyer.buyer_id(),
        body.title,
        body.recipient_name,
        body.phone,
        body.detail,
    ) {
        Ok(new) => new,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.orders.insert_address(new).await {
        Ok(address) => {
            (StatusCode::CREATED, Json(dto::address_to_json(&address))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_addresses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(buyer): Extension<BuyerContext>,
) -> axum::response::Response {
    match services.orders.list_addresses(buyer.buyer_id()).await {
        Ok(addresses) => {
            let body: Vec<_> = addresses.iter().map(dto::address_to_json).collect();
            Json(body).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_address(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(buyer): Extension<BuyerContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.orders.get_address(AddressId::new(id)).await {
        Ok(Some(address)) if address.buyer_id == buyer.buyer_id() => {
            Json(dto::address_to_json(&address)).into_response()
        }
        Ok(Some(_)) => errors::json_error(StatusCode::FORBIDDEN, "forbidden", "not your address"),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "address not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
