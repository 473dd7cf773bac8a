use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::BuyerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(buyer): Extension<BuyerContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "buyer_id": buyer.buyer_id().as_i64(),
    }))
}
