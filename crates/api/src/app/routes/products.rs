use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use vendra_catalog::{NewProduct, ProductPatch};
use vendra_core::{CategoryId, ProductId, StoreId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let new = match NewProduct::new(
        StoreId::new(body.store_id),
        body.category_id.map(CategoryId::new),
        body.name,
        body.description,
        body.consumer_price,
        body.reseller_price,
        body.stock,
    ) {
        Ok(new) => new,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.insert_product(new).await {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_products().await {
        Ok(products) => {
            let body: Vec<_> = products.iter().map(dto::product_to_json).collect();
            Json(body).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.catalog.get_product(ProductId::new(id)).await {
        Ok(Some(product)) => Json(dto::product_to_json(&product)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> axum::response::Response {
    let current = match services.catalog.get_product(ProductId::new(id)).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let next = match patch.apply_to(&current) {
        Ok(next) => next,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.catalog.save_product(&next).await {
        Ok(true) => Json(dto::product_to_json(&next)).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
