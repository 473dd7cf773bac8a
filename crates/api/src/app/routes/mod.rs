use axum::{Router, routing::get};

pub mod addresses;
pub mod orders;
pub mod products;
pub mod system;

/// Router for all authenticated (buyer-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/orders", orders::router())
        .nest("/products", products::router())
        .nest("/addresses", addresses::router())
}
