//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage backend selection and shared handles
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services().await?);
    Ok(build_app_with(services, jwt_secret))
}

/// Router over pre-built services; tests use this with an in-memory backend.
pub fn build_app_with(services: Arc<services::AppServices>, jwt_secret: String) -> Router {
    let jwt = Arc::new(vendra_auth::Hs256JwtValidator::new(&jwt_secret));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid buyer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
