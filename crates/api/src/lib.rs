//! HTTP surface: router, auth middleware and request context.

pub mod app;
pub mod context;
pub mod middleware;
