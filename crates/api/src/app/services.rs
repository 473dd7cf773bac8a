//! Shared service handles behind the routes.

use std::sync::Arc;

use vendra_catalog::CatalogStore;
use vendra_checkout::{OrderPlacement, OrderStore};
use vendra_infra::{InMemoryStore, PgStore};

/// Everything a handler needs, behind trait objects so the backend is
/// swappable.
pub struct AppServices {
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub placement: OrderPlacement,
}

impl AppServices {
    /// Wire all services from one backend implementing both store traits.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: CatalogStore + OrderStore + 'static,
    {
        let catalog: Arc<dyn CatalogStore> = backend.clone();
        let orders: Arc<dyn OrderStore> = backend;
        let placement = OrderPlacement::new(orders.clone());
        Self {
            catalog,
            orders,
            placement,
        }
    }
}

/// Pick the storage backend from the environment: `DATABASE_URL` selects
/// Postgres, otherwise everything lives in memory.
pub async fn build_services() -> anyhow::Result<AppServices> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let store = PgStore::connect(&url).await?;
            tracing::info!("using postgres storage backend");
            Ok(AppServices::from_backend(Arc::new(store)))
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set; using in-memory storage backend");
            Ok(AppServices::from_backend(Arc::new(InMemoryStore::new())))
        }
    }
}
