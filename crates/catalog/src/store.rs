//! Catalog persistence seam.

use async_trait::async_trait;

use vendra_core::{ProductId, StoreError};

use crate::product::{NewProduct, Product};

/// Read-by-id plus whole-row writes for catalog management.
///
/// The checkout workflow's stock decrement does NOT go through this trait;
/// it runs inside its own unit of work (see `vendra-checkout`).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Persist a full product row. Returns `false` if the product no longer
    /// exists.
    async fn save_product(&self, product: &Product) -> Result<bool, StoreError>;
}
