//! Catalog domain module.
//!
//! Business rules for products: validated construction, slug derivation, and
//! the immutable price-snapshot capture the checkout workflow relies on.
//! No IO here; concrete storage lives in `vendra-infra`.

pub mod product;
pub mod snapshot;
pub mod store;

pub use product::{NewProduct, Product, ProductPatch, slugify};
pub use snapshot::{PriceSnapshot, SnapshotRecord};
pub use store::CatalogStore;
