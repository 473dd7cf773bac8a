use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendra_core::{CategoryId, ProductId, SnapshotId, StoreId};

use crate::product::Product;

/// Sellable attributes of a product, captured at purchase time.
///
/// Immutable once written: later catalog edits must not change what a past
/// order was billed against. Each record belongs to exactly one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub consumer_price: i64,
    pub reseller_price: i64,
    pub description: Option<String>,
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
}

impl SnapshotRecord {
    /// Copy the product's sellable attributes as they are right now.
    pub fn capture(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            consumer_price: product.consumer_price,
            reseller_price: product.reseller_price,
            description: product.description.clone(),
            store_id: product.store_id,
            category_id: product.category_id,
        }
    }
}

/// A persisted snapshot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub id: SnapshotId,
    pub record: SnapshotRecord,
    pub created_at: DateTime<Utc>,
}
