use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendra_core::{CategoryId, DomainError, DomainResult, ProductId, StoreId};

/// Mutable catalog entry.
///
/// `stock` never goes negative: catalog edits are validated here, and the
/// checkout workflow only writes `stock - quantity` after checking
/// availability inside its unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    /// Price in smallest currency unit (e.g. cents).
    pub consumer_price: i64,
    /// Price in smallest currency unit (e.g. cents).
    pub reseller_price: i64,
    pub description: Option<String>,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, not-yet-persisted product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub consumer_price: i64,
    pub reseller_price: i64,
    pub description: Option<String>,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(
        store_id: StoreId,
        category_id: Option<CategoryId>,
        name: impl Into<String>,
        description: Option<String>,
        consumer_price: i64,
        reseller_price: i64,
        stock: i64,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if consumer_price < 0 || reseller_price < 0 {
            return Err(DomainError::validation("prices must not be negative"));
        }
        if stock < 0 {
            return Err(DomainError::invariant("stock must not be negative"));
        }

        let slug = slugify(&name);
        Ok(Self {
            store_id,
            category_id,
            name,
            slug,
            consumer_price,
            reseller_price,
            description,
            stock,
        })
    }
}

/// Partial catalog update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub consumer_price: Option<i64>,
    pub reseller_price: Option<i64>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Apply the patch to a current row, revalidating the result.
    ///
    /// Renames recompute the slug so it always matches the display name.
    pub fn apply_to(&self, current: &Product) -> DomainResult<Product> {
        let mut next = current.clone();

        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("product name must not be empty"));
            }
            next.name = name.to_string();
            next.slug = slugify(name);
        }
        if let Some(category_id) = self.category_id {
            next.category_id = Some(category_id);
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone());
        }
        if let Some(price) = self.consumer_price {
            if price < 0 {
                return Err(DomainError::validation("prices must not be negative"));
            }
            next.consumer_price = price;
        }
        if let Some(price) = self.reseller_price {
            if price < 0 {
                return Err(DomainError::validation("prices must not be negative"));
            }
            next.reseller_price = price;
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(DomainError::invariant("stock must not be negative"));
            }
            next.stock = stock;
        }

        Ok(next)
    }
}

/// Derive a URL slug from a display name: lowercased, whitespace runs
/// collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
