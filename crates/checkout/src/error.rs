use thiserror::Error;

use vendra_core::{ProductId, StoreError};

/// Failure modes of the order-placement workflow.
///
/// Exactly one of these (the first failure encountered) reaches the caller.
/// Every effect staged inside the unit of work is discarded on failure; a
/// failed attempt is retried only by resubmission.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// Malformed or semantically empty request (no lines, non-positive
    /// quantity, non-positive product id).
    #[error("invalid order request: {0}")]
    InvalidInput(String),

    /// A referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Requested quantity exceeds available stock.
    #[error("insufficient stock for {product}")]
    InsufficientStock { product: String },

    /// The unit of work could not be created, written to, or committed.
    #[error("order could not be persisted: {0}")]
    Persistence(#[from] StoreError),
}

impl PlaceOrderError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
