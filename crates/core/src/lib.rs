//! `vendra-core` — shared domain primitives.
//!
//! Strongly-typed identifiers and the error types every other crate builds on.
//! No IO, no HTTP, no storage.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, StoreError};
pub use id::{
    AddressId, BuyerId, CategoryId, OrderId, OrderLineId, ProductId, SnapshotId, StoreId,
};
