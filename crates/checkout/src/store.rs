//! Order-side persistence seams.

use async_trait::async_trait;

use vendra_catalog::{PriceSnapshot, Product, SnapshotRecord};
use vendra_core::{
    AddressId, BuyerId, OrderId, OrderLineId, ProductId, SnapshotId, StoreError,
};

use crate::address::{Address, NewAddress};
use crate::order::{NewOrder, NewOrderLine, Order, OrderLine};

/// One order line joined with the snapshot it was billed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDetail {
    pub line: OrderLine,
    pub snapshot: PriceSnapshot,
}

/// An order header with its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<LineDetail>,
}

/// Order persistence.
///
/// `begin` opens the atomic unit of work the placement workflow runs in; the
/// read methods and the address book are plain single-row access.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>, StoreError>;

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError>;

    /// The buyer's orders, newest first.
    async fn list_orders(&self, buyer: BuyerId) -> Result<Vec<Order>, StoreError>;

    async fn insert_address(&self, new: NewAddress) -> Result<Address, StoreError>;

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, StoreError>;

    async fn list_addresses(&self, buyer: BuyerId) -> Result<Vec<Address>, StoreError>;
}

/// Atomic unit of work for one placement attempt.
///
/// Every write is staged against the unit; dropping the unit without calling
/// `commit` discards all of it. `product_for_update` must hand out stock that
/// no concurrent unit can decrement until this one settles, so read-check-
/// decrement inside one unit cannot oversell.
#[async_trait]
pub trait OrderUnit: Send {
    async fn product_for_update(
        &mut self,
        id: ProductId,
    ) -> Result<Option<Product>, StoreError>;

    async fn set_product_stock(
        &mut self,
        id: ProductId,
        stock: i64,
    ) -> Result<(), StoreError>;

    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId, StoreError>;

    async fn insert_snapshot(
        &mut self,
        record: &SnapshotRecord,
    ) -> Result<SnapshotId, StoreError>;

    async fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLineId, StoreError>;

    async fn set_order_total(
        &mut self,
        id: OrderId,
        total_price: i64,
    ) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
