//! In-memory backend for tests and local development.
//!
//! Units of work hold the store's single mutex for their whole lifetime and
//! stage writes against a copy of the state. Commit swaps the copy in; drop
//! discards it. That gives the same observable semantics as the Postgres
//! transaction: serialized placements, nothing visible until commit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use vendra_catalog::{CatalogStore, NewProduct, PriceSnapshot, Product, SnapshotRecord};
use vendra_checkout::{
    Address, LineDetail, NewAddress, NewOrder, NewOrderLine, Order, OrderDetail, OrderLine,
    OrderStore, OrderUnit,
};
use vendra_core::{
    AddressId, BuyerId, OrderId, OrderLineId, ProductId, SnapshotId, StoreError,
};

#[derive(Debug, Default, Clone)]
struct State {
    next_id: i64,
    products: HashMap<i64, Product>,
    addresses: HashMap<i64, Address>,
    orders: HashMap<i64, Order>,
    lines: HashMap<i64, OrderLine>,
    snapshots: HashMap<i64, PriceSnapshot>,
}

impl State {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.allocate();
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(id),
            store_id: new.store_id,
            category_id: new.category_id,
            name: new.name,
            slug: new.slug,
            consumer_price: new.consumer_price,
            reseller_price: new.reseller_price,
            description: new.description,
            stock: new.stock,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.products.get(&id.as_i64()).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state.lock().await;
        let mut products: Vec<_> = state.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn save_product(&self, product: &Product) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.products.get_mut(&product.id.as_i64()) {
            Some(slot) => {
                let mut next = product.clone();
                next.updated_at = Utc::now();
                *slot = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryUnit { guard, staged }))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        let state = self.state.lock().await;
        let Some(order) = state.orders.get(&id.as_i64()).cloned() else {
            return Ok(None);
        };

        let mut lines: Vec<_> = state
            .lines
            .values()
            .filter(|l| l.order_id == id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.id);

        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            let snapshot = state
                .snapshots
                .get(&line.snapshot_id.as_i64())
                .cloned()
                .ok_or_else(|| {
                    StoreError::Backend(format!("order line {} has no snapshot", line.id))
                })?;
            details.push(LineDetail { line, snapshot });
        }

        Ok(Some(OrderDetail {
            order,
            lines: details,
        }))
    }

    async fn list_orders(&self, buyer: BuyerId) -> Result<Vec<Order>, StoreError> {
        let state = self.state.lock().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.buyer_id == buyer)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn insert_address(&self, new: NewAddress) -> Result<Address, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.allocate();
        let now = Utc::now();
        let address = Address {
            id: AddressId::new(id),
            buyer_id: new.buyer_id,
            title: new.title,
            recipient_name: new.recipient_name,
            phone: new.phone,
            detail: new.detail,
            created_at: now,
            updated_at: now,
        };
        state.addresses.insert(id, address.clone());
        Ok(address)
    }

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.addresses.get(&id.as_i64()).cloned())
    }

    async fn list_addresses(&self, buyer: BuyerId) -> Result<Vec<Address>, StoreError> {
        let state = self.state.lock().await;
        let mut addresses: Vec<_> = state
            .addresses
            .values()
            .filter(|a| a.buyer_id == buyer)
            .cloned()
            .collect();
        addresses.sort_by_key(|a| a.id);
        Ok(addresses)
    }
}

/// One staged placement attempt.
///
/// Holding `guard` keeps every other unit (and store read) out until this
/// one settles, which is what makes product reads equivalent to row locks.
struct InMemoryUnit {
    guard: OwnedMutexGuard<State>,
    staged: State,
}

#[async_trait]
impl OrderUnit for InMemoryUnit {
    async fn product_for_update(&mut self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.staged.products.get(&id.as_i64()).cloned())
    }

    async fn set_product_stock(&mut self, id: ProductId, stock: i64) -> Result<(), StoreError> {
        let product = self
            .staged
            .products
            .get_mut(&id.as_i64())
            .ok_or_else(|| StoreError::Backend(format!("product {id} vanished mid-unit")))?;
        product.stock = stock;
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId, StoreError> {
        // Parity with the FK on the relational backend.
        if !self
            .staged
            .addresses
            .contains_key(&order.shipping_address_id.as_i64())
        {
            return Err(StoreError::Constraint("unknown shipping address".to_string()));
        }

        let id = self.staged.allocate();
        let now = Utc::now();
        self.staged.orders.insert(
            id,
            Order {
                id: OrderId::new(id),
                buyer_id: order.buyer_id,
                shipping_address_id: order.shipping_address_id,
                total_price: 0,
                invoice_code: order.invoice_code.clone(),
                payment_method: order.payment_method.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(OrderId::new(id))
    }

    async fn insert_snapshot(&mut self, record: &SnapshotRecord) -> Result<SnapshotId, StoreError> {
        let id = self.staged.allocate();
        self.staged.snapshots.insert(
            id,
            PriceSnapshot {
                id: SnapshotId::new(id),
                record: record.clone(),
                created_at: Utc::now(),
            },
        );
        Ok(SnapshotId::new(id))
    }

    async fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLineId, StoreError> {
        let id = self.staged.allocate();
        self.staged.lines.insert(
            id,
            OrderLine {
                id: OrderLineId::new(id),
                order_id: line.order_id,
                snapshot_id: line.snapshot_id,
                store_id: line.store_id,
                quantity: line.quantity,
                subtotal: line.subtotal,
            },
        );
        Ok(OrderLineId::new(id))
    }

    async fn set_order_total(&mut self, id: OrderId, total_price: i64) -> Result<(), StoreError> {
        let order = self
            .staged
            .orders
            .get_mut(&id.as_i64())
            .ok_or_else(|| StoreError::Backend(format!("order {id} vanished mid-unit")))?;
        order.total_price = total_price;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryUnit { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
