use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendra_core::{AddressId, BuyerId, OrderId, OrderLineId, SnapshotId, StoreId};

/// Order header: one checkout transaction.
///
/// Created all-or-nothing; `total_price` equals the sum of its lines'
/// subtotals at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: BuyerId,
    pub shipping_address_id: AddressId,
    /// Sum of line subtotals, in smallest currency unit.
    pub total_price: i64,
    pub invoice_code: String,
    /// Requested payment method, recorded verbatim (no capture/settlement).
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Header fields at creation time. The total starts at zero and is written
/// once every line has been recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub buyer_id: BuyerId,
    pub shipping_address_id: AddressId,
    pub invoice_code: String,
    pub payment_method: String,
}

/// One purchased product within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub snapshot_id: SnapshotId,
    /// Denormalized from the snapshot for per-store reporting.
    pub store_id: StoreId,
    pub quantity: i64,
    /// quantity x the snapshot's consumer price.
    pub subtotal: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub order_id: OrderId,
    pub snapshot_id: SnapshotId,
    pub store_id: StoreId,
    pub quantity: i64,
    pub subtotal: i64,
}
