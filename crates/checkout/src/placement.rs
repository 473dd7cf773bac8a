use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use vendra_catalog::SnapshotRecord;
use vendra_core::{AddressId, BuyerId, OrderId};

use crate::error::PlaceOrderError;
use crate::invoice::invoice_code;
use crate::order::{NewOrder, NewOrderLine};
use crate::request::PlaceOrderRequest;
use crate::store::OrderStore;

/// Outcome of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub invoice_code: String,
    pub total_price: i64,
    pub payment_method: String,
}

/// The order-placement orchestrator.
///
/// Coordinates validation, stock mutation, price snapshotting and ledger
/// writes inside one unit of work. Holds an explicit storage handle instead
/// of any process-global connection; isolation is delegated entirely to the
/// store's unit of work.
pub struct OrderPlacement {
    store: Arc<dyn OrderStore>,
}

impl OrderPlacement {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Place an order for `buyer`.
    ///
    /// Lines are processed in submission order and the first failure aborts
    /// the whole attempt: the unit of work is dropped uncommitted, so no
    /// stock decrement, snapshot, line or header survives a failed call.
    pub async fn place(
        &self,
        buyer: BuyerId,
        request: &PlaceOrderRequest,
    ) -> Result<PlacedOrder, PlaceOrderError> {
        let lines = request.validate()?;

        let mut unit = self.store.begin().await?;

        let invoice = invoice_code(Utc::now());
        let order_id = unit
            .insert_order(&NewOrder {
                buyer_id: buyer,
                shipping_address_id: AddressId::new(request.shipping_address_id),
                invoice_code: invoice.clone(),
                payment_method: request.payment_method.clone(),
            })
            .await?;

        let mut total: i64 = 0;
        for line in &lines {
            let product = unit
                .product_for_update(line.product_id)
                .await?
                .ok_or(PlaceOrderError::ProductNotFound(line.product_id))?;

            if product.stock < line.quantity {
                return Err(PlaceOrderError::InsufficientStock {
                    product: product.name,
                });
            }

            unit.set_product_stock(product.id, product.stock - line.quantity)
                .await?;

            let subtotal = line
                .quantity
                .checked_mul(product.consumer_price)
                .ok_or_else(|| PlaceOrderError::invalid_input("line subtotal overflows"))?;

            let snapshot_id = unit
                .insert_snapshot(&SnapshotRecord::capture(&product))
                .await?;
            unit.insert_line(&NewOrderLine {
                order_id,
                snapshot_id,
                store_id: product.store_id,
                quantity: line.quantity,
                subtotal,
            })
            .await?;

            total = total
                .checked_add(subtotal)
                .ok_or_else(|| PlaceOrderError::invalid_input("order total overflows"))?;
        }

        unit.set_order_total(order_id, total).await?;
        unit.commit().await?;

        tracing::info!(
            order_id = order_id.as_i64(),
            buyer_id = buyer.as_i64(),
            total_price = total,
            lines = lines.len(),
            "order placed"
        );

        Ok(PlacedOrder {
            order_id,
            invoice_code: invoice,
            total_price: total,
            payment_method: request.payment_method.clone(),
        })
    }
}
