//! Request DTOs and JSON mapping helpers.

use serde::Deserialize;
use serde_json::{Value, json};

use vendra_catalog::Product;
use vendra_checkout::{Address, Order, OrderDetail, PlacedOrder};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub store_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub consumer_price: i64,
    pub reseller_price: i64,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateAddressRequest {
    pub title: String,
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
}

pub fn placed_order_to_json(placed: &PlacedOrder) -> Value {
    json!({
        "id": placed.order_id.as_i64(),
        "invoice_code": placed.invoice_code,
        "total_price": placed.total_price,
        "payment_method": placed.payment_method,
    })
}

pub fn product_to_json(product: &Product) -> Value {
    json!({
        "id": product.id.as_i64(),
        "store_id": product.store_id.as_i64(),
        "category_id": product.category_id.map(|c| c.as_i64()),
        "name": product.name,
        "slug": product.slug,
        "consumer_price": product.consumer_price,
        "reseller_price": product.reseller_price,
        "description": product.description,
        "stock": product.stock,
        "created_at": product.created_at,
        "updated_at": product.updated_at,
    })
}

pub fn order_to_json(order: &Order) -> Value {
    json!({
        "id": order.id.as_i64(),
        "buyer_id": order.buyer_id.as_i64(),
        "shipping_address_id": order.shipping_address_id.as_i64(),
        "total_price": order.total_price,
        "invoice_code": order.invoice_code,
        "payment_method": order.payment_method,
        "created_at": order.created_at,
    })
}

/// Full order with lines; each line embeds the product attributes it was
/// billed against, not the live catalog row.
pub fn order_detail_to_json(detail: &OrderDetail) -> Value {
    let lines: Vec<Value> = detail
        .lines
        .iter()
        .map(|ld| {
            json!({
                "id": ld.line.id.as_i64(),
                "quantity": ld.line.quantity,
                "subtotal": ld.line.subtotal,
                "store_id": ld.line.store_id.as_i64(),
                "product": {
                    "product_id": ld.snapshot.record.product_id.as_i64(),
                    "name": ld.snapshot.record.name,
                    "slug": ld.snapshot.record.slug,
                    "consumer_price": ld.snapshot.record.consumer_price,
                    "reseller_price": ld.snapshot.record.reseller_price,
                    "description": ld.snapshot.record.description,
                },
            })
        })
        .collect();

    let mut value = order_to_json(&detail.order);
    value["lines"] = Value::Array(lines);
    value
}

pub fn address_to_json(address: &Address) -> Value {
    json!({
        "id": address.id.as_i64(),
        "buyer_id": address.buyer_id.as_i64(),
        "title": address.title,
        "recipient_name": address.recipient_name,
        "phone": address.phone,
        "detail": address.detail,
        "created_at": address.created_at,
    })
}
