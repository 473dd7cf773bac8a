//! Postgres backend.
//!
//! The placement unit of work is a real database transaction; products are
//! read with `FOR UPDATE` so the read-check-decrement sequence holds a row
//! lock until commit or rollback. Constraint violations (FK, CHECK, UNIQUE)
//! surface as `StoreError::Constraint` on both write paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use vendra_catalog::{CatalogStore, NewProduct, PriceSnapshot, Product, SnapshotRecord};
use vendra_checkout::{
    Address, LineDetail, NewAddress, NewOrder, NewOrderLine, Order, OrderDetail, OrderLine,
    OrderStore, OrderUnit,
};
use vendra_core::{
    AddressId, BuyerId, CategoryId, OrderId, OrderLineId, ProductId, SnapshotId, StoreError,
    StoreId,
};

static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres-backed store. Cheap to clone; the pool is shared.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(db_err)?;
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        tracing::info!("database schema up to date");
        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.constraint().is_some() => {
            StoreError::Constraint(db.message().to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: ProductId::new(row.try_get("id").map_err(db_err)?),
        store_id: StoreId::new(row.try_get("store_id").map_err(db_err)?),
        category_id: row
            .try_get::<Option<i64>, _>("category_id")
            .map_err(db_err)?
            .map(CategoryId::new),
        name: row.try_get("name").map_err(db_err)?,
        slug: row.try_get("slug").map_err(db_err)?,
        consumer_price: row.try_get("consumer_price").map_err(db_err)?,
        reseller_price: row.try_get("reseller_price").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        stock: row.try_get("stock").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn address_from_row(row: &PgRow) -> Result<Address, StoreError> {
    Ok(Address {
        id: AddressId::new(row.try_get("id").map_err(db_err)?),
        buyer_id: BuyerId::new(row.try_get("buyer_id").map_err(db_err)?),
        title: row.try_get("title").map_err(db_err)?,
        recipient_name: row.try_get("recipient_name").map_err(db_err)?,
        phone: row.try_get("phone").map_err(db_err)?,
        detail: row.try_get("detail").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    Ok(Order {
        id: OrderId::new(row.try_get("id").map_err(db_err)?),
        buyer_id: BuyerId::new(row.try_get("buyer_id").map_err(db_err)?),
        shipping_address_id: AddressId::new(
            row.try_get("shipping_address_id").map_err(db_err)?,
        ),
        total_price: row.try_get("total_price").map_err(db_err)?,
        invoice_code: row.try_get("invoice_code").map_err(db_err)?,
        payment_method: row.try_get("payment_method").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn line_detail_from_row(row: &PgRow) -> Result<LineDetail, StoreError> {
    let line = OrderLine {
        id: OrderLineId::new(row.try_get("line_id").map_err(db_err)?),
        order_id: OrderId::new(row.try_get("order_id").map_err(db_err)?),
        snapshot_id: SnapshotId::new(row.try_get("snapshot_id").map_err(db_err)?),
        store_id: StoreId::new(row.try_get("line_store_id").map_err(db_err)?),
        quantity: row.try_get("quantity").map_err(db_err)?,
        subtotal: row.try_get("subtotal").map_err(db_err)?,
    };
    let snapshot = PriceSnapshot {
        id: line.snapshot_id,
        record: SnapshotRecord {
            product_id: ProductId::new(row.try_get("product_id").map_err(db_err)?),
            name: row.try_get("name").map_err(db_err)?,
            slug: row.try_get("slug").map_err(db_err)?,
            consumer_price: row.try_get("consumer_price").map_err(db_err)?,
            reseller_price: row.try_get("reseller_price").map_err(db_err)?,
            description: row.try_get("description").map_err(db_err)?,
            store_id: StoreId::new(row.try_get("snapshot_store_id").map_err(db_err)?),
            category_id: row
                .try_get::<Option<i64>, _>("category_id")
                .map_err(db_err)?
                .map(CategoryId::new),
        },
        created_at: row
            .try_get::<DateTime<Utc>, _>("snapshot_created_at")
            .map_err(db_err)?,
    };
    Ok(LineDetail { line, snapshot })
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn insert_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO products
                (store_id, category_id, name, slug, consumer_price, reseller_price,
                 description, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new.store_id.as_i64())
        .bind(new.category_id.map(|c| c.as_i64()))
        .bind(&new.name)
        .bind(&new.slug)
        .bind(new.consumer_price)
        .bind(new.reseller_price)
        .bind(&new.description)
        .bind(new.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        product_from_row(&row)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn save_product(&self, product: &Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET store_id = $2, category_id = $3, name = $4, slug = $5,
                consumer_price = $6, reseller_price = $7, description = $8,
                stock = $9, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_i64())
        .bind(product.store_id.as_i64())
        .bind(product.category_id.map(|c| c.as_i64()))
        .bind(&product.name)
        .bind(&product.slug)
        .bind(product.consumer_price)
        .bind(product.reseller_price)
        .bind(&product.description)
        .bind(product.stock)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn OrderUnit>, StoreError> {
        let tx = self.pool.begin().await.map_err(db_err)?;
        Ok(Box::new(PgUnit { tx }))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderDetail>, StoreError> {
        let Some(row) = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        let order = order_from_row(&row)?;

        let rows = sqlx::query(
            r#"
            SELECT
                l.id AS line_id, l.order_id, l.snapshot_id,
                l.store_id AS line_store_id, l.quantity, l.subtotal,
                s.product_id, s.name, s.slug, s.consumer_price, s.reseller_price,
                s.description, s.store_id AS snapshot_store_id, s.category_id,
                s.created_at AS snapshot_created_at
            FROM order_lines l
            JOIN product_snapshots s ON s.id = l.snapshot_id
            WHERE l.order_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let lines = rows
            .iter()
            .map(line_detail_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(OrderDetail { order, lines }))
    }

    async fn list_orders(&self, buyer: BuyerId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(buyer.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(order_from_row).collect()
    }

    async fn insert_address(&self, new: NewAddress) -> Result<Address, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO addresses (buyer_id, title, recipient_name, phone, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.buyer_id.as_i64())
        .bind(&new.title)
        .bind(&new.recipient_name)
        .bind(&new.phone)
        .bind(&new.detail)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;
        address_from_row(&row)
    }

    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, StoreError> {
        let row = sqlx::query("SELECT * FROM addresses WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(address_from_row).transpose()
    }

    async fn list_addresses(&self, buyer: BuyerId) -> Result<Vec<Address>, StoreError> {
        let rows = sqlx::query("SELECT * FROM addresses WHERE buyer_id = $1 ORDER BY id")
            .bind(buyer.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(address_from_row).collect()
    }
}

/// One placement attempt on one database transaction.
struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderUnit for PgUnit {
    async fn product_for_update(&mut self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1 FOR UPDATE")
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn set_product_stock(&mut self, id: ProductId, stock: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE products SET stock = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_i64())
            .bind(stock)
            .execute(&mut *self.tx)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (buyer_id, shipping_address_id, invoice_code, payment_method)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order.buyer_id.as_i64())
        .bind(order.shipping_address_id.as_i64())
        .bind(&order.invoice_code)
        .bind(&order.payment_method)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_err)?;
        Ok(OrderId::new(row.try_get("id").map_err(db_err)?))
    }

    async fn insert_snapshot(&mut self, record: &SnapshotRecord) -> Result<SnapshotId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO product_snapshots
                (product_id, name, slug, consumer_price, reseller_price,
                 description, store_id, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(record.product_id.as_i64())
        .bind(&record.name)
        .bind(&record.slug)
        .bind(record.consumer_price)
        .bind(record.reseller_price)
        .bind(&record.description)
        .bind(record.store_id.as_i64())
        .bind(record.category_id.map(|c| c.as_i64()))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_err)?;
        Ok(SnapshotId::new(row.try_get("id").map_err(db_err)?))
    }

    async fn insert_line(&mut self, line: &NewOrderLine) -> Result<OrderLineId, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO order_lines (order_id, snapshot_id, store_id, quantity, subtotal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(line.order_id.as_i64())
        .bind(line.snapshot_id.as_i64())
        .bind(line.store_id.as_i64())
        .bind(line.quantity)
        .bind(line.subtotal)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_err)?;
        Ok(OrderLineId::new(row.try_get("id").map_err(db_err)?))
    }

    async fn set_order_total(&mut self, id: OrderId, total_price: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE orders SET total_price = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.as_i64())
            .bind(total_price)
            .execute(&mut *self.tx)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(|e| StoreError::Commit(e.to_string()))
    }
}
