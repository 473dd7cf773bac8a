use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use vendra_api::app::services::AppServices;
use vendra_core::BuyerId;
use vendra_infra::InMemoryStore;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory backend, ephemeral port.
        let services = Arc::new(AppServices::from_backend(Arc::new(InMemoryStore::new())));
        let app = vendra_api::app::build_app_with(services, JWT_SECRET.to_string());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(buyer: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = vendra_auth::Claims {
        sub: BuyerId::new(buyer),
        iat: now,
        exp: now + 600,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn create_address(client: &reqwest::Client, base_url: &str, token: &str) -> i64 {
    let res = client
        .post(format!("{}/addresses", base_url))
        .bearer_auth(token)
        .json(&json!({
            "title": "Home",
            "recipient_name": "Ani",
            "phone": "0812",
            "detail": "Jl. Merdeka 1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    price: i64,
    stock: i64,
) -> i64 {
    let res = client
        .post(format!("{}/products", base_url))
        .bearer_auth(token)
        .json(&json!({
            "store_id": 1,
            "name": name,
            "consumer_price": price,
            "reseller_price": price,
            "stock": stock,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn product_stock(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    id: i64,
) -> i64 {
    let res = client
        .get(format!("{}/products/{}", base_url, id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buyer_identity_is_derived_from_token() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(42);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["buyer_id"].as_i64().unwrap(), 42);
}

#[tokio::test]
async fn order_lifecycle_place_then_read_back() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &token).await;
    let product_id = create_product(&client, &srv.base_url, &token, "Kopi Gayo", 1000, 5).await;

    // Place
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "transfer",
            "shipping_address_id": address_id,
            "lines": [{ "product_id": product_id, "quantity": 3 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let placed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(placed["total_price"].as_i64().unwrap(), 3000);
    assert!(placed["invoice_code"].as_str().unwrap().starts_with("INV-"));
    let order_id = placed["id"].as_i64().unwrap();

    // Stock went down
    assert_eq!(product_stock(&client, &srv.base_url, &token, product_id).await, 2);

    // Detail carries the snapshotted product attributes
    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let detail: serde_json::Value = res.json().await.unwrap();
    assert_eq!(detail["total_price"].as_i64().unwrap(), 3000);
    let lines = detail["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"].as_i64().unwrap(), 3);
    assert_eq!(lines[0]["subtotal"].as_i64().unwrap(), 3000);
    assert_eq!(lines[0]["product"]["name"].as_str().unwrap(), "Kopi Gayo");

    // And it shows up in the listing
    let res = client
        .get(format!("{}/orders", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listing: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn insufficient_stock_is_a_conflict_and_changes_nothing() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &token).await;
    let product_id = create_product(&client, &srv.base_url, &token, "Kopi Gayo", 1000, 2).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "transfer",
            "shipping_address_id": address_id,
            "lines": [{ "product_id": product_id, "quantity": 3 }],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "insufficient_stock");
    assert_eq!(product_stock(&client, &srv.base_url, &token, product_id).await, 2);
}

#[tokio::test]
async fn empty_order_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &token).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "transfer",
            "shipping_address_id": address_id,
            "lines": [],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "invalid_input");
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &token).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "transfer",
            "shipping_address_id": address_id,
            "lines": [{ "product_id": 999, "quantity": 1 }],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_detail_is_owner_only() {
    let srv = TestServer::spawn().await;
    let owner = mint_jwt(1);
    let intruder = mint_jwt(2);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &owner).await;
    let product_id = create_product(&client, &srv.base_url, &owner, "Kopi Gayo", 1000, 5).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&owner)
        .json(&json!({
            "payment_method": "transfer",
            "shipping_address_id": address_id,
            "lines": [{ "product_id": product_id, "quantity": 1 }],
        }))
        .send()
        .await
        .unwrap();
    let placed: serde_json::Value = res.json().await.unwrap();
    let order_id = placed["id"].as_i64().unwrap();

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&intruder)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // And the intruder's listing stays empty.
    let res = client
        .get(format!("{}/orders", srv.base_url))
        .bearer_auth(&intruder)
        .send()
        .await
        .unwrap();
    let listing: serde_json::Value = res.json().await.unwrap();
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn address_book_is_buyer_scoped() {
    let srv = TestServer::spawn().await;
    let owner = mint_jwt(1);
    let intruder = mint_jwt(2);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &owner).await;

    let res = client
        .get(format!("{}/addresses/{}", srv.base_url, address_id))
        .bearer_auth(&intruder)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(format!("{}/addresses", srv.base_url))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    let listing: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn catalog_edits_do_not_rewrite_order_history() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(1);
    let client = reqwest::Client::new();

    let address_id = create_address(&client, &srv.base_url, &token).await;
    let product_id = create_product(&client, &srv.base_url, &token, "Kopi Gayo", 1000, 5).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "payment_method": "transfer",
            "shipping_address_id": address_id,
            "lines": [{ "product_id": product_id, "quantity": 1 }],
        }))
        .send()
        .await
        .unwrap();
    let placed: serde_json::Value = res.json().await.unwrap();
    let order_id = placed["id"].as_i64().unwrap();

    // Rename and reprice the product after the sale.
    let res = client
        .put(format!("{}/products/{}", srv.base_url, product_id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kopi Gayo Premium", "consumer_price": 2500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let detail: serde_json::Value = res.json().await.unwrap();
    let product = &detail["lines"][0]["product"];
    assert_eq!(product["name"].as_str().unwrap(), "Kopi Gayo");
    assert_eq!(product["consumer_price"].as_i64().unwrap(), 1000);
    assert_eq!(detail["total_price"].as_i64().unwrap(), 1000);
}
