use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};

use storefront_auth::{JwtClaims, Role};
use storefront_core::{AddressId, CustomerId, OrderId, ProductId};
use storefront_infra::{AppConfig, DocumentStore, InMemoryDocumentStore, seed};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    store: Arc<InMemoryDocumentStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        seed::seed_demo_data(store.as_ref()).await.unwrap();

        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..AppConfig::default()
        };

        // Same router as prod, bound to an ephemeral port.
        let app = storefront_api::app::build_app_with_store(config, store.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert a pending order with the two-line example basket.
    async fn insert_order(&self, customer_id: CustomerId, status: &str) -> OrderId {
        let id = OrderId::new();
        let now = Utc::now().to_rfc3339();
        self.store
            .put_document(
                "orders",
                &id.to_string(),
                json!({
                    "customer_id": customer_id.to_string(),
                    "items": [
                        { "product_id": ProductId::new().to_string(), "name": "Mug", "unit_price": 100, "quantity": 2 },
                        { "product_id": ProductId::new().to_string(), "name": "Tee", "unit_price": 50, "discount_price": 40, "quantity": 1 }
                    ],
                    "shipping_price": 20,
                    "total": 260,
                    "status": status,
                    "created_at": now,
                    "updated_at": now
                }),
            )
            .await
            .unwrap();
        id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(customer_id: CustomerId, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims::new(customer_id, roles, now, now + ChronoDuration::minutes(10));

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn admin_token() -> String {
    mint_jwt(CustomerId::new(), vec![Role::new(Role::ADMIN)])
}

async fn post_status(
    client: &reqwest::Client,
    srv: &TestServer,
    token: &str,
    id: OrderId,
    body: JsonValue,
) -> reqwest::Response {
    client
        .post(srv.url(&format!("/admin/orders/{id}/status")))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public_and_everything_else_needs_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reflects_token() {
    let srv = TestServer::spawn().await;
    let customer_id = CustomerId::new();
    let token = mint_jwt(customer_id, vec![]);

    let res = reqwest::Client::new()
        .get(srv.url("/whoami"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["customer_id"].as_str().unwrap(), customer_id.to_string());
    assert_eq!(body["admin"], false);
}

#[tokio::test]
async fn categories_are_served_with_subcategories() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(CustomerId::new(), vec![]);

    let res = reqwest::Client::new()
        .get(srv.url("/catalog/categories"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: JsonValue = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["slug"], "kitchen");
    assert_eq!(items[0]["subcategories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cart_quote_prices_lines_and_applies_shipping() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(CustomerId::new(), vec![]);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/cart/quote"))
        .bearer_auth(&token)
        .json(&json!({
            "items": [
                { "product_id": ProductId::new().to_string(), "name": "Mug", "unit_price": 100, "quantity": 2 },
                { "product_id": ProductId::new().to_string(), "name": "Tee", "unit_price": 50, "discount_price": 40, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["totals"]["subtotal"]["minor"], 240);
    assert_eq!(body["totals"]["discount"]["minor"], 10);
    assert_eq!(body["totals"]["shipping"]["minor"], 499);
    assert_eq!(body["totals"]["total"]["minor"], 739);
    assert_eq!(body["remaining_for_free_shipping"]["minor"], 4760);

    let res = client
        .post(srv.url("/cart/quote"))
        .bearer_auth(&token)
        .json(&json!({
            "items": [
                { "product_id": ProductId::new().to_string(), "name": "Mug", "unit_price": 100, "quantity": 1 },
                { "product_id": ProductId::new().to_string(), "name": "Bad", "unit_price": 100, "quantity": -1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_line_item");
    assert_eq!(body["index"], 1);
}

#[tokio::test]
async fn customers_cannot_reach_admin_routes() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(CustomerId::new(), vec![Role::new(Role::CUSTOMER)]);

    let res = reqwest::Client::new()
        .get(srv.url("/admin/orders"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn admin_drives_order_through_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = admin_token();
    let id = srv.insert_order(CustomerId::new(), "pending").await;

    let res = post_status(&client, &srv, &token, id, json!({ "status": "delivered" })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_transition");

    let res = post_status(&client, &srv, &token, id, json!({ "status": "accepted" })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = post_status(
        &client,
        &srv,
        &token,
        id,
        json!({ "status": "shipped", "tracking_number": " AWB123 " }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["tracking_number"], "AWB123");
    assert_eq!(body["allowed_next_statuses"], json!(["delivered"]));

    let res = post_status(&client, &srv, &token, id, json!({ "status": "delivered" })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url(&format!("/admin/orders/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["tracking_number"], "AWB123");
    assert_eq!(body["totals"]["total"]["minor"], 260);
}

#[tokio::test]
async fn tracking_number_requires_a_shipped_order() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = admin_token();
    let id = srv.insert_order(CustomerId::new(), "accepted").await;

    let res = client
        .post(srv.url(&format!("/admin/orders/{id}/tracking")))
        .bearer_auth(&token)
        .json(&json!({ "tracking_number": "AWB123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_lists_orders_by_status() {
    let srv = TestServer::spawn().await;
    let token = admin_token();
    let customer = CustomerId::new();
    let pending = srv.insert_order(customer, "pending").await;
    srv.insert_order(customer, "shipped").await;

    let res = reqwest::Client::new()
        .get(srv.url("/admin/orders?status=pending"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: JsonValue = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_str().unwrap(), pending.to_string());
    assert_eq!(items[0]["status_label"], "Pending");

    let res = reqwest::Client::new()
        .get(srv.url("/admin/orders?status=lost"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customers_only_see_their_own_orders() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let me = CustomerId::new();
    let mine = srv.insert_order(me, "shipped").await;
    let theirs = srv.insert_order(CustomerId::new(), "pending").await;
    let token = mint_jwt(me, vec![]);

    let res = client
        .get(srv.url("/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: JsonValue = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_str().unwrap(), mine.to_string());
    assert_eq!(items[0]["status_label"], "On its way");

    let res = client
        .get(srv.url(&format!("/orders/{theirs}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(srv.url("/orders/not-an-id"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reference_data_is_cached_until_refreshed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let customer = mint_jwt(CustomerId::new(), vec![]);
    let admin = admin_token();

    let brands = |token: String| {
        let client = client.clone();
        let url = srv.url("/catalog/brands");
        async move {
            let res = client.get(url).bearer_auth(token).send().await.unwrap();
            let body: JsonValue = res.json().await.unwrap();
            body["items"].as_array().unwrap().len()
        }
    };

    assert_eq!(brands(customer.clone()).await, 2);

    srv.store
        .put_document("brands", "zenith", json!({ "name": "Zenith" }))
        .await
        .unwrap();
    assert_eq!(brands(customer.clone()).await, 2);

    let res = client
        .post(srv.url("/admin/reference/brands/refresh"))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(brands(customer).await, 3);
}

#[tokio::test]
async fn admin_sees_customer_with_addresses_and_orders() {
    let srv = TestServer::spawn().await;
    let customer_id = CustomerId::new();
    srv.store
        .put_document(
            "users",
            &customer_id.to_string(),
            json!({ "email": "ana@example.com", "created_at": Utc::now().to_rfc3339() }),
        )
        .await
        .unwrap();
    srv.store
        .put_document(
            "addresses",
            &AddressId::new().to_string(),
            json!({
                "customer_id": customer_id.to_string(),
                "name": "Office",
                "street": "3 Work Rd",
                "city": "Capital City",
                "postal_code": "99999",
                "country": "US",
                "business": true,
                "business_details": { "company_name": "Ana Ltd", "tax_id": "TX-1" }
            }),
        )
        .await
        .unwrap();
    srv.insert_order(customer_id, "pending").await;

    let res = reqwest::Client::new()
        .get(srv.url(&format!("/admin/customers/{customer_id}")))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["customer"]["label"], "ana@example.com");
    assert_eq!(body["addresses"][0]["business_details"]["tax_id"], "TX-1");
    assert_eq!(body["orders"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unavailable_store_is_reported_as_503() {
    let srv = TestServer::spawn().await;
    srv.store.set_available(false);

    let res = reqwest::Client::new()
        .get(srv.url("/admin/orders"))
        .bearer_auth(admin_token())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: JsonValue = res.json().await.unwrap();
    assert_eq!(body["error"], "upstream_unavailable");
}
