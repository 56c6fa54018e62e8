//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};
use tower::ServiceExt;

use rental_marketplace::config::Settings;
use rental_marketplace::domain::{Item, ItemRepository};
use rental_marketplace::infrastructure::storage::MemoryStore;
use rental_marketplace::shared::snowflake::SnowflakeGenerator;
use rental_marketplace::startup::{build_router, AppState};

/// Status and decoded JSON body of a response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test application over the in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    item_ids: SnowflakeGenerator,
}

impl TestApp {
    /// Create a new test application with an empty store
    pub async fn new() -> Self {
        Self::with_settings(Settings::in_memory()).await
    }

    pub async fn with_settings(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::in_memory(store.clone(), Arc::new(settings));

        Self {
            router: build_router(state),
            store,
            item_ids: SnowflakeGenerator::new(1000),
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Register a user through the API and return its id
    pub async fn create_user(&self) -> i64 {
        let response = self.post_json("/api/v1/users", user_payload()).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        id_of(&response.body["id"])
    }

    /// Items have no HTTP surface; insert one directly
    pub async fn seed_item(&self, owner_id: i64) -> i64 {
        let item = Item::new(self.item_ids.generate(), owner_id, "Палатка четырёхместная");
        ItemRepository::create(&*self.store, &item).await.unwrap().id
    }

    /// Book `item_id` for the given RFC 3339 interval
    pub async fn book(&self, item_id: i64, renter_id: i64, start: &str, end: &str) -> TestResponse {
        self.post_json("/api/v1/rentals", rental_payload(item_id, renter_id, start, end))
            .await
    }
}

/// Valid registration payload with a unique email
pub fn user_payload() -> Value {
    json!({
        "email": unique_email(),
        "password": "TestPassword123!",
        "first_name": FirstName().fake::<String>(),
        "last_name": LastName().fake::<String>(),
        "phone_number": "+79001234567",
        "description": "Сдаю туристическое снаряжение"
    })
}

pub fn rental_payload(item_id: i64, renter_id: i64, start: &str, end: &str) -> Value {
    json!({
        "item_id": item_id.to_string(),
        "renter_id": renter_id.to_string(),
        "start_date": start,
        "end_date": end,
        "total_price": "2500.00",
        "deposit_amount": "5000.00"
    })
}

/// Snowflake ids travel as JSON strings
pub fn id_of(value: &Value) -> i64 {
    value
        .as_str()
        .unwrap_or_else(|| panic!("id is not a string: {value}"))
        .parse()
        .unwrap()
}

/// Generate a unique test email
pub fn unique_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}
