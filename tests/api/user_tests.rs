//! User API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{id_of, unique_email, user_payload, TestApp};

#[tokio::test]
async fn test_create_user_returns_profile_without_password() {
    let app = TestApp::new().await;
    let payload = user_payload();

    let response = app.post_json("/api/v1/users", payload.clone()).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["id"].is_string());
    assert!(id_of(&response.body["id"]) > 1 << 53);
    assert_eq!(response.body["email"], payload["email"]);
    assert_eq!(response.body["verified"], false);
    assert!(response.body["rating"].is_null());
    assert!(response.body.get("password").is_none());
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict_and_not_persisted() {
    let app = TestApp::new().await;
    let first = user_payload();
    let mut second = user_payload();
    second["email"] = first["email"].clone();

    assert_eq!(app.post_json("/api/v1/users", first).await.status, StatusCode::CREATED);
    let response = app.post_json("/api/v1/users", second).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], 20002);
    assert_eq!(response.body["kind"], "DUPLICATE_EMAIL");
    assert_eq!(app.store.user_count(), 1);
}

#[tokio::test]
async fn test_invalid_profile_lists_field_errors_in_russian() {
    let app = TestApp::new().await;

    let response = app
        .post_json(
            "/api/v1/users",
            json!({
                "email": "not-an-email",
                "password": "TestPassword123!",
                "first_name": "А",
                "last_name": "Петров",
                "phone_number": "123"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 10007);
    assert_eq!(response.body["kind"], "VALIDATION");

    let errors = response.body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["email", "first_name", "phone_number"]);
    assert!(errors
        .iter()
        .any(|e| e["message"] == "Имя должно содержать от 2 до 50 символов"));
    assert_eq!(app.store.user_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/v1/users", json!({ "email": unique_email() }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 10002);
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new().await;
    let id = app.create_user().await;

    let found = app.get(&format!("/api/v1/users/{id}")).await;
    let missing = app.get("/api/v1/users/123456789").await;
    let garbage = app.get("/api/v1/users/abc").await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["id"], id.to_string());
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["kind"], "USER_NOT_FOUND");
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_user_overwrites_and_clears_optional_fields() {
    let app = TestApp::new().await;
    let id = app.create_user().await;
    let before = app.get(&format!("/api/v1/users/{id}")).await.body;

    let response = app
        .put_json(
            &format!("/api/v1/users/{id}"),
            json!({
                "first_name": "Ольга",
                "last_name": "Кузнецова"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["first_name"], "Ольга");
    assert_eq!(response.body["last_name"], "Кузнецова");
    assert!(response.body["phone_number"].is_null());
    assert!(response.body["description"].is_null());
    assert_eq!(response.body["email"], before["email"]);
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .put_json(
            "/api/v1/users/42",
            json!({ "first_name": "Ольга", "last_name": "Кузнецова" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new().await;
    let id = app.create_user().await;
    let other = app.create_user().await;

    let response = app.delete(&format!("/api/v1/users/{id}")).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/api/v1/users/{id}")).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&format!("/api/v1/users/{other}")).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_unknown_user_leaves_store_untouched() {
    let app = TestApp::new().await;
    app.create_user().await;

    let response = app.delete("/api/v1/users/987654321").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.user_count(), 1);
}

#[tokio::test]
async fn test_delete_user_with_rentals_is_conflict() {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let renter = app.create_user().await;
    let item = app.seed_item(owner).await;
    let booked = app
        .book(item, renter, "2025-08-01T10:00:00Z", "2025-08-03T10:00:00Z")
        .await;
    assert_eq!(booked.status, StatusCode::CREATED);

    let as_renter = app.delete(&format!("/api/v1/users/{renter}")).await;
    let as_owner = app.delete(&format!("/api/v1/users/{owner}")).await;

    assert_eq!(as_renter.status, StatusCode::CONFLICT);
    assert_eq!(as_renter.body["code"], 20003);
    assert_eq!(as_renter.body["kind"], "USER_HAS_RENTALS");
    assert_eq!(as_owner.status, StatusCode::CONFLICT);
    assert_eq!(as_owner.body["kind"], "USER_HAS_RENTALS");
    assert_eq!(app.store.user_count(), 2);
}

#[tokio::test]
async fn test_email_longer_than_255_characters_is_rejected() {
    let app = TestApp::new().await;
    let mut payload = user_payload();
    payload["email"] = json!(format!(
        "{}@{}.ru",
        "a".repeat(64),
        vec!["b".repeat(60); 4].join(".")
    ));

    let response = app.post_json("/api/v1/users", payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "email");
    assert_eq!(app.store.user_count(), 0);
}
