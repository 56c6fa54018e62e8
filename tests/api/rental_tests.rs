//! Rental API Tests

use std::sync::Arc;

use axum::http::StatusCode;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::{id_of, rental_payload, TestApp};

const JUNE_1: &str = "2025-06-01T00:00:00Z";
const JUNE_5: &str = "2025-06-05T00:00:00Z";

/// App with one owner, one renter and one item
async fn marketplace() -> (TestApp, i64, i64, i64) {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let renter = app.create_user().await;
    let item = app.seed_item(owner).await;
    (app, owner, renter, item)
}

#[tokio::test]
async fn test_create_rental_is_pending() {
    let (app, _, renter, item) = marketplace().await;

    let response = app.book(item, renter, JUNE_1, JUNE_5).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "PENDING");
    assert!(response.body["id"].is_string());
    assert_eq!(response.body["item_id"], item.to_string());
    assert_eq!(response.body["renter_id"], renter.to_string());
    assert_eq!(response.body["total_price"], "2500.00");
    assert_eq!(response.body["start_date"], JUNE_1);
}

#[test_case("2025-05-28T00:00:00Z", "2025-06-01T00:00:00Z" ; "ends exactly when existing starts")]
#[test_case("2025-06-05T00:00:00Z", "2025-06-09T00:00:00Z" ; "starts exactly when existing ends")]
#[test_case("2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z" ; "inside existing")]
#[test_case("2025-05-01T00:00:00Z", "2025-07-01T00:00:00Z" ; "covers existing")]
#[tokio::test]
async fn test_overlapping_booking_is_conflict(start: &str, end: &str) {
    let (app, _, renter, item) = marketplace().await;
    assert_eq!(app.book(item, renter, JUNE_1, JUNE_5).await.status, StatusCode::CREATED);

    let response = app.book(item, renter, start, end).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], 30004);
    assert_eq!(response.body["kind"], "BOOKING_CONFLICT");
    assert_eq!(app.store.rental_count(), 1);
}

#[test_case("2025-05-20T00:00:00Z", "2025-05-31T23:59:59Z" ; "just before")]
#[test_case("2025-06-05T00:00:01Z", "2025-06-09T00:00:00Z" ; "just after")]
#[tokio::test]
async fn test_adjacent_booking_is_accepted(start: &str, end: &str) {
    let (app, _, renter, item) = marketplace().await;
    assert_eq!(app.book(item, renter, JUNE_1, JUNE_5).await.status, StatusCode::CREATED);

    let response = app.book(item, renter, start, end).await;

    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_same_dates_on_another_item_are_accepted() {
    let (app, owner, renter, item) = marketplace().await;
    let other_item = app.seed_item(owner).await;

    assert_eq!(app.book(item, renter, JUNE_1, JUNE_5).await.status, StatusCode::CREATED);
    assert_eq!(app.book(other_item, renter, JUNE_1, JUNE_5).await.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancelled_rental_still_blocks_its_dates() {
    let (app, _, renter, item) = marketplace().await;
    let created = app.book(item, renter, JUNE_1, JUNE_5).await;
    let id = id_of(&created.body["id"]);
    app.patch_json(&format!("/api/v1/rentals/{id}/status"), json!({ "status": "CANCELLED" }))
        .await;

    let response = app.book(item, renter, JUNE_1, JUNE_5).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_rental_with_unknown_references() {
    let (app, _, renter, item) = marketplace().await;

    let no_item = app.book(999, renter, JUNE_1, JUNE_5).await;
    let no_renter = app.book(item, 999, JUNE_1, JUNE_5).await;

    assert_eq!(no_item.status, StatusCode::NOT_FOUND);
    assert_eq!(no_item.body["code"], 30002);
    assert_eq!(no_item.body["kind"], "ITEM_NOT_FOUND");
    assert_eq!(no_renter.status, StatusCode::NOT_FOUND);
    assert_eq!(no_renter.body["code"], 30003);
    assert_eq!(no_renter.body["kind"], "RENTER_NOT_FOUND");
}

#[tokio::test]
async fn test_reversed_period_is_rejected() {
    let (app, _, renter, item) = marketplace().await;

    let response = app.book(item, renter, JUNE_5, JUNE_1).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "end_date");
    assert_eq!(app.store.rental_count(), 0);
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let (app, _, renter, item) = marketplace().await;
    let mut payload = rental_payload(item, renter, JUNE_1, JUNE_5);
    payload["total_price"] = json!("-10.00");

    let response = app.post_json("/api/v1/rentals", payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], "total_price");
}

#[test_case("0.005", "2500.00", "total_price" ; "fraction of a cent")]
#[test_case("2500.00", "123456789012345.00", "deposit_amount" ; "beyond numeric column")]
#[tokio::test]
async fn test_money_outside_column_precision_is_rejected(total: &str, deposit: &str, field: &str) {
    let (app, _, renter, item) = marketplace().await;
    let mut payload = rental_payload(item, renter, JUNE_1, JUNE_5);
    payload["total_price"] = json!(total);
    payload["deposit_amount"] = json!(deposit);

    let response = app.post_json("/api/v1/rentals", payload).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["field"], field);
    assert_eq!(app.store.rental_count(), 0);
}

#[tokio::test]
async fn test_numeric_ids_are_still_accepted() {
    let (app, _, renter, item) = marketplace().await;
    let mut payload = rental_payload(item, renter, JUNE_1, JUNE_5);
    payload["item_id"] = json!(item);
    payload["renter_id"] = json!(renter);

    let response = app.post_json("/api/v1/rentals", payload).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["item_id"], item.to_string());
}

#[tokio::test]
async fn test_get_rental() {
    let (app, _, renter, item) = marketplace().await;
    let id = id_of(&app.book(item, renter, JUNE_1, JUNE_5).await.body["id"]);

    let found = app.get(&format!("/api/v1/rentals/{id}")).await;
    let missing = app.get("/api/v1/rentals/1").await;

    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["id"], id.to_string());
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["kind"], "RENTAL_NOT_FOUND");
}

#[tokio::test]
async fn test_status_can_move_between_any_values() {
    let (app, _, renter, item) = marketplace().await;
    let id = id_of(&app.book(item, renter, JUNE_1, JUNE_5).await.body["id"]);
    let uri = format!("/api/v1/rentals/{id}/status");

    for status in ["COMPLETED", "PENDING", "CANCELLED", "ACTIVE", "CONFIRMED", "CONFIRMED"] {
        let response = app.patch_json(&uri, json!({ "status": status })).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["status"], status);
    }
}

#[tokio::test]
async fn test_status_update_errors() {
    let (app, _, renter, item) = marketplace().await;
    let id = id_of(&app.book(item, renter, JUNE_1, JUNE_5).await.body["id"]);

    let unknown_status = app
        .patch_json(&format!("/api/v1/rentals/{id}/status"), json!({ "status": "LOST" }))
        .await;
    let missing = app
        .patch_json("/api/v1/rentals/5/status", json!({ "status": "ACTIVE" }))
        .await;

    assert_eq!(unknown_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rentals_by_renter_and_owner_are_paginated() {
    let (app, owner, renter, item) = marketplace().await;
    let other_owner = app.create_user().await;
    let foreign_item = app.seed_item(other_owner).await;

    for day in 1..=5 {
        let start = format!("2025-09-{:02}T10:00:00Z", day * 2);
        let end = format!("2025-09-{:02}T18:00:00Z", day * 2);
        assert_eq!(app.book(item, renter, &start, &end).await.status, StatusCode::CREATED);
    }
    app.book(foreign_item, renter, JUNE_1, JUNE_5).await;

    let first = app.get(&format!("/api/v1/users/{renter}/rentals?page=0&size=4")).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["items"].as_array().unwrap().len(), 4);
    assert_eq!(first.body["total"], 6);
    assert_eq!(first.body["total_pages"], 2);

    let second = app.get(&format!("/api/v1/users/{renter}/rentals?page=1&size=4")).await;
    assert_eq!(second.body["items"].as_array().unwrap().len(), 2);

    let owned = app.get(&format!("/api/v1/users/{owner}/owned-rentals")).await;
    assert_eq!(owned.body["total"], 5);
    assert_eq!(owned.body["size"], 20);
    let items = owned.body["items"].as_array().unwrap();
    assert!(items.iter().all(|r| r["item_id"] == item.to_string()));

    let ids: Vec<i64> = items.iter().map(|r| id_of(&r["id"])).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);

    let nobody = app.get(&format!("/api/v1/users/{other_owner}/rentals")).await;
    assert_eq!(nobody.body["total"], 0);
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let (app, _, renter, _) = marketplace().await;

    let response = app
        .get(&format!("/api/v1/users/{renter}/rentals?size=100000"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["size"], 100);
}

#[tokio::test]
async fn test_item_rentals_filtered_by_status() {
    let (app, owner, renter, item) = marketplace().await;
    let other_item = app.seed_item(owner).await;
    let mut ids = Vec::new();
    for day in 1..=4 {
        let start = format!("2025-11-{:02}T10:00:00Z", day * 3);
        let end = format!("2025-11-{:02}T18:00:00Z", day * 3);
        ids.push(id_of(&app.book(item, renter, &start, &end).await.body["id"]));
    }
    app.book(other_item, renter, JUNE_1, JUNE_5).await;
    for (id, status) in [(ids[1], "CONFIRMED"), (ids[2], "CANCELLED"), (ids[3], "ACTIVE")] {
        app.patch_json(&format!("/api/v1/rentals/{id}/status"), json!({ "status": status }))
            .await;
    }
    let listed = |body: &serde_json::Value| -> Vec<i64> {
        body.as_array().unwrap().iter().map(|r| id_of(&r["id"])).collect()
    };

    let pending = app.get(&format!("/api/v1/items/{item}/rentals?status=PENDING")).await;
    let live = app
        .get(&format!("/api/v1/items/{item}/rentals?status=PENDING&status=CONFIRMED"))
        .await;
    let all = app.get(&format!("/api/v1/items/{item}/rentals")).await;

    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(listed(&pending.body), vec![ids[0]]);
    assert_eq!(listed(&live.body), vec![ids[0], ids[1]]);
    assert_eq!(listed(&all.body), ids);
}

#[tokio::test]
async fn test_item_rentals_errors() {
    let (app, _, _, item) = marketplace().await;

    let unknown_status = app.get(&format!("/api/v1/items/{item}/rentals?status=LOST")).await;
    let unknown_item = app.get("/api/v1/items/1/rentals").await;
    let empty = app.get(&format!("/api/v1/items/{item}/rentals")).await;

    assert_eq!(unknown_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_item.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_item.body["kind"], "ITEM_NOT_FOUND");
    assert_eq!(empty.body, json!([]));
}

#[tokio::test]
async fn test_check_availability() {
    let (app, _, renter, item) = marketplace().await;
    let booked = app.book(item, renter, JUNE_1, JUNE_5).await.body["id"].clone();

    let busy = app
        .get(&format!(
            "/api/v1/items/{item}/availability?start=2025-06-05T00:00:00Z&end=2025-06-07T00:00:00Z"
        ))
        .await;
    let free = app
        .get(&format!(
            "/api/v1/items/{item}/availability?start=2025-06-06T00:00:00Z&end=2025-06-07T00:00:00Z"
        ))
        .await;
    let unknown = app
        .get("/api/v1/items/1/availability?start=2025-06-06T00:00:00Z&end=2025-06-07T00:00:00Z")
        .await;

    assert_eq!(busy.status, StatusCode::OK);
    assert_eq!(busy.body["available"], false);
    assert_eq!(busy.body["conflicts"][0]["id"], booked);
    assert_eq!(free.body["available"], true);
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_bookings_accept_exactly_one() {
    let (app, _, renter, item) = marketplace().await;
    let app = Arc::new(app);

    let attempts = (0..16).map(|i| {
        let app = Arc::clone(&app);
        let start = format!("2025-10-{:02}T00:00:00Z", 1 + i % 3);
        let end = format!("2025-10-{:02}T00:00:00Z", 5 + i % 3);
        tokio::spawn(async move { app.book(item, renter, &start, &end).await.status })
    });
    let statuses: Vec<StatusCode> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(app.store.rental_count(), 1);
}
