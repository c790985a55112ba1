//! HTTP-level integration tests for the `/points` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.
//! Registration goes through the real multipart path and writes images into
//! a temporary directory.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, build_test_app, get, post_multipart, registration_form, TestApp,
    TEST_BASE_URL,
};
use serde_json::Value;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn count(pool: &PgPool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

/// Register a point through the API and return its JSON body.
async fn register(test: &TestApp, name: &str, city: &str, uf: &str, items: &str) -> Value {
    let response = post_multipart(
        test.app(),
        "/points",
        registration_form(name, city, uf, items),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "registration of {name}");
    body_json(response).await
}

async fn item_titles(test: &TestApp, ids: &[i64]) -> Vec<String> {
    let json = body_json(get(test.app(), "/items").await).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| ids.contains(&i["id"].as_i64().unwrap()))
        .map(|i| i["title"].as_str().unwrap().to_string())
        .collect()
}

fn ids_of(points: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = points
        .as_array()
        .expect("points should be an array")
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

// ---------------------------------------------------------------------------
// Test: POST /points + GET /points/{id} roundtrip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_and_get_point(pool: PgPool) {
    let test = build_test_app(pool);

    let created = register(&test, "Eco Rio", "Rio de Janeiro", "rj", "1, 2").await;
    let id = created["id"].as_i64().expect("id should be returned");
    assert_eq!(created["name"], "Eco Rio");
    assert_eq!(created["email"], "contato@example.com");
    assert_eq!(created["whatsapp"], "5511987654321");
    assert_eq!(created["latitude"], -22.9068);
    assert_eq!(created["longitude"], -43.1729);
    assert_eq!(created["city"], "Rio de Janeiro");
    assert_eq!(created["uf"], "RJ");

    let image = created["image"].as_str().unwrap();
    assert!(image.ends_with("-point.png"), "unexpected stored name {image}");
    assert_eq!(
        created["image_url"],
        format!("{TEST_BASE_URL}/images/{image}")
    );

    let response = get(test.app(), &format!("/points/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["point"]["id"], id);
    assert_eq!(fetched["point"]["image"], image);

    let titles: Vec<String> = fetched["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, item_titles(&test, &[1, 2]).await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_uploaded_image_is_served(pool: PgPool) {
    let test = build_test_app(pool);
    let created = register(&test, "Served", "Recife", "PE", "3").await;
    let image = created["image"].as_str().unwrap();

    let response = get(test.app(), &format!("/images/{image}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"\x89PNG\r\n\x1a\nfake");
}

// ---------------------------------------------------------------------------
// Test: Registration failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_with_unknown_item_is_atomic(pool: PgPool) {
    let test = build_test_app(pool.clone());

    let response = post_multipart(
        test.app(),
        "/points",
        registration_form("Ghost", "Recife", "PE", "1,2,9999"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONSTRAINT_VIOLATION");
    assert_eq!(json["message"], "One or more referenced items do not exist");

    assert_eq!(count(&pool, "points").await, 0);
    assert_eq!(count(&pool, "point_items").await, 0);
    assert_eq!(test.stored_image_count(), 0, "orphaned image should be removed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_with_malformed_items_is_validation_error(pool: PgPool) {
    let test = build_test_app(pool.clone());

    let response = post_multipart(
        test.app(),
        "/points",
        registration_form("Typo", "Recife", "PE", "1,two"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    assert_eq!(count(&pool, "points").await, 0);
    assert_eq!(test.stored_image_count(), 0, "nothing stored before validation");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_missing_field(pool: PgPool) {
    let test = build_test_app(pool);

    let form = common::MultipartBuilder::new()
        .text("name", "No email")
        .text("whatsapp", "5511987654321")
        .text("latitude", "1")
        .text("longitude", "1")
        .text("city", "Recife")
        .text("uf", "PE")
        .text("items", "1")
        .file("image", "a.png", b"png");
    let response = post_multipart(test.app(), "/points", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_without_image(pool: PgPool) {
    let test = build_test_app(pool.clone());

    let form = common::MultipartBuilder::new()
        .text("name", "No photo")
        .text("email", "a@b.com")
        .text("whatsapp", "5511987654321")
        .text("latitude", "1")
        .text("longitude", "1")
        .text("city", "Recife")
        .text("uf", "PE")
        .text("items", "1");
    let response = post_multipart(test.app(), "/points", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "points").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_unsupported_image(pool: PgPool) {
    let test = build_test_app(pool);

    let form = registration_form("Exe", "Recife", "PE", "1").file("image", "run.exe", b"MZ");
    let response = post_multipart(test.app(), "/points", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test.stored_image_count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_image_over_size_limit(pool: PgPool) {
    let test = build_test_app(pool.clone());

    // One byte over `max_upload_bytes`, still inside the request body limit.
    let image = vec![0u8; 64 * 1024 + 1];
    let form = registration_form("Big", "Recife", "PE", "1").file("image", "big.png", &image);
    let response = post_multipart(test.app(), "/points", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"].as_str().unwrap().contains("maximum size"));

    assert_eq!(count(&pool, "points").await, 0);
    assert_eq!(test.stored_image_count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_body_over_request_limit(pool: PgPool) {
    let test = build_test_app(pool.clone());

    // Larger than the image limit plus the form-field allowance.
    let image = vec![0u8; 200_000];
    let form = registration_form("Huge", "Recife", "PE", "1").file("image", "huge.png", &image);
    let response = post_multipart(test.app(), "/points", form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");

    assert_eq!(count(&pool, "points").await, 0);
    assert_eq!(test.stored_image_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: GET /points/{id} for a missing point
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_point_returns_404(pool: PgPool) {
    let test = build_test_app(pool);

    let response = get(test.app(), "/points/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Point is not found!");
    assert!(json.get("point").is_none(), "no partial body");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_point_with_unresolvable_id_returns_404(pool: PgPool) {
    let test = build_test_app(pool);

    for uri in ["/points/abc", "/points/99999999999999999999", "/points/0", "/points/-3"] {
        let response = get(test.app(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND", "{uri}");
        assert_eq!(json["message"], "Point is not found!", "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Test: GET /points discovery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_or_semantics(pool: PgPool) {
    let test = build_test_app(pool);

    let a = register(&test, "A", "Springfield", "IL", "1").await;
    let b = register(&test, "B", "Springfield", "IL", "2").await;
    register(&test, "C", "Springfield", "IL", "4").await;

    let response = get(test.app(), "/points?city=Springfield&uf=IL&items=1,2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let points = body_json(response).await;

    assert_eq!(
        ids_of(&points),
        vec![a["id"].as_i64().unwrap(), b["id"].as_i64().unwrap()]
    );
    assert!(points[0]["image_url"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_returns_point_once(pool: PgPool) {
    let test = build_test_app(pool);

    let both = register(&test, "Both", "Springfield", "IL", "1,2").await;

    let points = body_json(get(test.app(), "/points?city=Springfield&uf=IL&items=1,%202").await).await;
    assert_eq!(ids_of(&points), vec![both["id"].as_i64().unwrap()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_exact_city_and_state(pool: PgPool) {
    let test = build_test_app(pool);

    register(&test, "IL point", "Springfield", "IL", "1").await;

    let points = body_json(get(test.app(), "/points?city=Springfield&uf=CA&items=1").await).await;
    assert_eq!(points, serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discovery_requires_parameters(pool: PgPool) {
    let test = build_test_app(pool);

    let response = get(test.app(), "/points?city=Springfield&uf=IL").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(test.app(), "/points?city=Springfield&uf=IL&items=x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
