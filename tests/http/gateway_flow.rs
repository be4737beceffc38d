//! # Gateway HTTP Flow Tests
//!
//! Drives the public router end to end: seeding, the wallet write path and
//! the listings that reflect it.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use mtt_gateway::api::rest::{AppState, create_router};
use mtt_gateway::application::SeedDemoDataUseCase;
use mtt_gateway::infrastructure::persistence::StoreFactory;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Helpers
// ============================================================================

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn seeded_router() -> Router {
    let stores = StoreFactory::InMemory.build();
    let summary = SeedDemoDataUseCase::new(stores.clone()).execute().await.unwrap();
    assert!(!summary.skipped);
    create_router(Arc::new(AppState::new(stores)))
}

async fn user_id(router: &Router, username: &str) -> String {
    let (_, wallets) = get(router, "/api/wallets/list/").await;
    let (_, types) = get(router, "/api/wallets/types/").await;
    assert!(types["count"].as_u64().unwrap() > 0);
    wallets["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["username"] == username)
        .map(|w| w["user_id"].as_str().unwrap().to_string())
        .unwrap()
}

// ============================================================================
// Flows
// ============================================================================

#[tokio::test]
async fn new_wallet_type_and_primary_wallet_show_up_in_listings() {
    let router = seeded_router().await;
    let owner = user_id(&router, "demo").await;

    let (status, wallet_type) = post(
        &router,
        "/api/wallets/types/",
        json!({ "name": "Hardware", "category": "NON_CUSTODIAL" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, wallet) = post(
        &router,
        "/api/wallets/list/",
        json!({
            "user_id": owner,
            "wallet_type_id": wallet_type["id"],
            "name": "Cold storage",
            "address": "0x1111111111111111111111111111111111111111",
            "is_primary": true,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(wallet["wallet_type"], "Hardware");

    let (_, wallets) = get(&router, "/api/wallets/list/").await;
    let primaries: Vec<&Value> = wallets["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|w| w["username"] == "demo" && w["is_primary"] == true)
        .collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0]["name"], "Cold storage");
}

#[tokio::test]
async fn duplicate_wallet_address_conflicts_case_insensitively() {
    let router = seeded_router().await;
    let owner = user_id(&router, "demo").await;
    let (_, types) = get(&router, "/api/wallets/types/").await;
    let type_id = types["results"][0]["id"].clone();

    let (status, body) = post(
        &router,
        "/api/wallets/list/",
        json!({
            "user_id": owner,
            "wallet_type_id": type_id,
            "name": "Copy",
            "address": "0x8617e340b3d01fa5f11f306f4090fd50e238070d",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn reseeding_is_skipped() {
    let stores = StoreFactory::InMemory.build();
    let first = SeedDemoDataUseCase::new(stores.clone()).execute().await.unwrap();
    let second = SeedDemoDataUseCase::new(stores.clone()).execute().await.unwrap();
    assert!(first.created > 0);
    assert!(second.skipped);
    assert_eq!(second.created, 0);

    let router = create_router(Arc::new(AppState::new(stores)));
    let (_, overview) = get(&router, "/admin/").await;
    assert_eq!(overview["total_records"].as_u64().unwrap(), first.created as u64);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let router = seeded_router().await;
    let (status, body) = get(&router, "/api/does-not-exist/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
