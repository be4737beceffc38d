//! # REST Routes
//!
//! Route definitions for the gateway's HTTP surface.
//!
//! Every path ends in a slash, matching the published URLs.
//!
//! # Route Structure
//!
//! ```text
//! /                          GET  - HTML homepage
//! /health                    GET  - Health check
//! /admin/                    GET  - Record counts per table
//! /api
//! ├── /tokens/               GET  - Module descriptor
//! │   ├── list/ balances/ transfers/ prices/
//! ├── /wallets/              GET  - Module descriptor
//! │   ├── types/             GET, POST
//! │   ├── list/              GET, POST
//! │   └── addresses/ transactions/
//! ├── /merchant/             list/ gateways/ products/ transactions/
//! ├── /customers/            profiles/ kyc/ activities/
//! ├── /payments/             methods/ transactions/ rates/
//! ├── /maythetoken/          pairs/ orders/ liquidity/ routing/
//! ├── /canasale/             config/ erp/ panels/
//! └── /weedvader/            marketplace/ listings/ orders/ payments/
//! ```
//!
//! # Examples
//!
//! ```
//! use mtt_gateway::api::rest::handlers::AppState;
//! use mtt_gateway::api::rest::routes::create_router;
//! use mtt_gateway::infrastructure::persistence::StoreFactory;
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(StoreFactory::InMemory.build()));
//! let router = create_router(state);
//! ```

use crate::api::middleware::logging::{LoggingConfig, LoggingState, logging_middleware};
use crate::api::rest::handlers::{
    AppState, admin, customers, health_check, marketplace, merchant, not_found, payments, site,
    tokens, trading, wallets,
};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Middleware options of the router.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Request logging configuration.
    pub logging: LoggingConfig,
    /// Allowed CORS origins; any origin when empty.
    pub cors_origins: Vec<String>,
    /// Requests running longer are answered with 408.
    pub request_timeout: Option<Duration>,
}

/// Creates the router with all endpoints and middleware.
///
/// # Arguments
///
/// * `state` - Shared application state containing the record stores
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with(state, RouterOptions::default())
}

/// Creates the router with custom middleware options.
pub fn create_router_with(state: Arc<AppState>, options: RouterOptions) -> Router {
    let logging_state = Arc::new(LoggingState::new(options.logging));

    let mut router = routes()
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(logging_state, logging_middleware))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ));
    if let Some(timeout) = options.request_timeout {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Creates a minimal router for testing without middleware.
#[cfg(test)]
pub fn create_test_router(state: Arc<AppState>) -> Router {
    routes().fallback(not_found).with_state(state)
}

fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(site::homepage))
        .route("/health", get(health_check))
        .route("/admin/", get(site::admin_overview))
        // Tokens
        .route("/api/tokens/", get(tokens::overview))
        .route("/api/tokens/list/", get(tokens::list_tokens))
        .route("/api/tokens/balances/", get(tokens::list_balances))
        .route("/api/tokens/transfers/", get(tokens::list_transfers))
        .route("/api/tokens/prices/", get(tokens::list_prices))
        // Wallets
        .route("/api/wallets/", get(wallets::overview))
        .route(
            "/api/wallets/types/",
            get(wallets::list_wallet_types).post(wallets::create_wallet_type),
        )
        .route(
            "/api/wallets/list/",
            get(wallets::list_wallets).post(wallets::create_wallet),
        )
        .route("/api/wallets/addresses/", get(wallets::list_addresses))
        .route("/api/wallets/transactions/", get(wallets::list_transactions))
        // Merchant
        .route("/api/merchant/", get(merchant::overview))
        .route("/api/merchant/list/", get(merchant::list_merchants))
        .route("/api/merchant/gateways/", get(merchant::list_gateways))
        .route("/api/merchant/products/", get(merchant::list_products))
        .route("/api/merchant/transactions/", get(merchant::list_transactions))
        // Customers
        .route("/api/customers/", get(customers::overview))
        .route("/api/customers/profiles/", get(customers::list_profiles))
        .route("/api/customers/kyc/", get(customers::list_kyc))
        .route("/api/customers/activities/", get(customers::list_activities))
        // Payments
        .route("/api/payments/", get(payments::overview))
        .route("/api/payments/methods/", get(payments::list_methods))
        .route("/api/payments/transactions/", get(payments::list_transactions))
        .route("/api/payments/rates/", get(payments::list_rates))
        // MayTheToken
        .route("/api/maythetoken/", get(trading::overview))
        .route("/api/maythetoken/pairs/", get(trading::list_pairs))
        .route("/api/maythetoken/orders/", get(trading::list_orders))
        .route("/api/maythetoken/liquidity/", get(trading::list_liquidity))
        .route("/api/maythetoken/routing/", get(trading::routing_engine))
        // Canasale
        .route("/api/canasale/", get(admin::overview))
        .route("/api/canasale/config/", get(admin::list_config))
        .route("/api/canasale/erp/", get(admin::list_erp))
        .route("/api/canasale/panels/", get(admin::list_panels))
        // WeedVader
        .route("/api/weedvader/", get(marketplace::overview))
        .route("/api/weedvader/marketplace/", get(marketplace::list_marketplaces))
        .route("/api/weedvader/listings/", get(marketplace::list_listings))
        .route("/api/weedvader/orders/", get(marketplace::list_orders))
        .route("/api/weedvader/payments/", get(marketplace::card_payments))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::use_cases::SeedDemoDataUseCase;
    use crate::domain::entities::User;
    use crate::domain::entities::admin::SystemConfiguration;
    use crate::domain::entities::tokens::{TokenTransfer, TransferType};
    use crate::domain::entities::trading::{EngineStatus, RoutingEngine, RoutingStrategy};
    use crate::domain::entities::wallets::{WalletCategory, WalletType};
    use crate::infrastructure::persistence::{RecordStore, StoreFactory};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(StoreFactory::InMemory.build()))
    }

    async fn seeded_state() -> Arc<AppState> {
        let state = create_test_state();
        SeedDemoDataUseCase::new(state.stores.clone())
            .execute()
            .await
            .unwrap();
        state
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(router: Router, uri: &str, body: Value) -> Response {
        router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(serde_json::to_string(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_endpoint() {
        let response = get(create_test_router(create_test_state()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn homepage_is_html() {
        let response = get(create_test_router(create_test_state()), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn module_descriptor_endpoint() {
        let response = get(create_test_router(create_test_state()), "/api/wallets/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "MTT Gateway - Wallets API");
        assert_eq!(body["version"], "1.0");
        assert_eq!(body["endpoints"]["wallets"], "/api/wallets/list/");
    }

    #[tokio::test]
    async fn empty_listing_carries_note() {
        let response = get(create_test_router(create_test_state()), "/api/weedvader/listings/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["message"], "Marketplace listings endpoint");
        assert_eq!(body["status"], "Available");
        assert_eq!(body["count"], 0);
        assert_eq!(body["note"], "No listings found - database empty");
    }

    #[tokio::test]
    async fn balances_listing_resolves_names() {
        let router = create_test_router(seeded_state().await);
        let body = json_body(get(router, "/api/tokens/balances/").await).await;

        let first = &body["results"][0];
        assert_eq!(first["username"], "demo");
        assert_eq!(first["token_symbol"], "MTT");
        assert!(body.get("note").is_none());
    }

    #[tokio::test]
    async fn page_size_is_honored() {
        let router = create_test_router(seeded_state().await);
        let body = json_body(get(router, "/api/weedvader/payments/?page_size=2").await).await;

        assert_eq!(body["count"], 2);
        assert_eq!(body["pagination"]["total_items"], 3);
        assert_eq!(body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn routing_reports_engine_status() {
        let offline = json_body(
            get(create_test_router(create_test_state()), "/api/maythetoken/routing/").await,
        )
        .await;
        assert_eq!(offline["engine_status"], "Offline");

        let online = json_body(
            get(create_test_router(seeded_state().await), "/api/maythetoken/routing/").await,
        )
        .await;
        assert_eq!(online["engine_status"], "Online");
        assert_eq!(online["count"], 1);
    }

    #[tokio::test]
    async fn card_payments_lists_active_processors() {
        let body = json_body(
            get(create_test_router(seeded_state().await), "/api/weedvader/payments/").await,
        )
        .await;

        let active: Vec<&str> = body["payment_processors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(active.len(), 2);
        assert!(active.contains(&"Stripe"));
        assert!(!active.contains(&"Square"));
        assert_eq!(body["supported_processor_types"].as_array().unwrap().len(), 6);
        assert!(body["results"][0].get("api_key").is_none());
    }

    #[tokio::test]
    async fn config_lists_public_entries_only() {
        let body = json_body(
            get(create_test_router(seeded_state().await), "/api/canasale/config/").await,
        )
        .await;

        assert_eq!(body["count"], 3);
        let keys: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["key"].as_str().unwrap())
            .collect();
        assert!(!keys.contains(&"erp.sync_batch_size"));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = get(create_test_router(create_test_state()), "/api/unknown/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn create_wallet_type_endpoint() {
        let state = create_test_state();
        let response = post(
            create_test_router(state.clone()),
            "/api/wallets/types/",
            json!({ "name": "Ledger", "category": "NON_CUSTODIAL" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["name"], "Ledger");

        let duplicate = post(
            create_test_router(state),
            "/api/wallets/types/",
            json!({ "name": "Ledger", "category": "CUSTODIAL" }),
        )
        .await;
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_wallet_type_validation_error() {
        let response = post(
            create_test_router(create_test_state()),
            "/api/wallets/types/",
            json!({ "name": "Paper", "category": "PAPER" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_wallet_endpoint() {
        let state = create_test_state();
        let user = state
            .stores
            .accounts
            .users
            .save(User::new("alice", "alice@example.com"))
            .await
            .unwrap();
        let wallet_type = state
            .stores
            .wallets
            .types
            .save(WalletType::new("MetaMask", WalletCategory::NonCustodial))
            .await
            .unwrap();

        let response = post(
            create_test_router(state.clone()),
            "/api/wallets/list/",
            json!({
                "user_id": user.id,
                "wallet_type_id": wallet_type.id,
                "name": "Main",
                "address": ADDRESS,
                "is_primary": true
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["is_primary"], true);
        assert!(body.get("private_key_encrypted").is_none());
    }

    #[tokio::test]
    async fn create_wallet_unknown_user() {
        let state = create_test_state();
        let wallet_type = state
            .stores
            .wallets
            .types
            .save(WalletType::new("MetaMask", WalletCategory::NonCustodial))
            .await
            .unwrap();

        let response = post(
            create_test_router(state),
            "/api/wallets/list/",
            json!({
                "user_id": uuid::Uuid::new_v4(),
                "wallet_type_id": wallet_type.id,
                "name": "Main",
                "address": ADDRESS
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn full_router_sets_headers() {
        let response = get(create_router(create_test_state()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn configured_cors_origin_is_echoed() {
        let options = RouterOptions {
            cors_origins: vec!["https://mtt.example".to_string(), "bad\norigin".to_string()],
            ..Default::default()
        };
        let router = create_router_with(create_test_state(), options);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("Origin", "https://mtt.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://mtt.example"
        );
    }

    #[tokio::test]
    async fn missing_body_field_is_validation_error() {
        let response = post(
            create_test_router(create_test_state()),
            "/api/wallets/list/",
            json!({ "name": "x" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("application/json"));

        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("user_id"));
        assert_eq!(body["details"]["source"], "body");
    }

    #[tokio::test]
    async fn malformed_page_is_validation_error() {
        let response = get(create_test_router(create_test_state()), "/api/tokens/list/?page=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["source"], "query");
    }

    #[tokio::test]
    async fn inactive_engines_are_not_an_empty_table() {
        let state = create_test_state();
        let mut engine = RoutingEngine::new("Backup Router", RoutingStrategy::Direct);
        engine.status = EngineStatus::Maintenance;
        state.stores.trading.engines.save(engine).await.unwrap();

        let body = json_body(get(create_test_router(state), "/api/maythetoken/routing/").await).await;
        assert_eq!(body["count"], 0);
        assert_eq!(body["engine_status"], "Offline");
        assert_eq!(body["note"], "No active routing engines found");
    }

    #[tokio::test]
    async fn private_config_is_not_an_empty_table() {
        let state = create_test_state();
        let entry = SystemConfiguration::new("erp.sync_batch_size", "500", uuid::Uuid::new_v4());
        state.stores.admin.config.save(entry).await.unwrap();

        let body = json_body(get(create_test_router(state), "/api/canasale/config/").await).await;
        assert_eq!(body["count"], 0);
        assert_eq!(body["note"], "No public configuration entries found");
    }

    #[tokio::test]
    async fn transfers_listing_resolves_both_parties() {
        let state = seeded_state().await;
        let users = state.stores.accounts.users.all().await.unwrap();
        let by_name = |name: &str| users.iter().find(|u| u.username == name).unwrap().id;
        let token = state.stores.tokens.tokens.all().await.unwrap().remove(0);

        let mut transfer = TokenTransfer::new(token.id, rust_decimal::Decimal::TEN, TransferType::Send);
        transfer.from_user_id = Some(by_name("admin"));
        transfer.to_user_id = Some(by_name("demo"));
        state.stores.tokens.transfers.save(transfer).await.unwrap();

        let body = json_body(get(create_test_router(state), "/api/tokens/transfers/").await).await;
        let first = &body["results"][0];
        assert_eq!(first["from_user"], "admin");
        assert_eq!(first["to_user"], "demo");
        assert_eq!(first["token_symbol"], "MTT");
    }
}
