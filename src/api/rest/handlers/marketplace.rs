//! WeedVader module: marketplaces, listings, orders and card payment
//! processing.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    list_records, plain_listing,
};
use crate::application::dto::CardProcessorView;
use crate::domain::entities::Record;
use crate::domain::entities::marketplace::{
    CardPaymentProcessor, Marketplace, MarketplaceListing, MarketplaceOrder, ProcessorType,
};
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "WeedVader",
    prefix: "/api/weedvader/",
    description: "Marketplace functionality and card payment processing",
    endpoints: &[
        ("marketplace", "/api/weedvader/marketplace/"),
        ("listings", "/api/weedvader/listings/"),
        ("orders", "/api/weedvader/orders/"),
        ("payments", "/api/weedvader/payments/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// Body of `GET /api/weedvader/payments/`.
#[derive(Debug, Clone, Serialize)]
pub struct CardPaymentsResponse {
    /// Configured processors, without credentials.
    #[serde(flatten)]
    pub processors: ListResponse<CardProcessorView>,
    /// Names of the processors taking traffic.
    pub payment_processors: Vec<String>,
    /// Every processor product the gateway integrates with.
    pub supported_processor_types: Vec<&'static str>,
}

/// `GET /api/weedvader/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/weedvader/marketplace/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_marketplaces(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<Marketplace>>, ApiError> {
    info!("Listing marketplaces");
    plain_listing(
        state.stores.marketplace.marketplaces.as_ref(),
        "Marketplace endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/weedvader/listings/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<MarketplaceListing>>, ApiError> {
    info!("Listing marketplace listings");
    plain_listing(
        state.stores.marketplace.listings.as_ref(),
        "Marketplace listings endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/weedvader/orders/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<MarketplaceOrder>>, ApiError> {
    info!("Listing marketplace orders");
    plain_listing(
        state.stores.marketplace.orders.as_ref(),
        "Marketplace orders endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/weedvader/payments/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn card_payments(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<CardPaymentsResponse>, ApiError> {
    info!("Reading card payment processors");
    let message = "Card payment processing endpoint";
    let store = state.stores.marketplace.card_processors.as_ref();

    let payment_processors = store
        .all()
        .await
        .map_err(|e| {
            error!("Failed to read card processors: {}", e);
            ApiError::from(e)
        })?
        .into_iter()
        .filter(CardPaymentProcessor::is_active)
        .map(|p| p.name)
        .collect();

    let page = list_records(store, message, &pagination, PAGE_SIZE).await?;
    let processors = ListResponse::new(
        message,
        CardPaymentProcessor::PLURAL,
        page.map(|p| CardProcessorView::from(&p)),
        &pagination,
        PAGE_SIZE,
    );

    Ok(Json(CardPaymentsResponse {
        processors,
        payment_processors,
        supported_processor_types: ProcessorType::ALL.iter().map(|t| t.label()).collect(),
    }))
}
