//! Merchant module: merchants, gateways, products and transactions.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    list_records, plain_listing,
};
use crate::application::dto::MerchantGatewayView;
use crate::domain::entities::Record;
use crate::domain::entities::merchant::{
    Merchant, MerchantGateway, MerchantProduct, MerchantTransaction,
};
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "Merchant",
    prefix: "/api/merchant/",
    description: "Business accounts, payment gateways, and product management",
    endpoints: &[
        ("merchants", "/api/merchant/list/"),
        ("gateways", "/api/merchant/gateways/"),
        ("products", "/api/merchant/products/"),
        ("transactions", "/api/merchant/transactions/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// `GET /api/merchant/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/merchant/list/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_merchants(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<Merchant>>, ApiError> {
    info!("Listing merchants");
    plain_listing(
        state.stores.merchant.merchants.as_ref(),
        "Merchants endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/merchant/gateways/`. Key material and webhook secrets are
/// never serialized.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_gateways(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<MerchantGatewayView>>, ApiError> {
    info!("Listing merchant gateways");
    let message = "Merchant gateways endpoint";
    let page = list_records(
        state.stores.merchant.gateways.as_ref(),
        message,
        &pagination,
        PAGE_SIZE,
    )
    .await?;

    Ok(Json(ListResponse::new(
        message,
        MerchantGateway::PLURAL,
        page.map(|g| MerchantGatewayView::from(&g)),
        &pagination,
        PAGE_SIZE,
    )))
}

/// `GET /api/merchant/products/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<MerchantProduct>>, ApiError> {
    info!("Listing merchant products");
    plain_listing(
        state.stores.merchant.products.as_ref(),
        "Merchant products endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/merchant/transactions/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<MerchantTransaction>>, ApiError> {
    info!("Listing merchant transactions");
    plain_listing(
        state.stores.merchant.transactions.as_ref(),
        "Merchant transactions endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}
