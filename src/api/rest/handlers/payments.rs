//! Payments module: payment methods, payments and exchange rates.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    plain_listing,
};
use crate::domain::entities::payments::{ExchangeRate, PaymentMethod, PaymentTransaction};
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "Payments",
    prefix: "/api/payments/",
    description: "Fiat-to-MTT conversion and payment processing system",
    endpoints: &[
        ("methods", "/api/payments/methods/"),
        ("transactions", "/api/payments/transactions/"),
        ("exchange_rates", "/api/payments/rates/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// `GET /api/payments/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/payments/methods/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_methods(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<PaymentMethod>>, ApiError> {
    info!("Listing payment methods");
    plain_listing(
        state.stores.payments.methods.as_ref(),
        "Payment methods endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/payments/transactions/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<PaymentTransaction>>, ApiError> {
    info!("Listing payment transactions");
    plain_listing(
        state.stores.payments.transactions.as_ref(),
        "Payment transactions endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/payments/rates/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_rates(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<ExchangeRate>>, ApiError> {
    info!("Listing exchange rates");
    plain_listing(
        state.stores.payments.rates.as_ref(),
        "Exchange rates endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}
