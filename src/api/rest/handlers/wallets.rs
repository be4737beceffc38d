//! Wallet module: wallet types, wallets, addresses and transactions.
//!
//! The only write endpoints of the gateway live here: creating a wallet
//! type and creating a wallet.

use super::{
    ApiError, ApiJson, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo,
    PaginationParams, list_records, plain_listing,
};
use crate::application::dto::{CreateWalletRequest, CreateWalletTypeRequest, WalletView};
use crate::application::use_cases::resolve_names;
use crate::domain::entities::wallets::{Wallet, WalletAddress, WalletTransaction, WalletType};
use crate::domain::entities::{Record, User};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "Wallets",
    prefix: "/api/wallets/",
    description: "Custodial and non-custodial wallet management with security features",
    endpoints: &[
        ("wallet_types", "/api/wallets/types/"),
        ("wallets", "/api/wallets/list/"),
        ("addresses", "/api/wallets/addresses/"),
        ("transactions", "/api/wallets/transactions/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// `GET /api/wallets/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/wallets/types/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_wallet_types(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<WalletType>>, ApiError> {
    info!("Listing wallet types");
    plain_listing(
        state.stores.wallets.types.as_ref(),
        "Wallet types endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `POST /api/wallets/types/`
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the request is invalid.
/// Returns `CONFLICT` if the name is taken.
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state, request))]
pub async fn create_wallet_type(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateWalletTypeRequest>,
) -> Result<(StatusCode, Json<WalletType>), ApiError> {
    info!("Creating wallet type: {}", request.name);

    let created = state
        .create_wallet_type
        .execute(request)
        .await
        .map_err(|e| {
            warn!("Wallet type rejected: {}", e);
            ApiError::from(e)
        })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/wallets/list/`, with owner and wallet type names.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if a store fails.
#[instrument(skip(state))]
pub async fn list_wallets(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<WalletView>>, ApiError> {
    info!("Listing wallets");
    let message = "Wallets endpoint";
    let stores = &state.stores;
    let page = list_records(stores.wallets.wallets.as_ref(), message, &pagination, PAGE_SIZE).await?;

    let users = resolve_names(
        stores.accounts.users.as_ref(),
        page.items.iter().map(|w| w.user_id),
        |u: &User| u.username.clone(),
    )
    .await?;
    let types = resolve_names(
        stores.wallets.types.as_ref(),
        page.items.iter().map(|w| w.wallet_type_id),
        |t: &WalletType| t.name.clone(),
    )
    .await?;

    let page = page.map(|w| WalletView::new(&w, &users, &types));
    Ok(Json(ListResponse::new(
        message,
        Wallet::PLURAL,
        page,
        &pagination,
        PAGE_SIZE,
    )))
}

/// `POST /api/wallets/list/`
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the request or address is invalid.
/// Returns `NOT_FOUND` if the owner or wallet type does not exist.
/// Returns `CONFLICT` if the address, or the name for this owner, is taken.
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state, request))]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateWalletRequest>,
) -> Result<(StatusCode, Json<WalletView>), ApiError> {
    info!("Creating wallet for user: {}", request.user_id);

    let created = state.create_wallet.execute(request).await.map_err(|e| {
        warn!("Wallet rejected: {}", e);
        ApiError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/wallets/addresses/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_addresses(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<WalletAddress>>, ApiError> {
    info!("Listing wallet addresses");
    plain_listing(
        state.stores.wallets.addresses.as_ref(),
        "Wallet addresses endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/wallets/transactions/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<WalletTransaction>>, ApiError> {
    info!("Listing wallet transactions");
    plain_listing(
        state.stores.wallets.transactions.as_ref(),
        "Wallet transactions endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}
