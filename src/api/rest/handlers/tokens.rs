//! Token module: tokens, balances, transfers and prices.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    list_records, plain_listing,
};
use crate::application::dto::{TokenBalanceView, TokenPriceView, TokenTransferView};
use crate::application::use_cases::resolve_names;
use crate::domain::entities::{Record, User};
use crate::domain::entities::tokens::{Token, TokenBalance, TokenPrice, TokenTransfer};
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "Tokens",
    prefix: "/api/tokens/",
    description: "MTT token management, balances, transfers, and pricing system",
    endpoints: &[
        ("tokens", "/api/tokens/list/"),
        ("balances", "/api/tokens/balances/"),
        ("transfers", "/api/tokens/transfers/"),
        ("prices", "/api/tokens/prices/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// `GET /api/tokens/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/tokens/list/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_tokens(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<Token>>, ApiError> {
    info!("Listing tokens");
    plain_listing(state.stores.tokens.tokens.as_ref(), "Tokens endpoint", &pagination, PAGE_SIZE).await
}

/// `GET /api/tokens/balances/`, with owner and token names.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if a store fails.
#[instrument(skip(state))]
pub async fn list_balances(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<TokenBalanceView>>, ApiError> {
    info!("Listing token balances");
    let message = "Token balances endpoint";
    let stores = &state.stores;
    let page = list_records(stores.tokens.balances.as_ref(), message, &pagination, PAGE_SIZE).await?;

    let users = resolve_names(
        stores.accounts.users.as_ref(),
        page.items.iter().map(|b| b.user_id),
        |u: &User| u.username.clone(),
    )
    .await?;
    let tokens = resolve_names(
        stores.tokens.tokens.as_ref(),
        page.items.iter().map(|b| b.token_id),
        |t: &Token| t.symbol.clone(),
    )
    .await?;

    let page = page.map(|b| TokenBalanceView::new(b, &users, &tokens));
    Ok(Json(ListResponse::new(
        message,
        TokenBalance::PLURAL,
        page,
        &pagination,
        PAGE_SIZE,
    )))
}

/// `GET /api/tokens/transfers/`, with sender, recipient and token names.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if a store fails.
#[instrument(skip(state))]
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<TokenTransferView>>, ApiError> {
    info!("Listing token transfers");
    let message = "Token transfers endpoint";
    let stores = &state.stores;
    let page = list_records(stores.tokens.transfers.as_ref(), message, &pagination, PAGE_SIZE).await?;

    let user_ids: Vec<_> = page
        .items
        .iter()
        .flat_map(|t| [t.from_user_id, t.to_user_id])
        .flatten()
        .collect();
    let users = resolve_names(
        stores.accounts.users.as_ref(),
        user_ids,
        |u: &User| u.username.clone(),
    )
    .await?;
    let tokens = resolve_names(
        stores.tokens.tokens.as_ref(),
        page.items.iter().map(|t| t.token_id),
        |t: &Token| t.symbol.clone(),
    )
    .await?;

    let page = page.map(|t| TokenTransferView::new(t, &users, &tokens));
    Ok(Json(ListResponse::new(
        message,
        TokenTransfer::PLURAL,
        page,
        &pagination,
        PAGE_SIZE,
    )))
}

/// `GET /api/tokens/prices/`, with the token symbol.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if a store fails.
#[instrument(skip(state))]
pub async fn list_prices(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<TokenPriceView>>, ApiError> {
    info!("Listing token prices");
    let message = "Token prices endpoint";
    let stores = &state.stores;
    let page = list_records(stores.tokens.prices.as_ref(), message, &pagination, PAGE_SIZE).await?;

    let tokens = resolve_names(
        stores.tokens.tokens.as_ref(),
        page.items.iter().map(|p| p.token_id),
        |t: &Token| t.symbol.clone(),
    )
    .await?;

    let page = page.map(|p| TokenPriceView::new(p, &tokens));
    Ok(Json(ListResponse::new(
        message,
        TokenPrice::PLURAL,
        page,
        &pagination,
        PAGE_SIZE,
    )))
}
