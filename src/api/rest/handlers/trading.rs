//! MayTheToken module: trading pairs, orders, liquidity pools and the
//! routing engine.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    list_records, plain_listing,
};
use crate::application::dto::LiquidityPoolView;
use crate::application::use_cases::filtered_page;
use crate::domain::entities::Record;
use crate::domain::entities::trading::{
    EngineStatus, LiquidityPool, RoutingEngine, TradeOrder, TradingPair,
};
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "MayTheToken",
    prefix: "/api/maythetoken/",
    description: "Token trading, routing engine, and liquidity management",
    endpoints: &[
        ("trading_pairs", "/api/maythetoken/pairs/"),
        ("orders", "/api/maythetoken/orders/"),
        ("liquidity", "/api/maythetoken/liquidity/"),
        ("routing", "/api/maythetoken/routing/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// Body of `GET /api/maythetoken/routing/`.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingResponse {
    /// Active engines.
    #[serde(flatten)]
    pub engines: ListResponse<RoutingEngine>,
    /// `"Online"` while at least one engine is active.
    pub engine_status: &'static str,
}

/// `GET /api/maythetoken/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/maythetoken/pairs/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_pairs(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<TradingPair>>, ApiError> {
    info!("Listing trading pairs");
    plain_listing(
        state.stores.trading.pairs.as_ref(),
        "Trading pairs endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/maythetoken/orders/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<TradeOrder>>, ApiError> {
    info!("Listing trade orders");
    plain_listing(
        state.stores.trading.orders.as_ref(),
        "Trade orders endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/maythetoken/liquidity/`, with each pool's spot price.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_liquidity(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<LiquidityPoolView>>, ApiError> {
    info!("Listing liquidity pools");
    let message = "Liquidity pools endpoint";
    let page = list_records(state.stores.trading.pools.as_ref(), message, &pagination, PAGE_SIZE).await?;

    Ok(Json(ListResponse::new(
        message,
        LiquidityPool::PLURAL,
        page.map(LiquidityPoolView::from),
        &pagination,
        PAGE_SIZE,
    )))
}

/// `GET /api/maythetoken/routing/`
///
/// Lists the active engines; the engine is online while any exists.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn routing_engine(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<RoutingResponse>, ApiError> {
    info!("Reading routing engine status");
    let limit = pagination.limit(PAGE_SIZE) as usize;
    let offset = pagination.offset(PAGE_SIZE) as usize;

    let page = filtered_page(state.stores.trading.engines.as_ref(), offset, limit, |e| {
        e.status == EngineStatus::Active
    })
    .await
    .map_err(|e| {
        error!("Failed to read routing engines: {}", e);
        ApiError::from(e)
    })?;

    let online = !page.is_empty();
    let mut engines = ListResponse::new(
        "Routing engine endpoint",
        RoutingEngine::PLURAL,
        page,
        &pagination,
        PAGE_SIZE,
    )
    .with_filter_note("No active routing engines found");
    if online {
        engines.note = Some("Routing engine is operational".to_string());
    }

    Ok(Json(RoutingResponse {
        engines,
        engine_status: if online { "Online" } else { "Offline" },
    }))
}
