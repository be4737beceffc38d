//! Canasale module: system configuration, ERP integrations and admin
//! panels.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    list_records, plain_listing,
};
use crate::application::dto::{ConfigEntryView, ErpIntegrationView};
use crate::application::use_cases::filtered_page;
use crate::domain::entities::Record;
use crate::domain::entities::admin::{AdminPanel, ErpIntegration, SystemConfiguration};
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "Canasale",
    prefix: "/api/canasale/",
    description: "ERP integration, admin panels, and system configuration",
    endpoints: &[
        ("system_config", "/api/canasale/config/"),
        ("erp_integration", "/api/canasale/erp/"),
        ("admin_panels", "/api/canasale/panels/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// `GET /api/canasale/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/canasale/config/`. Only public entries are listed.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_config(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<ConfigEntryView>>, ApiError> {
    info!("Listing public configuration");
    let limit = pagination.limit(PAGE_SIZE) as usize;
    let offset = pagination.offset(PAGE_SIZE) as usize;

    let page = filtered_page(state.stores.admin.config.as_ref(), offset, limit, |c| c.is_public)
        .await
        .map_err(|e| {
            error!("Failed to read configuration: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(ListResponse::new(
        "System configuration endpoint",
        SystemConfiguration::PLURAL,
        page.map(|c| ConfigEntryView::from(&c)),
        &pagination,
        PAGE_SIZE,
    )
    .with_filter_note("No public configuration entries found")))
}

/// `GET /api/canasale/erp/`. Credentials are never serialized.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_erp(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<ErpIntegrationView>>, ApiError> {
    info!("Listing ERP integrations");
    let message = "ERP integration endpoint";
    let page = list_records(state.stores.admin.erp.as_ref(), message, &pagination, PAGE_SIZE).await?;

    Ok(Json(ListResponse::new(
        message,
        ErpIntegration::PLURAL,
        page.map(|i| ErpIntegrationView::from(&i)),
        &pagination,
        PAGE_SIZE,
    )))
}

/// `GET /api/canasale/panels/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_panels(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<AdminPanel>>, ApiError> {
    info!("Listing admin panels");
    plain_listing(
        state.stores.admin.panels.as_ref(),
        "Admin panels endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}
