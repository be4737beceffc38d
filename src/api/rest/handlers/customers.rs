//! Customer module: profiles, KYC records and activity.

use super::{
    ApiError, ApiQuery, AppState, ListResponse, ModuleDescriptor, ModuleInfo, PaginationParams,
    list_records, plain_listing,
};
use crate::application::dto::CustomerProfileView;
use crate::application::use_cases::resolve_names;
use crate::domain::entities::customers::{CustomerActivity, CustomerKyc, CustomerProfile};
use crate::domain::entities::{Record, User};
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::{info, instrument};

/// Module descriptor.
pub const MODULE: ModuleInfo = ModuleInfo {
    name: "Customers",
    prefix: "/api/customers/",
    description: "User profiles, KYC verification, and activity tracking",
    endpoints: &[
        ("profiles", "/api/customers/profiles/"),
        ("kyc", "/api/customers/kyc/"),
        ("activities", "/api/customers/activities/"),
    ],
};

const PAGE_SIZE: u32 = 10;

/// Activity feeds show a longer page.
const ACTIVITY_PAGE_SIZE: u32 = 20;

/// `GET /api/customers/`
pub async fn overview() -> Json<ModuleDescriptor> {
    Json(ModuleDescriptor::from(&MODULE))
}

/// `GET /api/customers/profiles/`, with username and full name.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if a store fails.
#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<CustomerProfileView>>, ApiError> {
    info!("Listing customer profiles");
    let message = "Customer profiles endpoint";
    let stores = &state.stores;
    let page = list_records(stores.customers.profiles.as_ref(), message, &pagination, PAGE_SIZE).await?;

    let users = resolve_names(
        stores.accounts.users.as_ref(),
        page.items.iter().map(|p| p.user_id),
        |u: &User| u.username.clone(),
    )
    .await?;

    Ok(Json(ListResponse::new(
        message,
        CustomerProfile::PLURAL,
        page.map(|p| CustomerProfileView::new(p, &users)),
        &pagination,
        PAGE_SIZE,
    )))
}

/// `GET /api/customers/kyc/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_kyc(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<CustomerKyc>>, ApiError> {
    info!("Listing KYC records");
    plain_listing(
        state.stores.customers.kyc.as_ref(),
        "Customer KYC endpoint",
        &pagination,
        PAGE_SIZE,
    )
    .await
}

/// `GET /api/customers/activities/`
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
#[instrument(skip(state))]
pub async fn list_activities(
    State(state): State<Arc<AppState>>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<CustomerActivity>>, ApiError> {
    info!("Listing customer activities");
    plain_listing(
        state.stores.customers.activities.as_ref(),
        "Customer activities endpoint",
        &pagination,
        ACTIVITY_PAGE_SIZE,
    )
    .await
}
