//! # REST Handlers
//!
//! Request handlers for the gateway's HTTP surface.
//!
//! This module holds the shared state and response shapes; the handlers of
//! each product module live in the submodules.
//!
//! # Endpoints
//!
//! ## Site
//! - `GET /` - HTML homepage
//! - `GET /health` - Health check
//! - `GET /admin/` - Record counts per table
//!
//! ## Product modules
//! - `GET /api/{module}/` - Module descriptor
//! - `GET /api/{module}/{resource}/` - Paged listing, newest first
//! - `POST /api/wallets/types/` - Create wallet type
//! - `POST /api/wallets/list/` - Create wallet

pub mod admin;
pub mod customers;
pub mod marketplace;
pub mod merchant;
pub mod payments;
pub mod site;
pub mod tokens;
pub mod trading;
pub mod wallets;

use crate::application::error::ApplicationError;
use crate::application::use_cases::records::{Page, list_page};
use crate::application::use_cases::{CreateWalletTypeUseCase, CreateWalletUseCase};
use crate::domain::entities::Record;
use crate::infrastructure::persistence::{GatewayStores, RecordStore};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::{Json, http::StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, warn};

/// Version reported by every module descriptor.
pub const API_VERSION: &str = "1.0";

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Record stores of every module.
    pub stores: GatewayStores,
    /// Wallet type creation.
    pub create_wallet_type: CreateWalletTypeUseCase,
    /// Wallet creation.
    pub create_wallet: CreateWalletUseCase,
}

impl AppState {
    /// Wires the use cases over `stores`.
    #[must_use]
    pub fn new(stores: GatewayStores) -> Self {
        let create_wallet_type = CreateWalletTypeUseCase::new(stores.wallets.types.clone());
        let create_wallet = CreateWalletUseCase::new(
            stores.accounts.users.clone(),
            stores.wallets.types.clone(),
            stores.wallets.wallets.clone(),
        );
        Self {
            stores,
            create_wallet_type,
            create_wallet,
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error response with details.
    #[must_use]
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl From<ApplicationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApplicationError) -> Self {
        let (status, code) = match &err {
            ApplicationError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApplicationError::DomainError(e) if e.is_validation_error() || e.is_state_error() => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApplicationError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApplicationError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = match &err {
            ApplicationError::DomainError(e) => ErrorResponse::with_details(
                code,
                err.to_string(),
                serde_json::json!({ "domain_code": e.code() }),
            ),
            _ => ErrorResponse::new(code, err.to_string()),
        };

        (status, Json(body))
    }
}

// ============================================================================
// Extractors
// ============================================================================

fn rejection_error(status: StatusCode, source: &str, message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_details(
            "VALIDATION_ERROR",
            message,
            serde_json::json!({ "source": source, "rejection_status": status.as_u16() }),
        )),
    )
}

/// JSON body extractor whose rejections use the standard error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                Err(rejection_error(rejection.status(), "body", rejection.body_text()))
            }
        }
    }
}

/// Query string extractor whose rejections use the standard error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!("Rejected query string: {}", rejection.body_text());
                Err(rejection_error(rejection.status(), "query", rejection.body_text()))
            }
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Largest page a listing returns.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters.
///
/// `page_size` falls back to the endpoint's own default when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: None,
        }
    }
}

fn default_page() -> u32 {
    1
}

impl PaginationParams {
    /// Returns the page number, never below 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Returns the page size, capped at [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn limit(&self, default_size: u32) -> u32 {
        self.page_size
            .unwrap_or(default_size)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Returns the offset for store queries.
    #[must_use]
    pub fn offset(&self, default_size: u32) -> u32 {
        (self.page() - 1).saturating_mul(self.limit(default_size))
    }
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of items.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PaginationMeta {
    /// Creates pagination metadata.
    #[must_use]
    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            let pages = total_items.div_ceil(u64::from(page_size.max(1)));
            u32::try_from(pages).unwrap_or(u32::MAX)
        };

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

// ============================================================================
// Listing Response
// ============================================================================

/// Body of every listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    /// Endpoint name.
    pub message: String,
    /// Always `"Available"`.
    pub status: &'static str,
    /// Results on this page.
    pub count: usize,
    /// The page, newest first.
    pub results: Vec<T>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
    /// Set when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl<T> ListResponse<T> {
    /// Builds the response for one page of `plural` records.
    ///
    /// The empty-table note is only set when the table holds nothing; use
    /// [`ListResponse::with_filter_note`] for filtered listings.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        plural: &str,
        page: Page<T>,
        pagination: &PaginationParams,
        default_size: u32,
    ) -> Self {
        let note = page
            .table_is_empty()
            .then(|| format!("No {plural} found - database empty"));
        let meta = PaginationMeta::new(pagination.page(), pagination.limit(default_size), page.total);

        Self {
            message: message.into(),
            status: "Available",
            count: page.items.len(),
            results: page.items,
            pagination: meta,
            note,
        }
    }

    /// Notes that stored records exist but none passed the filter.
    #[must_use]
    pub fn with_filter_note(mut self, note: impl Into<String>) -> Self {
        if self.note.is_none() && self.pagination.total_items == 0 {
            self.note = Some(note.into());
        }
        self
    }
}

/// Reads one page of `store` and wraps it in a [`ListResponse`].
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
pub async fn list_records<T: Record>(
    store: &dyn RecordStore<T>,
    message: &str,
    pagination: &PaginationParams,
    default_size: u32,
) -> Result<Page<T>, ApiError> {
    let limit = pagination.limit(default_size) as usize;
    let offset = pagination.offset(default_size) as usize;
    list_page(store, offset, limit).await.map_err(|e| {
        error!(endpoint = message, error = %e, "listing failed");
        ApiError::from(e)
    })
}

/// Reads one page of `store` and returns it unchanged.
///
/// # Errors
///
/// Returns `INTERNAL_ERROR` if the store fails.
pub async fn plain_listing<T: Record>(
    store: &dyn RecordStore<T>,
    message: &str,
    pagination: &PaginationParams,
    default_size: u32,
) -> Result<Json<ListResponse<T>>, ApiError> {
    let page = list_records(store, message, pagination, default_size).await?;
    Ok(Json(ListResponse::new(
        message,
        T::PLURAL,
        page,
        pagination,
        default_size,
    )))
}

// ============================================================================
// Module Descriptor
// ============================================================================

/// Static description of one product module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleInfo {
    /// Display name, e.g. `"Tokens"`.
    pub name: &'static str,
    /// Mount point, e.g. `"/api/tokens/"`.
    pub prefix: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Endpoint names and paths.
    pub endpoints: &'static [(&'static str, &'static str)],
}

/// Body of `GET /api/{module}/`.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleDescriptor {
    /// `"MTT Gateway - {name} API"`.
    pub message: String,
    /// API version.
    pub version: &'static str,
    /// Endpoint names and paths.
    pub endpoints: BTreeMap<&'static str, &'static str>,
    /// One-line description.
    pub description: &'static str,
    /// Always `"Active"`.
    pub status: &'static str,
}

impl From<&ModuleInfo> for ModuleDescriptor {
    fn from(module: &ModuleInfo) -> Self {
        Self {
            message: format!("MTT Gateway - {} API", module.name),
            version: API_VERSION,
            endpoints: module.endpoints.iter().copied().collect(),
            description: module.description,
            status: "Active",
        }
    }
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Endpoint name.
    pub message: String,
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "MTT Gateway".to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown paths.
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            "NOT_FOUND",
            format!("no route for {}", uri.path()),
        )),
    )
}

impl From<crate::infrastructure::persistence::RepositoryError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: crate::infrastructure::persistence::RepositoryError) -> Self {
        ApplicationError::from(err).into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::persistence::StoreFactory;

    #[test]
    fn error_response_new() {
        let err = ErrorResponse::new("TEST_ERROR", "test message");
        assert_eq!(err.code, "TEST_ERROR");
        assert_eq!(err.message, "test message");
        assert!(err.details.is_none());
    }

    #[test]
    fn error_response_with_details() {
        let details = serde_json::json!({"field": "address"});
        let err = ErrorResponse::with_details("VALIDATION_ERROR", "invalid field", details.clone());
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.details, Some(details));
    }

    #[test]
    fn application_errors_map_to_status() {
        let cases = [
            (ApplicationError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                ApplicationError::DomainError(DomainError::invalid_field("name", "empty")),
                StatusCode::BAD_REQUEST,
            ),
            (ApplicationError::not_found("user", "42"), StatusCode::NOT_FOUND),
            (ApplicationError::conflict("taken"), StatusCode::CONFLICT),
            (
                ApplicationError::repository("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApplicationError::DomainError(DomainError::Overflow),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = <(StatusCode, Json<ErrorResponse>)>::from(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn pagination_params_serde_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, None);
        assert_eq!(params.limit(10), 10);
        assert_eq!(params.limit(20), 20);
    }

    #[test]
    fn pagination_params_offset() {
        let params = PaginationParams {
            page: 3,
            page_size: Some(10),
        };
        assert_eq!(params.offset(20), 20);
    }

    #[test]
    fn pagination_params_page_zero_is_first() {
        let params = PaginationParams {
            page: 0,
            page_size: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(10), 0);
    }

    #[test]
    fn pagination_params_limit_capped() {
        let params = PaginationParams {
            page: 1,
            page_size: Some(500),
        };
        assert_eq!(params.limit(10), 100);

        let zero = PaginationParams {
            page: 1,
            page_size: Some(0),
        };
        assert_eq!(zero.limit(10), 1);
    }

    #[test]
    fn pagination_meta_new() {
        let meta = PaginationMeta::new(2, 10, 45);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.page_size, 10);
        assert_eq!(meta.total_items, 45);
        assert_eq!(meta.total_pages, 5);
    }

    #[test]
    fn pagination_meta_empty() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn filtered_out_rows_are_not_an_empty_table() {
        let params = PaginationParams::default();
        let response: ListResponse<u8> = ListResponse::new(
            "Routing engine endpoint",
            "routing engines",
            Page::filtered(vec![], 0, 2),
            &params,
            10,
        )
        .with_filter_note("No active routing engines found");
        assert_eq!(response.note.as_deref(), Some("No active routing engines found"));

        let empty: ListResponse<u8> = ListResponse::new(
            "Routing engine endpoint",
            "routing engines",
            Page::filtered(vec![], 0, 0),
            &params,
            10,
        )
        .with_filter_note("No active routing engines found");
        assert_eq!(
            empty.note.as_deref(),
            Some("No routing engines found - database empty")
        );
    }

    #[test]
    fn list_response_notes_empty_table() {
        let params = PaginationParams::default();
        let empty: ListResponse<u8> =
            ListResponse::new("Tokens endpoint", "tokens", Page::new(vec![], 0), &params, 10);
        assert_eq!(empty.note.as_deref(), Some("No tokens found - database empty"));
        assert_eq!(empty.status, "Available");

        let full = ListResponse::new("Tokens endpoint", "tokens", Page::new(vec![1u8], 1), &params, 10);
        assert!(full.note.is_none());
        assert_eq!(full.count, 1);
    }

    #[test]
    fn module_descriptor_from_info() {
        const INFO: ModuleInfo = ModuleInfo {
            name: "Tokens",
            prefix: "/api/tokens/",
            description: "MTT token management",
            endpoints: &[("tokens", "/api/tokens/list/")],
        };
        let descriptor = ModuleDescriptor::from(&INFO);
        assert_eq!(descriptor.message, "MTT Gateway - Tokens API");
        assert_eq!(descriptor.version, "1.0");
        assert_eq!(descriptor.status, "Active");
        assert_eq!(descriptor.endpoints.get("tokens"), Some(&"/api/tokens/list/"));
    }

    #[tokio::test]
    async fn plain_listing_reads_store() {
        let stores = StoreFactory::InMemory.build();
        let params = PaginationParams::default();
        let Json(response) = plain_listing(stores.tokens.tokens.as_ref(), "Tokens endpoint", &params, 10)
            .await
            .unwrap();
        assert_eq!(response.count, 0);
        assert!(response.note.is_some());
    }

    #[tokio::test]
    async fn health_check_returns_healthy() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
    }
}
