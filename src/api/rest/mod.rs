//! # REST API
//!
//! Axum handlers and the router of the gateway's HTTP surface.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
