//! # MTT Gateway
//!
//! Multi-module payment gateway service. It keeps the records of a token
//! payment platform (users, tokens, wallets, merchants, customers, payments,
//! trading, administration and a marketplace) and publishes them over a
//! JSON HTTP API with a small HTML landing page.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Record entities, value objects and their invariants
//! - **Application Layer** (`application`): Use cases, request DTOs and response views
//! - **Infrastructure Layer** (`infrastructure`): In-memory and PostgreSQL record stores
//! - **API Layer** (`api`): REST routes, handlers and request logging
//!
//! ## Example
//!
//! ```rust,ignore
//! use mtt_gateway::api::rest::{AppState, create_router};
//! use mtt_gateway::infrastructure::persistence::StoreFactory;
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(StoreFactory::InMemory.build()));
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
