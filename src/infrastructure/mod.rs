//! # Infrastructure Layer
//!
//! External adapters and implementations of domain ports.
//!
//! ## Persistence
//!
//! Record store implementations:
//! - PostgreSQL document tables
//! - In-memory maps for development and tests
//! - A factory that builds the stores of every gateway record

pub mod persistence;
