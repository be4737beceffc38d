//! # Persistence Layer
//!
//! Record store port, its in-memory and PostgreSQL implementations, and the
//! factory that builds one store per gateway record.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use factory::{GatewayStores, StoreFactory};
pub use traits::{RecordStore, RepositoryError, RepositoryResult};
