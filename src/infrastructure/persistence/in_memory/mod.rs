//! # In-Memory Stores
//!
//! Process-local storage used when no database URL is configured.

mod record_store;

pub use record_store::InMemoryStore;
