//! # PostgreSQL Stores
//!
//! PostgreSQL implementation of the record store port using sqlx.

mod record_store;

#[cfg(test)]
mod tests;

pub use record_store::PostgresStore;
