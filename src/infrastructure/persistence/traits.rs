//! # Store Traits
//!
//! Port definitions for persistence abstraction.
//!
//! Every gateway record is persisted through one generic port,
//! [`RecordStore`]. Implementations enforce the two rules the [`Record`]
//! contract declares:
//!
//! - **Natural keys**: saving a record whose natural key is already held by
//!   a different record fails with [`RepositoryError::Duplicate`].
//! - **Exclusive flags**: saving a record with its `is_primary` /
//!   `is_default` flag set clears the flag on every other record of the
//!   same owner, atomically with the write.
//!
//! Both run after [`Record::prepare`], so derived columns (balances,
//! remaining quantities, reference numbers) are in place before keys are
//! compared.
//!
//! # Examples
//!
//! ```ignore
//! use mtt_gateway::infrastructure::persistence::traits::RecordStore;
//!
//! async fn newest_wallets(store: &dyn RecordStore<Wallet>) {
//!     let page = store.list(0, 10).await.unwrap();
//!     println!("{} wallets", page.len());
//! }
//! ```

use crate::domain::entities::Record;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Record not found.
    #[error("Record not found: {entity_type} with id {id}")]
    NotFound {
        /// Table of the record.
        entity_type: &'static str,
        /// Record identifier.
        id: String,
    },

    /// Natural key already held by another record.
    #[error("Duplicate record: {entity_type} with {key} already exists")]
    Duplicate {
        /// Table of the record.
        entity_type: &'static str,
        /// Conflicting natural key, `column=value`.
        key: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            key: key.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for store operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence port for one record type.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync + fmt::Debug {
    /// Inserts or replaces a record and returns it as stored.
    ///
    /// The record is prepared (derived columns, `updated_at`) before keys
    /// and flags are checked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if a natural key is held by a
    /// different record.
    async fn save(&self, record: T) -> RepositoryResult<T>;

    /// Gets a record by id.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    async fn get(&self, id: Uuid) -> RepositoryResult<Option<T>>;

    /// Lists records newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    async fn list(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<T>>;

    /// Lists every record, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    async fn all(&self) -> RepositoryResult<Vec<T>>;

    /// Counts records.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    async fn count(&self) -> RepositoryResult<u64>;

    /// Deletes a record.
    ///
    /// Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error() {
        let err = RepositoryError::not_found("wallets_wallet", "abc");
        assert!(err.is_not_found());
        assert!(!err.is_duplicate());
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("wallets_wallet"));
    }

    #[test]
    fn duplicate_error() {
        let err = RepositoryError::duplicate("maythetoken_trading_pair", "symbol=MTT/USD");
        assert!(err.is_duplicate());
        assert!(err.to_string().contains("symbol=MTT/USD"));
    }

    #[test]
    fn query_error() {
        let err = RepositoryError::query("Invalid SQL");
        assert!(err.to_string().contains("Query"));
        assert!(err.to_string().contains("Invalid SQL"));
    }

    #[test]
    fn serialization_error() {
        let err = RepositoryError::serialization("JSON parse error");
        assert!(err.to_string().contains("Serialization"));
    }
}
