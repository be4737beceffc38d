//! # In-Memory Record Store
//!
//! In-memory implementation of [`RecordStore`], used when no database is
//! configured and in tests.
//!
//! # Examples
//!
//! ```
//! use mtt_gateway::domain::entities::wallets::WalletType;
//! use mtt_gateway::infrastructure::persistence::in_memory::InMemoryStore;
//!
//! let store: InMemoryStore<WalletType> = InMemoryStore::new();
//! assert!(store.is_empty());
//! ```

use crate::domain::entities::Record;
use crate::infrastructure::persistence::traits::{
    RecordStore, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory implementation of [`RecordStore`].
///
/// # Thread Safety
///
/// Uses `Arc<RwLock<HashMap>>`; a save holds the write lock across the
/// key check, the sibling flag update and the insert.
pub struct InMemoryStore<T> {
    storage: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        // try_read keeps this usable from sync code
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every record.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    fn sorted(records: impl Iterator<Item = T>) -> Vec<T> {
        let mut records: Vec<T> = records.collect();
        records.sort_by(|a, b| {
            b.listed_at()
                .cmp(&a.listed_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        records
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<T: Record> fmt::Debug for InMemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("table", &T::TABLE)
            .field("len", &self.len())
            .finish()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    async fn save(&self, mut record: T) -> RepositoryResult<T> {
        record.prepare(Utc::now());
        let id = record.id();
        let keys = record.natural_keys();

        let mut storage = self.storage.write().await;

        for other in storage.values().filter(|other| other.id() != id) {
            if let Some(taken) = other.natural_keys().into_iter().find(|k| keys.contains(k)) {
                return Err(RepositoryError::duplicate(T::TABLE, taken));
            }
        }

        if let Some(flag) = record.exclusive_flag()
            && flag.set
        {
            for other in storage.values_mut().filter(|other| other.id() != id) {
                if other
                    .exclusive_flag()
                    .is_some_and(|f| f.set && f.owner == flag.owner)
                {
                    other.clear_exclusive_flag();
                }
            }
        }

        storage.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> RepositoryResult<Option<T>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn list(&self, offset: usize, limit: usize) -> RepositoryResult<Vec<T>> {
        let storage = self.storage.read().await;
        Ok(Self::sorted(storage.values().cloned())
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn all(&self) -> RepositoryResult<Vec<T>> {
        let storage = self.storage.read().await;
        Ok(Self::sorted(storage.values().cloned()))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(&id).is_some())
    }
}
