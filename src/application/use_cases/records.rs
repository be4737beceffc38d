//! # Record Use Cases
//!
//! Generic operations shared by every module: validated saves, paged
//! newest-first reads and display-name resolution for enriched listings.

use crate::application::dto::Names;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::Record;
use crate::infrastructure::persistence::RecordStore;
use std::collections::HashSet;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// One page of records plus the size of the whole result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page, newest first.
    pub items: Vec<T>,
    /// Records matching the query across all pages.
    pub total: u64,
    /// Records in the table before any filter.
    pub stored: u64,
}

impl<T> Page<T> {
    /// Creates an unfiltered page.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self {
            items,
            total,
            stored: total,
        }
    }

    /// Creates a page of `total` matches out of `stored` records.
    #[must_use]
    pub fn filtered(items: Vec<T>, total: u64, stored: u64) -> Self {
        Self { items, total, stored }
    }

    /// Maps every item, keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            stored: self.stored,
        }
    }

    /// Returns true if nothing matched the query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns true if the table holds no records at all.
    #[must_use]
    pub fn table_is_empty(&self) -> bool {
        self.stored == 0
    }
}

/// Validates `record` and saves it.
///
/// # Errors
///
/// Returns `ApplicationError::DomainError` if the record breaks a field
/// rule, `ApplicationError::Conflict` if a natural key is taken, and
/// `ApplicationError::RepositoryError` if the store fails.
pub async fn save_record<T: Record>(store: &dyn RecordStore<T>, record: T) -> ApplicationResult<T> {
    if let Err(e) = record.validate() {
        warn!(table = T::TABLE, error = %e, "record rejected");
        return Err(e.into());
    }

    let saved = store.save(record).await.map_err(|e| {
        if e.is_duplicate() {
            warn!(table = T::TABLE, error = %e, "natural key taken");
        } else {
            error!(table = T::TABLE, error = %e, "failed to save record");
        }
        ApplicationError::from(e)
    })?;

    debug!(table = T::TABLE, id = %saved.id(), "record saved");
    Ok(saved)
}

/// Reads one page of records, newest first.
///
/// # Errors
///
/// Returns `ApplicationError::RepositoryError` if the store fails.
pub async fn list_page<T: Record>(
    store: &dyn RecordStore<T>,
    offset: usize,
    limit: usize,
) -> ApplicationResult<Page<T>> {
    let total = store.count().await.map_err(|e| {
        error!(table = T::TABLE, error = %e, "failed to count records");
        ApplicationError::from(e)
    })?;

    let items = if total == 0 {
        Vec::new()
    } else {
        store.list(offset, limit).await.map_err(|e| {
            error!(table = T::TABLE, error = %e, "failed to list records");
            ApplicationError::from(e)
        })?
    };

    Ok(Page::new(items, total))
}

/// Reads one page of the records accepted by `keep`, newest first.
///
/// The filter runs over the whole table.
///
/// # Errors
///
/// Returns `ApplicationError::RepositoryError` if the store fails.
pub async fn filtered_page<T: Record>(
    store: &dyn RecordStore<T>,
    offset: usize,
    limit: usize,
    keep: impl Fn(&T) -> bool,
) -> ApplicationResult<Page<T>> {
    let all = store.all().await.map_err(|e| {
        error!(table = T::TABLE, error = %e, "failed to read records");
        ApplicationError::from(e)
    })?;

    let stored = all.len() as u64;
    let matching: Vec<T> = all.into_iter().filter(|record| keep(record)).collect();
    let total = matching.len() as u64;
    let items = matching.into_iter().skip(offset).take(limit).collect();
    Ok(Page::filtered(items, total, stored))
}

/// Resolves the display name of each referenced id.
///
/// Ids without a record are left out of the result.
///
/// # Errors
///
/// Returns `ApplicationError::RepositoryError` if the store fails.
pub async fn resolve_names<T: Record>(
    store: &dyn RecordStore<T>,
    ids: impl IntoIterator<Item = Uuid>,
    name: impl Fn(&T) -> String,
) -> ApplicationResult<Names> {
    let unique: HashSet<Uuid> = ids.into_iter().collect();
    let mut pairs = Vec::with_capacity(unique.len());

    for id in unique {
        if let Some(record) = store.get(id).await? {
            pairs.push((id, name(&record)));
        }
    }

    Ok(Names::new(pairs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::domain::entities::wallets::{Wallet, WalletCategory, WalletType};
    use crate::infrastructure::persistence::in_memory::InMemoryStore;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn save_record_validates_first() {
        let store = InMemoryStore::new();
        let wallet = Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Main", "not-an-address");

        let err = save_record(&store, wallet).await.unwrap_err();
        assert!(matches!(err, ApplicationError::DomainError(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn save_record_maps_duplicate_to_conflict() {
        let store = InMemoryStore::new();
        save_record(&store, WalletType::new("Ledger", WalletCategory::NonCustodial))
            .await
            .unwrap();

        let err = save_record(&store, WalletType::new("Ledger", WalletCategory::Custodial))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_page_reports_total() {
        let store = InMemoryStore::new();
        let base = Utc::now();
        for i in 0..3 {
            let mut wallet_type = WalletType::new(format!("type-{i}"), WalletCategory::Hybrid);
            wallet_type.created_at = base + Duration::seconds(i);
            store.save(wallet_type).await.unwrap();
        }

        let page = list_page(&store, 0, 2).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items.first().unwrap().name, "type-2");

        let empty = list_page(&InMemoryStore::<User>::new(), 0, 10).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn filtered_page_counts_matches_only() {
        let store = InMemoryStore::new();
        for (name, active) in [("a", true), ("b", false), ("c", true)] {
            let mut wallet_type = WalletType::new(name, WalletCategory::Custodial);
            wallet_type.is_active = active;
            store.save(wallet_type).await.unwrap();
        }

        let page = filtered_page(&store, 0, 1, |t: &WalletType| t.is_active)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.stored, 3);
        assert_eq!(page.items.len(), 1);
        assert!(!page.table_is_empty());
    }

    #[tokio::test]
    async fn resolve_names_skips_missing() {
        let store = InMemoryStore::new();
        let alice = store.save(User::new("alice", "alice@example.com")).await.unwrap();
        let missing = Uuid::new_v4();

        let names = resolve_names(&store, [alice.id, alice.id, missing], |u: &User| {
            u.username.clone()
        })
        .await
        .unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get(alice.id).as_deref(), Some("alice"));
        assert!(names.get(missing).is_none());
    }

    #[test]
    fn page_map_keeps_total() {
        let page = Page::new(vec![1, 2], 7).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 7);
    }
}
