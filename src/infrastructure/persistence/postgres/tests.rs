//! # PostgreSQL Store Integration Tests
//!
//! Integration tests for [`PostgresStore`] against a live database.
//!
//! # Test Categories
//!
//! - **CRUD**: save, get, list, count, delete
//! - **Natural keys**: duplicate rejection and transaction rollback
//! - **Exclusive flags**: sibling flags cleared inside the save transaction
//!
//! # Note
//!
//! These tests require a running PostgreSQL reachable through
//! `TEST_DATABASE_URL`. They are marked with `#[ignore]` by default and can
//! be run with:
//! ```bash
//! cargo test --lib postgres::tests -- --ignored
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Record;
use crate::domain::entities::tokens::TokenBalance;
use crate::domain::entities::wallets::{Wallet, WalletCategory, WalletType};
use crate::infrastructure::persistence::postgres::PostgresStore;
use crate::infrastructure::persistence::traits::RecordStore;
use rust_decimal::Decimal;

// ============================================================================
// Test Helpers
// ============================================================================

async fn create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;
    PgPool::connect(&database_url).await.ok()
}

async fn fresh_store<T: Record>(pool: &PgPool) -> PostgresStore<T> {
    PostgresStore::<T>::migrate(pool).await.unwrap();
    sqlx::query(&format!("DELETE FROM {}", T::TABLE))
        .execute(pool)
        .await
        .unwrap();
    PostgresStore::new(pool.clone())
}

fn test_address(n: u8) -> String {
    format!("0x{}", format!("{n:02x}").repeat(20))
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn save_get_list_delete() {
    let Some(pool) = create_test_pool().await else {
        eprintln!("Skipping test: TEST_DATABASE_URL not set");
        return;
    };
    let store = fresh_store::<WalletType>(&pool).await;

    let saved = store
        .save(WalletType::new("MetaMask", WalletCategory::NonCustodial))
        .await
        .unwrap();

    let fetched = store.get(saved.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "MetaMask");
    assert_eq!(store.count().await.unwrap(), 1);
    assert_eq!(store.list(0, 10).await.unwrap().len(), 1);

    assert!(store.delete(saved.id).await.unwrap());
    assert!(store.get(saved.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn save_persists_derived_balance() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let store = fresh_store::<TokenBalance>(&pool).await;

    let mut balance = TokenBalance::new(Uuid::new_v4(), Uuid::new_v4());
    balance.balance = Decimal::from(100);
    balance.locked_balance = Decimal::from(30);
    let saved = store.save(balance).await.unwrap();

    let fetched = store.get(saved.id).await.unwrap().unwrap();
    assert_eq!(fetched.available_balance, Decimal::from(70));
}

// ============================================================================
// Natural keys
// ============================================================================

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn duplicate_key_rolls_back() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let store = fresh_store::<WalletType>(&pool).await;

    store
        .save(WalletType::new("Ledger", WalletCategory::Custodial))
        .await
        .unwrap();
    let err = store
        .save(WalletType::new("Ledger", WalletCategory::Hybrid))
        .await
        .unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(store.count().await.unwrap(), 1);
}

// ============================================================================
// Exclusive flags
// ============================================================================

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn primary_flag_cleared_on_siblings() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let store = fresh_store::<Wallet>(&pool).await;
    let user = Uuid::new_v4();

    let mut first = Wallet::new(user, Uuid::new_v4(), "first", test_address(1));
    first.is_primary = true;
    let first = store.save(first).await.unwrap();

    let mut second = Wallet::new(user, Uuid::new_v4(), "second", test_address(2));
    second.is_primary = true;
    let second = store.save(second).await.unwrap();

    assert!(!store.get(first.id).await.unwrap().unwrap().is_primary);
    assert!(store.get(second.id).await.unwrap().unwrap().is_primary);
}

#[tokio::test]
#[ignore = "requires PostgreSQL database"]
async fn concurrent_primary_saves_keep_one_primary() {
    let Some(pool) = create_test_pool().await else {
        return;
    };
    let store = std::sync::Arc::new(fresh_store::<Wallet>(&pool).await);
    let user = Uuid::new_v4();
    let wallet_type = Uuid::new_v4();

    let handles: Vec<_> = (10..26u8)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut wallet = Wallet::new(user, wallet_type, format!("w{n}"), test_address(n));
                wallet.is_primary = true;
                store.save(wallet).await.unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let primaries = store
        .all()
        .await
        .unwrap()
        .into_iter()
        .filter(|w| w.user_id == user && w.is_primary)
        .count();
    assert_eq!(primaries, 1);
}
