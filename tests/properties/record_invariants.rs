//! # Record Invariant Property Tests
//!
//! Property-based tests for the derived columns and exclusive flags that
//! stores maintain on every save.

#![allow(clippy::unwrap_used)]

use mtt_gateway::domain::entities::tokens::TokenBalance;
use mtt_gateway::domain::entities::trading::{OrderSide, OrderType, TradeOrder};
use mtt_gateway::domain::entities::wallets::Wallet;
use mtt_gateway::domain::value_objects::floor_at_zero;
use mtt_gateway::infrastructure::persistence::StoreFactory;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

// ============================================================================
// Strategies
// ============================================================================

/// Token amounts with up to eighteen decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000_000i64, 0u32..=18u32).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn arb_address() -> impl Strategy<Value = String> {
    "[0-9a-f]{40}".prop_map(|hex| format!("0x{hex}"))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ============================================================================
// Derived Columns
// ============================================================================

proptest! {
    #[test]
    fn saved_balance_available_is_floored_difference(
        balance in arb_amount(),
        locked in arb_amount(),
    ) {
        let store = StoreFactory::InMemory.store::<TokenBalance>();
        let mut record = TokenBalance::new(Uuid::new_v4(), Uuid::new_v4());
        record.balance = balance;
        record.locked_balance = locked;
        record.available_balance = Decimal::MAX;

        let saved = runtime().block_on(store.save(record)).unwrap();
        prop_assert_eq!(saved.available_balance, floor_at_zero(balance - locked));
        prop_assert!(saved.available_balance >= Decimal::ZERO);
    }

    #[test]
    fn lock_then_unlock_restores_available(
        balance in arb_amount(),
        fraction in 1u32..=100u32,
    ) {
        prop_assume!(balance > Decimal::ZERO);
        let mut record = TokenBalance::new(Uuid::new_v4(), Uuid::new_v4());
        record.balance = balance;
        record.refresh_available();

        let amount = (balance * Decimal::from(fraction) / Decimal::ONE_HUNDRED).round_dp(18);
        prop_assume!(amount > Decimal::ZERO);

        record.lock(amount).unwrap();
        prop_assert_eq!(record.available_balance, balance - amount);
        record.unlock(amount).unwrap();
        prop_assert_eq!(record.available_balance, balance);
        prop_assert_eq!(record.locked_balance, Decimal::ZERO);
    }

    #[test]
    fn saved_order_remaining_is_quantity_minus_filled(
        quantity in 1i64..1_000_000i64,
        filled_share in 0i64..=100i64,
    ) {
        let store = StoreFactory::InMemory.store::<TradeOrder>();
        let quantity = Decimal::from(quantity);
        let mut order = TradeOrder::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            OrderType::Limit,
            OrderSide::Buy,
            quantity,
            Some(Decimal::ONE),
        );
        order.filled_quantity = (quantity * Decimal::from(filled_share) / Decimal::ONE_HUNDRED).floor();
        order.remaining_quantity = Decimal::ZERO;

        let saved = runtime().block_on(store.save(order)).unwrap();
        prop_assert_eq!(saved.remaining_quantity, saved.quantity - saved.filled_quantity);
    }
}

// ============================================================================
// Exclusive Flags
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn at_most_one_primary_wallet_per_user(
        addresses in prop::collection::hash_set(arb_address(), 1..8),
        primaries in prop::collection::vec(any::<bool>(), 8),
    ) {
        let store = StoreFactory::InMemory.store::<Wallet>();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let wallet_type = Uuid::new_v4();

        let rt = runtime();
        let mut last_primary = None;
        for (i, (address, primary)) in addresses.iter().zip(&primaries).enumerate() {
            let mut wallet = Wallet::new(owner, wallet_type, format!("Wallet {i}"), address.clone());
            wallet.is_primary = *primary;
            let saved = rt.block_on(store.save(wallet)).unwrap();
            if *primary {
                last_primary = Some(saved.id);
            }
        }

        let mut foreign = Wallet::new(other, wallet_type, "Other", "0x00000000000000000000000000000000000000ff");
        foreign.is_primary = true;
        rt.block_on(store.save(foreign)).unwrap();

        let wallets = rt.block_on(store.all()).unwrap();
        let primary_ids: Vec<Uuid> = wallets
            .iter()
            .filter(|w| w.user_id == owner && w.is_primary)
            .map(|w| w.id)
            .collect();
        prop_assert!(primary_ids.len() <= 1);
        prop_assert_eq!(primary_ids.first().copied(), last_primary);
        prop_assert!(wallets.iter().any(|w| w.user_id == other && w.is_primary));
    }
}
