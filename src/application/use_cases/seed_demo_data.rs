//! # Seed Demo Data Use Case
//!
//! Loads a small demo dataset through the regular validated save path so a
//! fresh gateway has something to list: an admin and a demo user, wallet
//! types and a primary wallet, the MTT token with a balance and a price,
//! an exchange rate, a trading pair with a pool, a default routing engine,
//! card processors, public configuration and a marketplace.
//!
//! Seeding is skipped when the user table already has rows.

use crate::application::error::ApplicationResult;
use crate::application::use_cases::records::save_record;
use crate::domain::entities::User;
use crate::domain::entities::admin::{ConfigDataType, SystemConfiguration};
use crate::domain::entities::marketplace::{CardPaymentProcessor, Marketplace, ProcessorStatus, ProcessorType};
use crate::domain::entities::payments::{ExchangeRate, PaymentMethod, PaymentMethodType};
use crate::domain::entities::tokens::{Token, TokenBalance, TokenPrice};
use crate::domain::entities::trading::{LiquidityPool, RoutingEngine, RoutingStrategy, TradingPair};
use crate::domain::entities::wallets::{Wallet, WalletCategory, WalletType};
use crate::infrastructure::persistence::GatewayStores;
use rust_decimal::Decimal;
use tracing::info;

const MTT_CONTRACT: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
const DEMO_WALLET: &str = "0x8617E340B3D01FA5F11F306F4090FD50E238070D";
const POOL_ADDRESS: &str = "0xde709f2102306220921060314715629080e2fb77";

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Records written.
    pub created: usize,
    /// True if the store already held data and nothing was written.
    pub skipped: bool,
}

/// Use case for loading the demo dataset.
#[derive(Debug, Clone)]
pub struct SeedDemoDataUseCase {
    stores: GatewayStores,
}

impl SeedDemoDataUseCase {
    /// Creates the use case over every store.
    #[must_use]
    pub fn new(stores: GatewayStores) -> Self {
        Self { stores }
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// Returns the first validation, conflict or storage error.
    pub async fn execute(&self) -> ApplicationResult<SeedSummary> {
        if self.stores.accounts.users.count().await? > 0 {
            info!("users present, demo data not loaded");
            return Ok(SeedSummary {
                created: 0,
                skipped: true,
            });
        }

        let mut created = 0;
        let s = &self.stores;

        // Accounts
        let admin = save_record(s.accounts.users.as_ref(), User::new("admin", "admin@mtt.local").staff()).await?;
        let demo = save_record(s.accounts.users.as_ref(), User::new("demo", "demo@mtt.local")).await?;
        created += 2;

        // Wallets
        let metamask = save_record(
            s.wallets.types.as_ref(),
            WalletType::new("MetaMask", WalletCategory::NonCustodial),
        )
        .await?;
        let mut custody = WalletType::new("MTT Custody", WalletCategory::Custodial);
        custody.requires_kyc = true;
        save_record(s.wallets.types.as_ref(), custody).await?;

        let mut wallet = Wallet::new(demo.id, metamask.id, "Main", DEMO_WALLET);
        wallet.is_primary = true;
        save_record(s.wallets.wallets.as_ref(), wallet).await?;
        created += 3;

        // Tokens
        let mut token = Token::new(MTT_CONTRACT);
        token.total_supply = Decimal::from(1_000_000_000);
        let token = save_record(s.tokens.tokens.as_ref(), token).await?;

        let mut balance = TokenBalance::new(demo.id, token.id);
        balance.balance = Decimal::from(1000);
        balance.locked_balance = Decimal::from(250);
        save_record(s.tokens.balances.as_ref(), balance).await?;
        save_record(s.tokens.prices.as_ref(), TokenPrice::new(token.id, Decimal::new(5, 2))).await?;
        created += 3;

        // Payments
        save_record(
            s.payments.methods.as_ref(),
            PaymentMethod::new("Card", PaymentMethodType::CreditCard),
        )
        .await?;
        save_record(s.payments.rates.as_ref(), ExchangeRate::new(Decimal::from(20))).await?;
        created += 2;

        // Trading
        let pair = save_record(s.trading.pairs.as_ref(), TradingPair::new("MTT", "USD")).await?;
        let mut pool = LiquidityPool::new(pair.id, "MTT/USD Main", POOL_ADDRESS);
        pool.base_reserve = Decimal::from(400_000);
        pool.quote_reserve = Decimal::from(20_000);
        pool.total_liquidity = Decimal::from(40_000);
        save_record(s.trading.pools.as_ref(), pool).await?;

        let mut engine = RoutingEngine::new("Primary Router", RoutingStrategy::CostOptimized);
        engine.is_default = true;
        save_record(s.trading.engines.as_ref(), engine).await?;
        created += 3;

        // Card processors
        for (name, processor_type, endpoint, status) in [
            ("Stripe", ProcessorType::Stripe, "https://api.stripe.com", ProcessorStatus::Active),
            ("PayPal", ProcessorType::Paypal, "https://api.paypal.com", ProcessorStatus::Active),
            ("Square", ProcessorType::Square, "https://connect.squareup.com", ProcessorStatus::Testing),
        ] {
            let mut processor = CardPaymentProcessor::new(name, processor_type, endpoint);
            processor.status = status;
            processor.is_default = processor_type == ProcessorType::Stripe;
            save_record(s.marketplace.card_processors.as_ref(), processor).await?;
            created += 1;
        }

        // Configuration
        for (key, value, data_type, public) in [
            ("platform.name", "MTT Gateway", ConfigDataType::String, true),
            ("payments.min_amount_usd", "1.00", ConfigDataType::Decimal, true),
            ("maintenance_mode", "false", ConfigDataType::Boolean, true),
            ("erp.sync_batch_size", "500", ConfigDataType::Integer, false),
        ] {
            let mut entry = SystemConfiguration::new(key, value, admin.id);
            entry.data_type = data_type;
            entry.is_public = public;
            save_record(s.admin.config.as_ref(), entry).await?;
            created += 1;
        }

        // Marketplace
        save_record(s.marketplace.marketplaces.as_ref(), Marketplace::new("WeedVader")).await?;
        created += 1;

        info!(created, "demo data loaded");
        Ok(SeedSummary {
            created,
            skipped: false,
        })
    }
}
