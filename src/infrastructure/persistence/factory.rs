//! # Store Factory
//!
//! Builds one [`RecordStore`] per gateway record, grouped by product
//! module, over either in-memory storage or a PostgreSQL pool.
//!
//! # Examples
//!
//! ```
//! use mtt_gateway::infrastructure::persistence::StoreFactory;
//!
//! let stores = StoreFactory::InMemory.build();
//! assert_eq!(stores.tables().len(), 49);
//! ```

use crate::domain::entities::Record;
use crate::domain::entities::accounts::User;
use crate::domain::entities::admin::{
    AdminPanel, ErpIntegration, ErpSyncLog, PaymentGatewaySetup, SystemAlert, SystemConfiguration,
    WebUiComponent,
};
use crate::domain::entities::customers::{
    CustomerActivity, CustomerKyc, CustomerNotification, CustomerProfile, CustomerSupport,
};
use crate::domain::entities::marketplace::{
    BankProcessor, CardPaymentProcessor, FiatTransaction, Marketplace, MarketplaceListing,
    MarketplaceOrder,
};
use crate::domain::entities::merchant::{
    Merchant, MerchantApiKey, MerchantCategory, MerchantGateway, MerchantProduct,
    MerchantTransaction,
};
use crate::domain::entities::payments::{
    CustomerPaymentMethod, ExchangeRate, PaymentMethod, PaymentRefund, PaymentTransaction,
    PaymentWebhook,
};
use crate::domain::entities::tokens::{
    Token, TokenAllowance, TokenBalance, TokenPrice, TokenTransfer,
};
use crate::domain::entities::trading::{
    LiquidityPool, RoutingEngine, RoutingPath, TokenIssuance, TradeExecution, TradeOrder,
    TradingPair,
};
use crate::domain::entities::wallets::{
    Wallet, WalletAddress, WalletBackup, WalletPermission, WalletTransaction, WalletType,
};
use crate::infrastructure::persistence::in_memory::InMemoryStore;
use crate::infrastructure::persistence::postgres::PostgresStore;
use crate::infrastructure::persistence::traits::{RecordStore, RepositoryResult};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Shared handle to the store of one record type.
pub type Store<T> = Arc<dyn RecordStore<T>>;

/// Backend the stores are built over.
#[derive(Debug, Clone)]
pub enum StoreFactory {
    /// Process-local maps.
    InMemory,
    /// PostgreSQL document tables.
    Postgres(PgPool),
}

impl StoreFactory {
    /// Builds the store for one record type.
    #[must_use]
    pub fn store<T: Record>(&self) -> Store<T> {
        match self {
            Self::InMemory => Arc::new(InMemoryStore::<T>::new()),
            Self::Postgres(pool) => Arc::new(PostgresStore::<T>::new(pool.clone())),
        }
    }

    /// Builds the stores of every record type.
    #[must_use]
    pub fn build(&self) -> GatewayStores {
        GatewayStores::build(self)
    }

    /// Creates every record table. A no-op for in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Query` if a statement fails.
    pub async fn migrate(&self) -> RepositoryResult<()> {
        match self {
            Self::InMemory => Ok(()),
            Self::Postgres(pool) => {
                GatewayStores::migrate(pool).await?;
                info!(tables = GatewayStores::TABLES.len(), "database migrated");
                Ok(())
            }
        }
    }
}

/// Number of records held in one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    /// Table name.
    pub table: &'static str,
    /// Plural noun of the record.
    pub records_of: &'static str,
    /// Stored records.
    pub count: u64,
}

macro_rules! record_groups {
    (
        $(
            $(#[$meta:meta])*
            $group:ident: $group_ty:ident {
                $($field:ident: $record:ty),+ $(,)?
            }
        )+
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $group_ty {
                $(
                    #[doc = concat!("Store of [`", stringify!($record), "`] records.")]
                    pub $field: Store<$record>,
                )+
            }

            impl $group_ty {
                fn build(factory: &StoreFactory) -> Self {
                    Self {
                        $($field: factory.store::<$record>(),)+
                    }
                }

                async fn migrate(pool: &PgPool) -> RepositoryResult<()> {
                    $(PostgresStore::<$record>::migrate(pool).await?;)+
                    Ok(())
                }

                async fn counts(&self, out: &mut Vec<TableCount>) -> RepositoryResult<()> {
                    $(
                        out.push(TableCount {
                            table: <$record as Record>::TABLE,
                            records_of: <$record as Record>::PLURAL,
                            count: self.$field.count().await?,
                        });
                    )+
                    Ok(())
                }
            }
        )+

        /// Stores of every gateway record, grouped by product module.
        #[derive(Debug, Clone)]
        pub struct GatewayStores {
            $(
                #[doc = concat!("Stores of the `", stringify!($group), "` module.")]
                pub $group: $group_ty,
            )+
        }

        impl GatewayStores {
            /// Table names of every record, in module order.
            pub const TABLES: &'static [&'static str] = &[
                $($(<$record as Record>::TABLE,)+)+
            ];

            fn build(factory: &StoreFactory) -> Self {
                Self {
                    $($group: $group_ty::build(factory),)+
                }
            }

            async fn migrate(pool: &PgPool) -> RepositoryResult<()> {
                $($group_ty::migrate(pool).await?;)+
                Ok(())
            }

            /// Table names of every record.
            #[must_use]
            pub fn tables(&self) -> &'static [&'static str] {
                Self::TABLES
            }

            /// Record counts of every table.
            ///
            /// # Errors
            ///
            /// Returns the first store error.
            pub async fn counts(&self) -> RepositoryResult<Vec<TableCount>> {
                let mut out = Vec::with_capacity(Self::TABLES.len());
                $(self.$group.counts(&mut out).await?;)+
                Ok(out)
            }
        }
    };
}

record_groups! {
    /// Platform user stores.
    accounts: AccountStores {
        users: User,
    }

    /// Token module stores.
    tokens: TokenStores {
        tokens: Token,
        balances: TokenBalance,
        transfers: TokenTransfer,
        prices: TokenPrice,
        allowances: TokenAllowance,
    }

    /// Wallet module stores.
    wallets: WalletStores {
        types: WalletType,
        wallets: Wallet,
        addresses: WalletAddress,
        transactions: WalletTransaction,
        backups: WalletBackup,
        permissions: WalletPermission,
    }

    /// Merchant module stores.
    merchant: MerchantStores {
        categories: MerchantCategory,
        merchants: Merchant,
        gateways: MerchantGateway,
        products: MerchantProduct,
        api_keys: MerchantApiKey,
        transactions: MerchantTransaction,
    }

    /// Customer module stores.
    customers: CustomerStores {
        profiles: CustomerProfile,
        kyc: CustomerKyc,
        activities: CustomerActivity,
        support: CustomerSupport,
        notifications: CustomerNotification,
    }

    /// Payment module stores.
    payments: PaymentStores {
        methods: PaymentMethod,
        customer_methods: CustomerPaymentMethod,
        transactions: PaymentTransaction,
        rates: ExchangeRate,
        webhooks: PaymentWebhook,
        refunds: PaymentRefund,
    }

    /// Trading (MayTheToken) module stores.
    trading: TradingStores {
        pairs: TradingPair,
        orders: TradeOrder,
        executions: TradeExecution,
        issuances: TokenIssuance,
        engines: RoutingEngine,
        paths: RoutingPath,
        pools: LiquidityPool,
    }

    /// Admin and ERP (Canasale) module stores.
    admin: AdminStores {
        config: SystemConfiguration,
        erp: ErpIntegration,
        sync_logs: ErpSyncLog,
        panels: AdminPanel,
        components: WebUiComponent,
        setups: PaymentGatewaySetup,
        alerts: SystemAlert,
    }

    /// Marketplace (WeedVader) module stores.
    marketplace: MarketplaceStores {
        marketplaces: Marketplace,
        listings: MarketplaceListing,
        orders: MarketplaceOrder,
        card_processors: CardPaymentProcessor,
        bank_processors: BankProcessor,
        fiat: FiatTransaction,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::wallets::WalletCategory;
    use std::collections::HashSet;

    #[test]
    fn table_names_are_unique() {
        let unique: HashSet<_> = GatewayStores::TABLES.iter().collect();
        assert_eq!(unique.len(), GatewayStores::TABLES.len());
    }

    #[tokio::test]
    async fn counts_cover_every_table() {
        let stores = StoreFactory::InMemory.build();
        stores
            .wallets
            .types
            .save(WalletType::new("MetaMask", WalletCategory::NonCustodial))
            .await
            .unwrap();

        let counts = stores.counts().await.unwrap();
        assert_eq!(counts.len(), GatewayStores::TABLES.len());
        let wallet_types = counts.iter().find(|c| c.table == "wallets_type").unwrap();
        assert_eq!(wallet_types.count, 1);
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 1);
    }

    #[tokio::test]
    async fn in_memory_migrate_is_noop() {
        assert!(StoreFactory::InMemory.migrate().await.is_ok());
    }
}
