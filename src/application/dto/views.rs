//! # Record Views
//!
//! Serialized shapes of records whose listing differs from the stored
//! record: secrets are never serialized, and some listings carry the
//! display names of referenced users and tokens or a derived value.
//!
//! Enriched views flatten the record and append the extra fields, so the
//! listing is the stored record plus, e.g., `username`.

use crate::domain::entities::admin::{
    ConfigDataType, ErpIntegration, ErpIntegrationType, ErpStatus, SystemConfiguration,
};
use crate::domain::entities::customers::CustomerProfile;
use crate::domain::entities::marketplace::{CardPaymentProcessor, ProcessorStatus, ProcessorType};
use crate::domain::entities::merchant::{GatewayStatus, GatewayType, MerchantGateway};
use crate::domain::entities::tokens::{TokenBalance, TokenPrice, TokenTransfer};
use crate::domain::entities::trading::LiquidityPool;
use crate::domain::entities::wallets::{Wallet, WalletStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Display names of referenced records, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Names(HashMap<Uuid, String>);

impl Names {
    /// Creates a lookup from `(id, name)` pairs.
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (Uuid, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Name of `id`, if it was resolved.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<String> {
        self.0.get(&id).cloned()
    }

    /// Name of an optional reference.
    #[must_use]
    pub fn get_opt(&self, id: Option<Uuid>) -> Option<String> {
        id.and_then(|id| self.get(id))
    }

    /// Number of resolved names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Token balance with owner and token names.
#[derive(Debug, Clone, Serialize)]
pub struct TokenBalanceView {
    /// Stored balance.
    #[serde(flatten)]
    pub balance: TokenBalance,
    /// Owner's username.
    pub username: Option<String>,
    /// Token symbol.
    pub token_symbol: Option<String>,
}

impl TokenBalanceView {
    /// Builds the view from resolved names.
    #[must_use]
    pub fn new(balance: TokenBalance, users: &Names, tokens: &Names) -> Self {
        Self {
            username: users.get(balance.user_id),
            token_symbol: tokens.get(balance.token_id),
            balance,
        }
    }
}

/// Token transfer with sender, recipient and token names.
#[derive(Debug, Clone, Serialize)]
pub struct TokenTransferView {
    /// Stored transfer.
    #[serde(flatten)]
    pub transfer: TokenTransfer,
    /// Token symbol.
    pub token_symbol: Option<String>,
    /// Sender's username.
    pub from_user: Option<String>,
    /// Recipient's username.
    pub to_user: Option<String>,
}

impl TokenTransferView {
    /// Builds the view from resolved names.
    #[must_use]
    pub fn new(transfer: TokenTransfer, users: &Names, tokens: &Names) -> Self {
        Self {
            token_symbol: tokens.get(transfer.token_id),
            from_user: users.get_opt(transfer.from_user_id),
            to_user: users.get_opt(transfer.to_user_id),
            transfer,
        }
    }
}

/// Token price with the token symbol.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPriceView {
    /// Stored price point.
    #[serde(flatten)]
    pub price: TokenPrice,
    /// Token symbol.
    pub token_symbol: Option<String>,
}

impl TokenPriceView {
    /// Builds the view from resolved names.
    #[must_use]
    pub fn new(price: TokenPrice, tokens: &Names) -> Self {
        Self {
            token_symbol: tokens.get(price.token_id),
            price,
        }
    }
}

// ============================================================================
// Wallets
// ============================================================================

/// Wallet without key material.
#[derive(Debug, Clone, Serialize)]
pub struct WalletView {
    /// Primary key.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Owner's username.
    pub username: Option<String>,
    /// Wallet type.
    pub wallet_type_id: Uuid,
    /// Wallet type name.
    pub wallet_type: Option<String>,
    /// Name.
    pub name: String,
    /// Address.
    pub address: String,
    /// Public key.
    pub public_key: Option<String>,
    /// Operational status.
    pub status: WalletStatus,
    /// Owner's primary wallet.
    pub is_primary: bool,
    /// Receives merchant payments.
    pub is_merchant: bool,
    /// Backs a merchant gateway.
    pub is_gateway: bool,
    /// Whether a recovery phrase is stored.
    pub has_backup: bool,
    /// Last on-chain activity.
    pub last_activity: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WalletView {
    /// Builds the view from resolved names.
    #[must_use]
    pub fn new(wallet: &Wallet, users: &Names, wallet_types: &Names) -> Self {
        Self {
            id: wallet.id,
            user_id: wallet.user_id,
            username: users.get(wallet.user_id),
            wallet_type_id: wallet.wallet_type_id,
            wallet_type: wallet_types.get(wallet.wallet_type_id),
            name: wallet.name.clone(),
            address: wallet.address.clone(),
            public_key: wallet.public_key.clone(),
            status: wallet.status,
            is_primary: wallet.is_primary,
            is_merchant: wallet.is_merchant,
            is_gateway: wallet.is_gateway,
            has_backup: wallet.backup_phrase_encrypted.is_some(),
            last_activity: wallet.last_activity,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
        }
    }
}

impl From<&Wallet> for WalletView {
    fn from(wallet: &Wallet) -> Self {
        Self::new(wallet, &Names::default(), &Names::default())
    }
}

// ============================================================================
// Merchant
// ============================================================================

/// Merchant gateway without its private key and webhook secret.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantGatewayView {
    /// Primary key.
    pub id: Uuid,
    /// Owning merchant.
    pub merchant_id: Uuid,
    /// Gateway name.
    pub name: String,
    /// Gateway kind.
    pub gateway_type: GatewayType,
    /// Settlement address.
    pub wallet_address: String,
    /// Settle automatically above the threshold.
    pub auto_settlement: bool,
    /// Settlement threshold.
    pub settlement_threshold: Decimal,
    /// Callback URL.
    pub callback_url: Option<String>,
    /// Whether webhooks are signed.
    pub has_webhook_secret: bool,
    /// Percentage fee.
    pub transaction_fee_percentage: Decimal,
    /// Flat fee.
    pub flat_fee: Decimal,
    /// Operational status.
    pub status: GatewayStatus,
    /// Merchant's primary gateway.
    pub is_primary: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
}

impl From<&MerchantGateway> for MerchantGatewayView {
    fn from(gateway: &MerchantGateway) -> Self {
        Self {
            id: gateway.id,
            merchant_id: gateway.merchant_id,
            name: gateway.name.clone(),
            gateway_type: gateway.gateway_type,
            wallet_address: gateway.wallet_address.clone(),
            auto_settlement: gateway.auto_settlement,
            settlement_threshold: gateway.settlement_threshold,
            callback_url: gateway.callback_url.clone(),
            has_webhook_secret: gateway.webhook_secret.is_some(),
            transaction_fee_percentage: gateway.transaction_fee_percentage,
            flat_fee: gateway.flat_fee,
            status: gateway.status,
            is_primary: gateway.is_primary,
            created_at: gateway.created_at,
            last_used: gateway.last_used,
        }
    }
}

// ============================================================================
// Customers
// ============================================================================

/// Customer profile with the account's username.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfileView {
    /// Stored profile.
    #[serde(flatten)]
    pub profile: CustomerProfile,
    /// Account username.
    pub username: Option<String>,
    /// First and last name.
    pub full_name: String,
}

impl CustomerProfileView {
    /// Builds the view from resolved names.
    #[must_use]
    pub fn new(profile: CustomerProfile, users: &Names) -> Self {
        Self {
            username: users.get(profile.user_id),
            full_name: profile.full_name(),
            profile,
        }
    }
}

// ============================================================================
// Trading
// ============================================================================

/// Liquidity pool with its derived spot price.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidityPoolView {
    /// Stored pool.
    #[serde(flatten)]
    pub pool: LiquidityPool,
    /// `quote_reserve / base_reserve`, zero for an empty pool.
    pub price: Decimal,
}

impl From<LiquidityPool> for LiquidityPoolView {
    fn from(pool: LiquidityPool) -> Self {
        Self {
            price: pool.price(),
            pool,
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

/// Public configuration entry; encrypted values are withheld.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEntryView {
    /// Setting key.
    pub key: String,
    /// Value decoded per `data_type`, `null` when encrypted or malformed.
    pub value: serde_json::Value,
    /// Declared value type.
    pub data_type: ConfigDataType,
    /// Description.
    pub description: String,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<&SystemConfiguration> for ConfigEntryView {
    fn from(config: &SystemConfiguration) -> Self {
        let value = if config.is_encrypted {
            serde_json::Value::Null
        } else {
            config.typed_value().unwrap_or(serde_json::Value::Null)
        };
        Self {
            key: config.key.clone(),
            value,
            data_type: config.data_type,
            description: config.description.clone(),
            updated_at: config.updated_at,
        }
    }
}

/// ERP integration without its credentials.
#[derive(Debug, Clone, Serialize)]
pub struct ErpIntegrationView {
    /// Primary key.
    pub id: Uuid,
    /// Owning merchant.
    pub merchant_id: Uuid,
    /// ERP product.
    pub integration_type: ErpIntegrationType,
    /// Integration name.
    pub name: String,
    /// ERP API endpoint.
    pub api_endpoint: String,
    /// Minutes between automatic syncs.
    pub sync_interval_minutes: u32,
    /// Automatic sync enabled.
    pub auto_sync: bool,
    /// Synced entity kinds.
    pub sync_orders: bool,
    /// Synced entity kinds.
    pub sync_customers: bool,
    /// Synced entity kinds.
    pub sync_products: bool,
    /// Synced entity kinds.
    pub sync_payments: bool,
    /// Connection status.
    pub status: ErpStatus,
    /// Last completed sync.
    pub last_sync: Option<DateTime<Utc>>,
    /// Completed syncs.
    pub sync_count: u32,
    /// Failed syncs.
    pub error_count: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&ErpIntegration> for ErpIntegrationView {
    fn from(erp: &ErpIntegration) -> Self {
        Self {
            id: erp.id,
            merchant_id: erp.merchant_id,
            integration_type: erp.integration_type,
            name: erp.name.clone(),
            api_endpoint: erp.api_endpoint.clone(),
            sync_interval_minutes: erp.sync_interval_minutes,
            auto_sync: erp.auto_sync,
            sync_orders: erp.sync_orders,
            sync_customers: erp.sync_customers,
            sync_products: erp.sync_products,
            sync_payments: erp.sync_payments,
            status: erp.status,
            last_sync: erp.last_sync,
            sync_count: erp.sync_count,
            error_count: erp.error_count,
            created_at: erp.created_at,
        }
    }
}

// ============================================================================
// Marketplace
// ============================================================================

/// Card processor without API credentials.
#[derive(Debug, Clone, Serialize)]
pub struct CardProcessorView {
    /// Primary key.
    pub id: Uuid,
    /// Processor name.
    pub name: String,
    /// Processor product.
    pub processor_type: ProcessorType,
    /// Human label of the processor product.
    pub processor_label: &'static str,
    /// Accepts cards.
    pub supports_cards: bool,
    /// Accepts digital wallets.
    pub supports_digital_wallets: bool,
    /// Percentage fee.
    pub transaction_fee_percentage: Decimal,
    /// Fixed fee in cents.
    pub fixed_fee_cents: u32,
    /// Operational status.
    pub status: ProcessorStatus,
    /// Default processor.
    pub is_default: bool,
    /// Routing priority.
    pub priority: u16,
}

impl From<&CardPaymentProcessor> for CardProcessorView {
    fn from(processor: &CardPaymentProcessor) -> Self {
        Self {
            id: processor.id,
            name: processor.name.clone(),
            processor_type: processor.processor_type,
            processor_label: processor.processor_type.label(),
            supports_cards: processor.supports_cards,
            supports_digital_wallets: processor.supports_digital_wallets,
            transaction_fee_percentage: processor.transaction_fee_percentage,
            fixed_fee_cents: processor.fixed_fee_cents,
            status: processor.status,
            is_default: processor.is_default,
            priority: processor.priority,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn wallet_view_hides_key_material() {
        let mut wallet = Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Main", ADDRESS);
        wallet.private_key_encrypted = Some("enc:private".to_string());
        wallet.backup_phrase_encrypted = Some("enc:phrase".to_string());

        let users = Names::new([(wallet.user_id, "alice".to_string())]);
        let view = WalletView::new(&wallet, &users, &Names::default());
        let json = serde_json::to_string(&view).unwrap();

        assert!(!json.contains("enc:"));
        assert!(view.has_backup);
        assert_eq!(view.username.as_deref(), Some("alice"));
        assert!(view.wallet_type.is_none());
    }

    #[test]
    fn gateway_view_hides_secrets() {
        let mut gateway =
            MerchantGateway::new(Uuid::new_v4(), "Checkout", GatewayType::NonCustodial, ADDRESS);
        gateway.encrypted_private_key = Some("enc:key".to_string());
        gateway.webhook_secret = Some("whsec".to_string());

        let json = serde_json::to_value(MerchantGatewayView::from(&gateway)).unwrap();
        let text = json.to_string();
        assert!(!text.contains("enc:key"));
        assert!(!text.contains("whsec"));
        assert_eq!(json["has_webhook_secret"], true);
    }

    #[test]
    fn balance_view_flattens_record() {
        let mut balance = TokenBalance::new(Uuid::new_v4(), Uuid::new_v4());
        balance.balance = Decimal::from(5);
        let tokens = Names::new([(balance.token_id, "MTT".to_string())]);

        let json = serde_json::to_value(TokenBalanceView::new(
            balance.clone(),
            &Names::default(),
            &tokens,
        ))
        .unwrap();
        assert_eq!(json["id"], balance.id.to_string());
        assert_eq!(json["token_symbol"], "MTT");
        assert!(json["username"].is_null());
    }

    #[test]
    fn encrypted_config_value_withheld() {
        let mut config = SystemConfiguration::new("stripe.secret", "sk_live_123", Uuid::new_v4());
        config.is_encrypted = true;
        let view = ConfigEntryView::from(&config);
        assert!(view.value.is_null());

        let mut limit = SystemConfiguration::new("limits.daily", "2500", Uuid::new_v4());
        limit.data_type = ConfigDataType::Integer;
        assert_eq!(ConfigEntryView::from(&limit).value, serde_json::json!(2500));
    }

    #[test]
    fn processor_view_hides_credentials() {
        let mut processor = CardPaymentProcessor::new(
            "Stripe",
            ProcessorType::Stripe,
            "https://api.stripe.com",
        );
        processor.api_key = "pk_live".to_string();
        processor.api_secret = "sk_live".to_string();

        let text = serde_json::to_string(&CardProcessorView::from(&processor)).unwrap();
        assert!(!text.contains("pk_live"));
        assert!(!text.contains("sk_live"));
        assert!(text.contains("\"processor_label\":\"Stripe\""));
    }

    #[test]
    fn names_lookup() {
        let id = Uuid::new_v4();
        let names = Names::new([(id, "bob".to_string())]);
        assert_eq!(names.get(id).as_deref(), Some("bob"));
        assert!(names.get_opt(None).is_none());
        assert_eq!(names.len(), 1);
    }
}
