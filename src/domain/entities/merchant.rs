//! # Merchant Records
//!
//! Merchant categories and accounts, their gateway wallets, catalog,
//! integration API keys and transaction ledger.
//!
//! A merchant has at most one primary [`MerchantGateway`].

use crate::domain::entities::record::{impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::{
    ensure_non_negative, ensure_percentage, ensure_positive, percentage_of,
};
use crate::domain::value_objects::chain::validate_address;
use crate::domain::value_objects::choices::choice_enum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

choice_enum! {
    /// Risk tier of a merchant category.
    pub enum RiskLevel("risk_level") = Medium {
        Low = "LOW" => "Low Risk",
        Medium = "MEDIUM" => "Medium Risk",
        High = "HIGH" => "High Risk",
    }
}

choice_enum! {
    /// Account status of a merchant.
    pub enum MerchantStatus("status") = Pending {
        Pending = "PENDING" => "Pending Approval",
        Active = "ACTIVE" => "Active",
        Suspended = "SUSPENDED" => "Suspended",
        Inactive = "INACTIVE" => "Inactive",
        Terminated = "TERMINATED" => "Terminated",
    }
}

choice_enum! {
    /// Depth of merchant verification.
    pub enum MerchantVerificationLevel("verification_level") = None {
        None = "NONE" => "No Verification",
        Basic = "BASIC" => "Basic Verification",
        Enhanced = "ENHANCED" => "Enhanced Verification",
        Premium = "PREMIUM" => "Premium Verification",
    }
}

choice_enum! {
    /// Custody model of a merchant gateway.
    pub enum GatewayType("gateway_type") {
        Custodial = "CUSTODIAL" => "Custodial Gateway",
        NonCustodial = "NON_CUSTODIAL" => "Non-Custodial Gateway",
        Hybrid = "HYBRID" => "Hybrid Gateway",
    }
}

choice_enum! {
    /// Operational status of a gateway.
    pub enum GatewayStatus("status") = Active {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Maintenance = "MAINTENANCE" => "Maintenance",
        Suspended = "SUSPENDED" => "Suspended",
    }
}

choice_enum! {
    /// Environment an API key is valid in.
    pub enum ApiEnvironment("environment") {
        Sandbox = "SANDBOX" => "Sandbox",
        Production = "PRODUCTION" => "Production",
    }
}

choice_enum! {
    /// Kind of merchant ledger entry.
    pub enum MerchantTransactionType("transaction_type") {
        Payment = "PAYMENT" => "Payment",
        Refund = "REFUND" => "Refund",
        Settlement = "SETTLEMENT" => "Settlement",
        Fee = "FEE" => "Fee",
    }
}

choice_enum! {
    /// Lifecycle of a merchant ledger entry.
    pub enum MerchantTransactionStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processing = "PROCESSING" => "Processing",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
        Refunded = "REFUNDED" => "Refunded",
    }
}

/// Business category of merchants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantCategory {
    /// Primary key.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Risk tier.
    pub risk_level: RiskLevel,
    /// Merchants must be verified before activation.
    pub requires_verification: bool,
    /// Open for new merchants.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl MerchantCategory {
    /// Creates an active medium-risk category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            risk_level: RiskLevel::default(),
            requires_verification: true,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl_record!(
    MerchantCategory,
    table = "merchant_category",
    plural = "merchant categories",
    listed_by = created_at,
    keys = |c| vec![key("name", &c.name)]
);

/// Merchant account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    /// Primary key.
    pub id: Uuid,
    /// Owning user, one merchant per user.
    pub user_id: Uuid,
    /// Trading name.
    pub business_name: String,
    /// Registered legal name.
    pub legal_name: Option<String>,
    /// Registration number, unique when present.
    pub business_registration_number: Option<String>,
    /// Tax identifier.
    pub tax_id: Option<String>,
    /// Business category.
    pub category_id: Uuid,
    /// Public website.
    pub website_url: Option<String>,
    /// Support contact email.
    pub support_email: String,
    /// Support phone.
    pub support_phone: Option<String>,
    /// Street address.
    pub address_line1: String,
    /// Street address, second line.
    pub address_line2: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Account status.
    pub status: MerchantStatus,
    /// Verification depth.
    pub verification_level: MerchantVerificationLevel,
    /// Verified flag.
    pub is_verified: bool,
    /// Verification time.
    pub verified_at: Option<DateTime<Utc>>,
    /// Staff user who verified the merchant.
    pub verified_by_id: Option<Uuid>,
    /// Monthly volume cap in USD.
    pub monthly_volume_limit: Decimal,
    /// Per-transaction cap in USD.
    pub transaction_limit: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last activity.
    pub last_activity: Option<DateTime<Utc>>,
}

impl Merchant {
    /// Creates a pending, unverified merchant with default limits.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        category_id: Uuid,
        business_name: impl Into<String>,
        support_email: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            business_name: business_name.into(),
            legal_name: None,
            business_registration_number: None,
            tax_id: None,
            category_id,
            website_url: None,
            support_email: support_email.into(),
            support_phone: None,
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: country.into(),
            status: MerchantStatus::default(),
            verification_level: MerchantVerificationLevel::default(),
            is_verified: false,
            verified_at: None,
            verified_by_id: None,
            monthly_volume_limit: Decimal::from(10_000),
            transaction_limit: Decimal::from(1_000),
            created_at: now,
            updated_at: now,
            last_activity: None,
        }
    }

    /// Marks the merchant verified by `staff_id` at `now`.
    pub fn verify(&mut self, staff_id: Uuid, level: MerchantVerificationLevel, now: DateTime<Utc>) {
        self.is_verified = true;
        self.verification_level = level;
        self.verified_by_id = Some(staff_id);
        self.verified_at = Some(now);
    }

    /// Validates limits and the country code.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative limits or a malformed country.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative("monthly_volume_limit", self.monthly_volume_limit)?;
        ensure_non_negative("transaction_limit", self.transaction_limit)?;
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::invalid_field(
                "country",
                "must be an ISO 3166-1 alpha-2 code",
            ));
        }
        Ok(())
    }
}

impl_record!(
    Merchant,
    table = "merchant_merchant",
    plural = "merchants",
    listed_by = created_at,
    updated = updated_at,
    validate = Merchant::validate,
    keys = |m| {
        let mut keys = vec![key("user", m.user_id)];
        keys.extend(
            m.business_registration_number
                .iter()
                .map(|n| key("business_registration_number", n)),
        );
        keys
    }
);

/// Gateway wallet configuration of a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantGateway {
    /// Primary key.
    pub id: Uuid,
    /// Merchant.
    pub merchant_id: Uuid,
    /// Name, unique per merchant.
    pub name: String,
    /// Custody model.
    pub gateway_type: GatewayType,
    /// Receiving address, unique.
    pub wallet_address: String,
    /// Encrypted key for custodial gateways.
    pub encrypted_private_key: Option<String>,
    /// Settle automatically above the threshold.
    pub auto_settlement: bool,
    /// Settlement threshold in MTT.
    pub settlement_threshold: Decimal,
    /// Merchant callback.
    pub callback_url: Option<String>,
    /// Secret used to sign callbacks.
    pub webhook_secret: Option<String>,
    /// Percentage fee per transaction.
    pub transaction_fee_percentage: Decimal,
    /// Flat fee per transaction in USD.
    pub flat_fee: Decimal,
    /// Operational status.
    pub status: GatewayStatus,
    /// Merchant's primary gateway; at most one per merchant.
    pub is_primary: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
}

impl MerchantGateway {
    /// Creates an active gateway with the default 0.5% fee.
    #[must_use]
    pub fn new(
        merchant_id: Uuid,
        name: impl Into<String>,
        gateway_type: GatewayType,
        wallet_address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            merchant_id,
            name: name.into(),
            gateway_type,
            wallet_address: wallet_address.into(),
            encrypted_private_key: None,
            auto_settlement: true,
            settlement_threshold: Decimal::from(100),
            callback_url: None,
            webhook_secret: None,
            transaction_fee_percentage: Decimal::new(5, 1),
            flat_fee: Decimal::ZERO,
            status: GatewayStatus::default(),
            is_primary: false,
            created_at: now,
            updated_at: now,
            last_used: None,
        }
    }

    /// Fee charged on `amount`: percentage plus flat fee.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if the fee does not fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use mtt_gateway::domain::entities::merchant::{GatewayType, MerchantGateway};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let gateway = MerchantGateway::new(
    ///     Uuid::new_v4(),
    ///     "Checkout",
    ///     GatewayType::NonCustodial,
    ///     "0x52908400098527886E0F7030069857D2E4169EE7",
    /// );
    /// assert_eq!(gateway.fee_for(Decimal::from(200)).unwrap(), Decimal::ONE);
    /// ```
    pub fn fee_for(&self, amount: Decimal) -> DomainResult<Decimal> {
        percentage_of(amount, self.transaction_fee_percentage)?
            .checked_add(self.flat_fee)
            .ok_or(DomainError::Overflow)
    }

    /// Validates address, fee and threshold.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        validate_address(&self.wallet_address)?;
        ensure_percentage("transaction_fee_percentage", self.transaction_fee_percentage)?;
        ensure_non_negative("flat_fee", self.flat_fee)?;
        ensure_non_negative("settlement_threshold", self.settlement_threshold)?;
        Ok(())
    }
}

impl_record!(
    MerchantGateway,
    table = "merchant_gateway",
    plural = "gateways",
    listed_by = created_at,
    updated = updated_at,
    validate = MerchantGateway::validate,
    keys = |g| vec![
        key("wallet_address", g.wallet_address.to_lowercase()),
        key("merchant_name", format!("{}/{}", g.merchant_id, g.name)),
    ],
    exclusive = |g| (g.merchant_id, is_primary)
);

/// Product or service sold by a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantProduct {
    /// Primary key.
    pub id: Uuid,
    /// Merchant.
    pub merchant_id: Uuid,
    /// Product name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Stock keeping unit, unique per merchant when present.
    pub sku: Option<String>,
    /// Price in USD.
    pub price_usd: Decimal,
    /// Price in MTT.
    pub price_mtt: Option<Decimal>,
    /// Units in stock, unlimited when `None`.
    pub stock_quantity: Option<u32>,
    /// Decrement stock on sale.
    pub track_inventory: bool,
    /// Listed for sale.
    pub is_active: bool,
    /// Highlighted in listings.
    pub is_featured: bool,
    /// Free-form category.
    pub category: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Image location.
    pub image_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl MerchantProduct {
    /// Creates an active product.
    #[must_use]
    pub fn new(merchant_id: Uuid, name: impl Into<String>, price_usd: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            merchant_id,
            name: name.into(),
            description: String::new(),
            sku: None,
            price_usd,
            price_mtt: None,
            stock_quantity: None,
            track_inventory: false,
            is_active: true,
            is_featured: false,
            category: String::new(),
            tags: Vec::new(),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `quantity` units can be sold.
    #[must_use]
    pub fn in_stock(&self, quantity: u32) -> bool {
        self.is_active
            && (!self.track_inventory || self.stock_quantity.is_none_or(|stock| stock >= quantity))
    }

    /// Validates prices.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for a non-positive price.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("price_usd", self.price_usd)?;
        if let Some(price) = self.price_mtt {
            ensure_positive("price_mtt", price)?;
        }
        Ok(())
    }
}

impl_record!(
    MerchantProduct,
    table = "merchant_product",
    plural = "products",
    listed_by = created_at,
    updated = updated_at,
    validate = MerchantProduct::validate,
    keys = |p| p
        .sku
        .iter()
        .map(|sku| key("merchant_sku", format!("{}/{sku}", p.merchant_id)))
        .collect()
);

/// Integration API key of a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantApiKey {
    /// Primary key.
    pub id: Uuid,
    /// Merchant.
    pub merchant_id: Uuid,
    /// Key name.
    pub name: String,
    /// Public key, unique.
    pub api_key: String,
    /// Secret.
    pub api_secret: String,
    /// Environment.
    pub environment: ApiEnvironment,
    /// Read scope.
    pub can_read: bool,
    /// Write scope.
    pub can_write: bool,
    /// Refund scope.
    pub can_refund: bool,
    /// Requests per minute.
    pub rate_limit_per_minute: u32,
    /// Requests per hour.
    pub rate_limit_per_hour: u32,
    /// Not revoked.
    pub is_active: bool,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl MerchantApiKey {
    /// Creates an active read-only key.
    #[must_use]
    pub fn new(
        merchant_id: Uuid,
        name: impl Into<String>,
        environment: ApiEnvironment,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            merchant_id,
            name: name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            environment,
            can_read: true,
            can_write: false,
            can_refund: false,
            rate_limit_per_minute: 60,
            rate_limit_per_hour: 3600,
            is_active: true,
            last_used: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the key is usable at `now`.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expiry| now < expiry)
    }
}

impl_record!(
    MerchantApiKey,
    table = "merchant_api_key",
    plural = "API keys",
    listed_by = created_at,
    updated = updated_at,
    keys = |k| vec![
        key("api_key", &k.api_key),
        key(
            "merchant_name_environment",
            format!("{}/{}/{}", k.merchant_id, k.name, k.environment)
        ),
    ]
);

/// Merchant ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantTransaction {
    /// Primary key.
    pub id: Uuid,
    /// Merchant.
    pub merchant_id: Uuid,
    /// Gateway used.
    pub gateway_id: Option<Uuid>,
    /// Product sold.
    pub product_id: Option<Uuid>,
    /// Kind of entry.
    pub transaction_type: MerchantTransactionType,
    /// Gross amount in USD.
    pub amount_usd: Decimal,
    /// Gross amount in MTT.
    pub amount_mtt: Decimal,
    /// Fee in USD.
    pub fee_amount: Decimal,
    /// Net amount in USD.
    pub net_amount: Decimal,
    /// On-chain hash.
    pub transaction_hash: Option<String>,
    /// Payer address.
    pub from_address: Option<String>,
    /// Payee address.
    pub to_address: Option<String>,
    /// Customer email.
    pub customer_email: Option<String>,
    /// Customer reference.
    pub customer_reference: Option<String>,
    /// Lifecycle status.
    pub status: MerchantTransactionStatus,
    /// Merchant's own reference.
    pub reference_id: Option<String>,
    /// Notes.
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

impl MerchantTransaction {
    /// Creates a pending entry; `net_amount` is `amount_usd - fee_amount`.
    #[must_use]
    pub fn new(
        merchant_id: Uuid,
        transaction_type: MerchantTransactionType,
        amount_usd: Decimal,
        amount_mtt: Decimal,
        fee_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            merchant_id,
            gateway_id: None,
            product_id: None,
            transaction_type,
            amount_usd,
            amount_mtt,
            fee_amount,
            net_amount: amount_usd - fee_amount,
            transaction_hash: None,
            from_address: None,
            to_address: None,
            customer_email: None,
            customer_reference: None,
            status: MerchantTransactionStatus::default(),
            reference_id: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}

impl_record!(
    MerchantTransaction,
    table = "merchant_transaction",
    plural = "merchant transactions",
    listed_by = created_at,
    updated = updated_at
);
