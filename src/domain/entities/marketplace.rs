//! # Marketplace Records
//!
//! Marketplaces, their listings and orders, card and bank processors, and
//! fiat transactions settled through banks.
//!
//! At most one card processor is the default and at most one bank
//! processor is primary, platform-wide.

use crate::domain::entities::record::{ExclusiveFlag, impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::{
    HUNDRED, ensure_non_negative, ensure_percentage, ensure_positive, percentage_of,
};
use crate::domain::value_objects::choices::choice_enum;
use crate::domain::value_objects::reference;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum slug length.
pub const MAX_SLUG_LEN: usize = 250;

choice_enum! {
    /// Listing lifecycle.
    pub enum ListingStatus("status") = Draft {
        Draft = "DRAFT" => "Draft",
        Pending = "PENDING" => "Pending Approval",
        Active = "ACTIVE" => "Active",
        Sold = "SOLD" => "Sold",
        Suspended = "SUSPENDED" => "Suspended",
        Expired = "EXPIRED" => "Expired",
    }
}

choice_enum! {
    /// Item condition.
    pub enum ItemCondition("condition") = New {
        New = "NEW" => "New",
        LikeNew = "LIKE_NEW" => "Like New",
        Good = "GOOD" => "Good",
        Fair = "FAIR" => "Fair",
        Poor = "POOR" => "Poor",
    }
}

choice_enum! {
    /// Marketplace order lifecycle.
    pub enum MarketplaceOrderStatus("status") = Pending {
        Pending = "PENDING" => "Pending Payment",
        Paid = "PAID" => "Paid",
        Processing = "PROCESSING" => "Processing",
        Shipped = "SHIPPED" => "Shipped",
        Delivered = "DELIVERED" => "Delivered",
        Cancelled = "CANCELLED" => "Cancelled",
        Refunded = "REFUNDED" => "Refunded",
        Disputed = "DISPUTED" => "Disputed",
    }
}

choice_enum! {
    /// Card processor vendor.
    pub enum ProcessorType("processor_type") {
        Stripe = "STRIPE" => "Stripe",
        Paypal = "PAYPAL" => "PayPal",
        Square = "SQUARE" => "Square",
        Adyen = "ADYEN" => "Adyen",
        AuthorizeNet = "AUTHORIZE_NET" => "Authorize.Net",
        Braintree = "BRAINTREE" => "Braintree",
    }
}

choice_enum! {
    /// Card processor status.
    pub enum ProcessorStatus("status") = Inactive {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Testing = "TESTING" => "Testing",
        Maintenance = "MAINTENANCE" => "Maintenance",
    }
}

choice_enum! {
    /// Kind of bank.
    pub enum BankType("bank_type") {
        Commercial = "COMMERCIAL" => "Commercial Bank",
        Investment = "INVESTMENT" => "Investment Bank",
        Central = "CENTRAL" => "Central Bank",
        CreditUnion = "CREDIT_UNION" => "Credit Union",
        Online = "ONLINE" => "Online Bank",
    }
}

choice_enum! {
    /// How the platform talks to a bank.
    pub enum ConnectionType("connection_type") = Api {
        Api = "API" => "API Integration",
        Sftp = "SFTP" => "SFTP",
        Manual = "MANUAL" => "Manual Processing",
    }
}

choice_enum! {
    /// Bank processor status.
    pub enum BankStatus("status") = Inactive {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        UnderReview = "UNDER_REVIEW" => "Under Review",
        Suspended = "SUSPENDED" => "Suspended",
    }
}

choice_enum! {
    /// Kind of fiat transaction.
    pub enum FiatTransactionType("transaction_type") {
        Deposit = "DEPOSIT" => "Deposit",
        Withdrawal = "WITHDRAWAL" => "Withdrawal",
        Transfer = "TRANSFER" => "Transfer",
        Conversion = "CONVERSION" => "Currency Conversion",
        FeeCollection = "FEE_COLLECTION" => "Fee Collection",
    }
}

choice_enum! {
    /// Fiat transaction lifecycle.
    pub enum FiatStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processing = "PROCESSING" => "Processing",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
        Reversed = "REVERSED" => "Reversed",
    }
}

// ============================================================================
// Marketplace, listings and orders
// ============================================================================

/// A marketplace and its commercial settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marketplace {
    /// Primary key.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Logo file path.
    pub logo: Option<String>,
    /// Commission percentage taken on each order.
    pub commission_rate: Decimal,
    /// Minimum listing price in USD.
    pub min_listing_price: Decimal,
    /// Maximum listing price in USD.
    pub max_listing_price: Option<Decimal>,
    /// Open.
    pub is_active: bool,
    /// Listings need approval.
    pub requires_approval: bool,
    /// Sellers outside the platform allowed.
    pub allow_external_sellers: bool,
    /// Accepted currencies.
    pub supported_currencies: Vec<String>,
    /// Default currency.
    pub default_currency: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Marketplace {
    /// Creates an active marketplace with a 2.5% commission.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            logo: None,
            commission_rate: Decimal::new(25, 1),
            min_listing_price: Decimal::ONE,
            max_listing_price: None,
            is_active: true,
            requires_approval: true,
            allow_external_sellers: true,
            supported_currencies: Vec::new(),
            default_currency: "USD".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Commission due on `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if the product does not fit.
    pub fn commission_for(&self, amount: Decimal) -> DomainResult<Decimal> {
        percentage_of(amount, self.commission_rate).map(|c| c.round_dp(2))
    }

    /// Whether a listing at `price` is allowed.
    #[must_use]
    pub fn allows_price(&self, price: Decimal) -> bool {
        price >= self.min_listing_price && self.max_listing_price.is_none_or(|max| price <= max)
    }

    /// Validates commission and price bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_percentage("commission_rate", self.commission_rate)?;
        ensure_positive("min_listing_price", self.min_listing_price)?;
        if let Some(max) = self.max_listing_price
            && max < self.min_listing_price
        {
            return Err(DomainError::InvalidAmount(format!(
                "max_listing_price {max} is below min_listing_price {}",
                self.min_listing_price
            )));
        }
        Ok(())
    }
}

impl_record!(
    Marketplace,
    table = "weedvader_marketplace",
    plural = "marketplaces",
    listed_by = created_at,
    updated = updated_at,
    validate = Marketplace::validate,
    keys = |m| vec![key("name", &m.name)]
);

/// An item listed on a marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceListing {
    /// Primary key.
    pub id: Uuid,
    /// Marketplace.
    pub marketplace_id: Uuid,
    /// Selling merchant.
    pub seller_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Category.
    pub category: String,
    /// Subcategory.
    pub subcategory: String,
    /// Brand.
    pub brand: String,
    /// Model.
    pub model: String,
    /// Condition.
    pub condition: ItemCondition,
    /// USD price.
    pub price_usd: Decimal,
    /// MTT price.
    pub price_mtt: Option<Decimal>,
    /// Units available.
    pub quantity: u32,
    /// Seller SKU.
    pub sku: String,
    /// Main image path.
    pub primary_image: Option<String>,
    /// Additional image URLs.
    pub additional_images: Vec<String>,
    /// Lifecycle status.
    pub status: ListingStatus,
    /// Featured.
    pub is_featured: bool,
    /// Views.
    pub views_count: u32,
    /// Favorites.
    pub favorites_count: u32,
    /// Unique URL slug.
    pub slug: String,
    /// SEO description.
    pub meta_description: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl MarketplaceListing {
    /// Creates a draft listing of one new item; the slug is derived from
    /// the title.
    #[must_use]
    pub fn new(
        marketplace_id: Uuid,
        seller_id: Uuid,
        title: impl Into<String>,
        category: impl Into<String>,
        price_usd: Decimal,
    ) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            marketplace_id,
            seller_id,
            slug: slugify(&title),
            title,
            description: String::new(),
            category: category.into(),
            subcategory: String::new(),
            brand: String::new(),
            model: String::new(),
            condition: ItemCondition::default(),
            price_usd,
            price_mtt: None,
            quantity: 1,
            sku: String::new(),
            primary_image: None,
            additional_images: Vec::new(),
            status: ListingStatus::default(),
            is_featured: false,
            views_count: 0,
            favorites_count: 0,
            meta_description: String::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
            expires_at: None,
        }
    }

    /// Validates price, slug and SEO description.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        if self.price_usd < Decimal::new(1, 2) {
            return Err(DomainError::InvalidAmount(format!(
                "price_usd must be at least 0.01, got {}",
                self.price_usd
            )));
        }
        if let Some(mtt) = self.price_mtt {
            ensure_positive("price_mtt", mtt)?;
        }
        if !is_slug(&self.slug) {
            return Err(DomainError::invalid_field(
                "slug",
                "must be 1 to 250 lowercase letters, digits, '-' or '_'",
            ));
        }
        if self.meta_description.chars().count() > 160 {
            return Err(DomainError::invalid_field(
                "meta_description",
                "must be at most 160 characters",
            ));
        }
        Ok(())
    }
}

impl_record!(
    MarketplaceListing,
    table = "weedvader_marketplace_listing",
    plural = "listings",
    listed_by = created_at,
    updated = updated_at,
    validate = MarketplaceListing::validate,
    keys = |l| vec![key("slug", &l.slug)]
);

/// An order placed on a marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceOrder {
    /// Primary key.
    pub id: Uuid,
    /// Marketplace.
    pub marketplace_id: Uuid,
    /// Ordered listing.
    pub listing_id: Uuid,
    /// Buying customer profile.
    pub buyer_id: Uuid,
    /// Selling merchant.
    pub seller_id: Uuid,
    /// Units ordered.
    pub quantity: u32,
    /// USD unit price.
    pub unit_price_usd: Decimal,
    /// MTT unit price.
    pub unit_price_mtt: Option<Decimal>,
    /// USD total.
    pub total_amount_usd: Decimal,
    /// MTT total.
    pub total_amount_mtt: Option<Decimal>,
    /// Marketplace commission.
    pub marketplace_fee: Decimal,
    /// Payment processing fee.
    pub payment_processing_fee: Decimal,
    /// Amount paid out to the seller.
    pub seller_net_amount: Decimal,
    /// Shipping address.
    pub shipping_address: serde_json::Value,
    /// Shipping cost.
    pub shipping_cost: Decimal,
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Carrier.
    pub shipping_carrier: String,
    /// Lifecycle status.
    pub status: MarketplaceOrderStatus,
    /// `MKT-` reference, assigned on first save when empty.
    pub order_number: String,
    /// Payment.
    pub payment_transaction_id: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Shipment time.
    pub shipped_at: Option<DateTime<Utc>>,
    /// Delivery time.
    pub delivered_at: Option<DateTime<Utc>>,
}

impl MarketplaceOrder {
    /// Creates a pending order for `quantity` units of `listing`, charging
    /// the marketplace commission.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if the totals do not fit.
    pub fn for_listing(
        marketplace: &Marketplace,
        listing: &MarketplaceListing,
        buyer_id: Uuid,
        quantity: u32,
    ) -> DomainResult<Self> {
        let units = Decimal::from(quantity);
        let total = listing
            .price_usd
            .checked_mul(units)
            .ok_or(DomainError::Overflow)?;
        let fee = marketplace.commission_for(total)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            marketplace_id: marketplace.id,
            listing_id: listing.id,
            buyer_id,
            seller_id: listing.seller_id,
            quantity,
            unit_price_usd: listing.price_usd,
            unit_price_mtt: listing.price_mtt,
            total_amount_usd: total,
            total_amount_mtt: listing.price_mtt.and_then(|p| p.checked_mul(units)),
            marketplace_fee: fee,
            payment_processing_fee: Decimal::ZERO,
            seller_net_amount: total - fee,
            shipping_address: serde_json::Value::Object(serde_json::Map::new()),
            shipping_cost: Decimal::ZERO,
            tracking_number: String::new(),
            shipping_carrier: String::new(),
            status: MarketplaceOrderStatus::default(),
            order_number: String::new(),
            payment_transaction_id: None,
            created_at: now,
            updated_at: now,
            shipped_at: None,
            delivered_at: None,
        })
    }

    /// Validates amounts.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::invalid_field("quantity", "must be positive"));
        }
        ensure_non_negative("total_amount_usd", self.total_amount_usd)?;
        ensure_non_negative("marketplace_fee", self.marketplace_fee)?;
        ensure_non_negative("shipping_cost", self.shipping_cost)?;
        Ok(())
    }
}

impl_record!(
    MarketplaceOrder,
    table = "weedvader_marketplace_order",
    plural = "orders",
    listed_by = created_at,
    updated = updated_at,
    validate = MarketplaceOrder::validate,
    keys = |o| vec![key("order_number", &o.order_number)],
    prepare = |o, _now| {
        if o.order_number.is_empty() {
            o.order_number = reference::order_number();
        }
    }
);

// ============================================================================
// Processors
// ============================================================================

/// Card payment processor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPaymentProcessor {
    /// Primary key.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Vendor.
    pub processor_type: ProcessorType,
    /// API endpoint.
    pub api_endpoint: String,
    /// API key. Never exposed by the API.
    pub api_key: String,
    /// API secret. Never exposed by the API.
    pub api_secret: String,
    /// Webhook secret. Never exposed by the API.
    pub webhook_secret: Option<String>,
    /// Cards.
    pub supports_cards: bool,
    /// Digital wallets.
    pub supports_digital_wallets: bool,
    /// Bank transfers.
    pub supports_bank_transfers: bool,
    /// Subscriptions.
    pub supports_subscriptions: bool,
    /// Percentage fee.
    pub transaction_fee_percentage: Decimal,
    /// Fixed fee in cents.
    pub fixed_fee_cents: u32,
    /// Minimum amount.
    pub min_transaction_amount: Decimal,
    /// Maximum amount.
    pub max_transaction_amount: Option<Decimal>,
    /// Status.
    pub status: ProcessorStatus,
    /// Default processor; at most one.
    pub is_default: bool,
    /// Lower runs first.
    pub priority: u16,
    /// Success percentage.
    pub success_rate: Decimal,
    /// Average processing time in seconds.
    pub average_processing_time_secs: Option<i64>,
    /// Volume processed.
    pub total_volume_processed: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
}

impl CardPaymentProcessor {
    /// Creates an inactive processor charging 2.9% + 30 cents.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        processor_type: ProcessorType,
        api_endpoint: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            processor_type,
            api_endpoint: api_endpoint.into(),
            api_key: String::new(),
            api_secret: String::new(),
            webhook_secret: None,
            supports_cards: true,
            supports_digital_wallets: false,
            supports_bank_transfers: false,
            supports_subscriptions: false,
            transaction_fee_percentage: Decimal::new(29, 1),
            fixed_fee_cents: 30,
            min_transaction_amount: Decimal::ONE,
            max_transaction_amount: None,
            status: ProcessorStatus::default(),
            is_default: false,
            priority: 100,
            success_rate: Decimal::ZERO,
            average_processing_time_secs: None,
            total_volume_processed: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            last_used: None,
        }
    }

    /// Whether the processor takes traffic.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ProcessorStatus::Active
    }

    /// Fee on `amount`: the percentage plus the fixed cents.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if the fee does not fit.
    pub fn fee_for(&self, amount: Decimal) -> DomainResult<Decimal> {
        let fixed = Decimal::from(self.fixed_fee_cents)
            .checked_div(HUNDRED)
            .ok_or(DomainError::DivisionByZero)?;
        percentage_of(amount, self.transaction_fee_percentage)?
            .checked_add(fixed)
            .ok_or(DomainError::Overflow)
    }

    /// Validates fees and limits.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_percentage("transaction_fee_percentage", self.transaction_fee_percentage)?;
        ensure_percentage("success_rate", self.success_rate)?;
        ensure_positive("min_transaction_amount", self.min_transaction_amount)?;
        if let Some(max) = self.max_transaction_amount {
            ensure_positive("max_transaction_amount", max)?;
        }
        Ok(())
    }
}

impl_record!(
    CardPaymentProcessor,
    table = "weedvader_card_processor",
    plural = "card processors",
    listed_by = created_at,
    updated = updated_at,
    validate = CardPaymentProcessor::validate,
    keys = |p| vec![key("name", &p.name)],
    exclusive = |_p| (ExclusiveFlag::GLOBAL_OWNER, is_default)
);

/// Bank used for fiat settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankProcessor {
    /// Primary key.
    pub id: Uuid,
    /// Bank name.
    pub bank_name: String,
    /// SWIFT/BIC code, unique.
    pub bank_code: String,
    /// Kind of bank.
    pub bank_type: BankType,
    /// ISO 3166-1 alpha-2 country.
    pub country: String,
    /// API endpoint.
    pub api_endpoint: Option<String>,
    /// Connection mode.
    pub connection_type: ConnectionType,
    /// Instant transfers.
    pub supports_instant_transfer: bool,
    /// Batch transfers.
    pub supports_batch_transfer: bool,
    /// International transfers.
    pub supports_international: bool,
    /// Daily limit.
    pub daily_limit: Option<Decimal>,
    /// Fee per transaction.
    pub per_transaction_fee: Decimal,
    /// Percentage fee.
    pub percentage_fee: Decimal,
    /// Domestic settlement hours.
    pub domestic_processing_hours: u32,
    /// International settlement hours.
    pub international_processing_hours: u32,
    /// Status.
    pub status: BankStatus,
    /// Primary bank; at most one.
    pub is_primary: bool,
    /// Transactions processed.
    pub total_transactions: u32,
    /// Volume processed.
    pub total_volume: Decimal,
    /// Success percentage.
    pub success_rate: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
}

impl BankProcessor {
    /// Creates an inactive, non-primary API bank.
    #[must_use]
    pub fn new(
        bank_name: impl Into<String>,
        bank_code: impl Into<String>,
        bank_type: BankType,
        country: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            bank_name: bank_name.into(),
            bank_code: bank_code.into(),
            bank_type,
            country: country.into(),
            api_endpoint: None,
            connection_type: ConnectionType::default(),
            supports_instant_transfer: false,
            supports_batch_transfer: true,
            supports_international: false,
            daily_limit: None,
            per_transaction_fee: Decimal::ZERO,
            percentage_fee: Decimal::ZERO,
            domestic_processing_hours: 24,
            international_processing_hours: 72,
            status: BankStatus::default(),
            is_primary: false,
            total_transactions: 0,
            total_volume: Decimal::ZERO,
            success_rate: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            last_used: None,
        }
    }

    /// Validates code, country and fees.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        if self.bank_code.trim().is_empty() || self.bank_code.len() > 20 {
            return Err(DomainError::invalid_field("bank_code", "must be 1 to 20 characters"));
        }
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::invalid_field(
                "country",
                "must be an ISO 3166-1 alpha-2 code",
            ));
        }
        if let Some(limit) = self.daily_limit {
            ensure_non_negative("daily_limit", limit)?;
        }
        ensure_non_negative("per_transaction_fee", self.per_transaction_fee)?;
        ensure_percentage("percentage_fee", self.percentage_fee)?;
        ensure_percentage("success_rate", self.success_rate)?;
        Ok(())
    }
}

impl_record!(
    BankProcessor,
    table = "weedvader_bank_processor",
    plural = "bank processors",
    listed_by = created_at,
    updated = updated_at,
    validate = BankProcessor::validate,
    keys = |b| vec![key("bank_code", &b.bank_code)],
    exclusive = |_b| (ExclusiveFlag::GLOBAL_OWNER, is_primary)
);

/// Fiat movement settled through a bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiatTransaction {
    /// Primary key.
    pub id: Uuid,
    /// Settling bank.
    pub bank_processor_id: Uuid,
    /// Kind of transaction.
    pub transaction_type: FiatTransactionType,
    /// Unique reference number.
    pub reference_number: String,
    /// Amount.
    pub amount: Decimal,
    /// ISO 4217 currency.
    pub currency: String,
    /// Debited account.
    pub from_account: Option<String>,
    /// Credited account.
    pub to_account: Option<String>,
    /// Debited account holder.
    pub from_account_name: Option<String>,
    /// Credited account holder.
    pub to_account_name: Option<String>,
    /// Bank fee.
    pub transaction_fee: Decimal,
    /// Conversion rate.
    pub exchange_rate: Option<Decimal>,
    /// Related marketplace order.
    pub marketplace_order_id: Option<Uuid>,
    /// Related payment.
    pub payment_transaction_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: FiatStatus,
    /// Bank's transaction id.
    pub external_transaction_id: Option<String>,
    /// Bank confirmation code.
    pub bank_confirmation_code: Option<String>,
    /// Description.
    pub description: String,
    /// Internal notes.
    pub internal_notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Processing time.
    pub processed_at: Option<DateTime<Utc>>,
}

impl FiatTransaction {
    /// Creates a pending transaction.
    #[must_use]
    pub fn new(
        bank_processor_id: Uuid,
        transaction_type: FiatTransactionType,
        reference_number: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            bank_processor_id,
            transaction_type,
            reference_number: reference_number.into(),
            amount,
            currency: currency.into(),
            from_account: None,
            to_account: None,
            from_account_name: None,
            to_account_name: None,
            transaction_fee: Decimal::ZERO,
            exchange_rate: None,
            marketplace_order_id: None,
            payment_transaction_id: None,
            status: FiatStatus::default(),
            external_transaction_id: None,
            bank_confirmation_code: None,
            description: String::new(),
            internal_notes: String::new(),
            created_at: now,
            updated_at: now,
            processed_at: None,
        }
    }
}

impl_record!(
    FiatTransaction,
    table = "weedvader_fiat_transaction",
    plural = "fiat transactions",
    listed_by = created_at,
    updated = updated_at,
    keys = |t| vec![key("reference_number", &t.reference_number)]
);

/// Lower-cases `title` and joins its alphanumeric runs with `-`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for word in title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }
    slug.chars().take(MAX_SLUG_LEN).collect()
}

fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SLUG_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::record::Record;

    #[test]
    fn slug_from_title() {
        assert_eq!(slugify("Blue Dream  (1/8 oz)"), "blue-dream-1-8-oz");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn listing_validation() {
        let mut listing = MarketplaceListing::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Glass Pipe",
            "accessories",
            Decimal::from(20),
        );
        assert_eq!(listing.slug, "glass-pipe");
        assert!(listing.validate().is_ok());
        listing.slug = "Glass Pipe".to_string();
        assert!(listing.validate().is_err());
    }

    #[test]
    fn order_totals_and_number() {
        let marketplace = Marketplace::new("WeedVader");
        let listing = MarketplaceListing::new(
            marketplace.id,
            Uuid::new_v4(),
            "Grinder",
            "accessories",
            Decimal::from(40),
        );
        let mut order =
            MarketplaceOrder::for_listing(&marketplace, &listing, Uuid::new_v4(), 2).unwrap();
        assert_eq!(order.total_amount_usd, Decimal::from(80));
        assert_eq!(order.marketplace_fee, Decimal::from(2));
        assert_eq!(order.seller_net_amount, Decimal::from(78));

        order.prepare(Utc::now());
        assert!(order.order_number.starts_with("MKT-"));
        let assigned = order.order_number.clone();
        order.prepare(Utc::now());
        assert_eq!(order.order_number, assigned);
    }

    #[test]
    fn card_fee() {
        let processor =
            CardPaymentProcessor::new("Stripe", ProcessorType::Stripe, "https://api.stripe.com");
        assert!(!processor.is_active());
        assert_eq!(
            processor.fee_for(Decimal::from(100)).unwrap(),
            Decimal::new(320, 2)
        );
    }

    #[test]
    fn processor_flags_are_global() {
        let mut bank = BankProcessor::new("Chase", "CHASUS33", BankType::Commercial, "US");
        bank.is_primary = true;
        assert_eq!(bank.exclusive_flag(), Some(ExclusiveFlag::global(true)));
        assert!(bank.validate().is_ok());
        bank.country = "usa".to_string();
        assert!(bank.validate().is_err());
    }
}
