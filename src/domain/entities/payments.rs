//! # Payment Records
//!
//! Supported payment methods, customers' saved methods, fiat/MTT payment
//! transactions, exchange rates, processor webhooks and refunds.
//!
//! A customer has at most one default [`CustomerPaymentMethod`].

use crate::domain::entities::record::{impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::{
    ensure_non_negative, ensure_percentage, ensure_positive, percentage_of,
};
use crate::domain::value_objects::choices::choice_enum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

choice_enum! {
    /// Payment rail.
    pub enum PaymentMethodType("method_type") {
        CreditCard = "CREDIT_CARD" => "Credit Card",
        DebitCard = "DEBIT_CARD" => "Debit Card",
        BankTransfer = "BANK_TRANSFER" => "Bank Transfer",
        Paypal = "PAYPAL" => "PayPal",
        Stripe = "STRIPE" => "Stripe",
        MttToken = "MTT_TOKEN" => "MTT Token",
        Crypto = "CRYPTO" => "Cryptocurrency",
    }
}

choice_enum! {
    /// Status of a saved payment method.
    pub enum SavedMethodStatus("status") = Active {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Expired = "EXPIRED" => "Expired",
        Invalid = "INVALID" => "Invalid",
    }
}

choice_enum! {
    /// Kind of payment transaction.
    pub enum PaymentTransactionType("transaction_type") {
        Purchase = "PURCHASE" => "Purchase MTT",
        Sale = "SALE" => "Sell MTT",
        Conversion = "CONVERSION" => "Fiat to MTT Conversion",
        Withdrawal = "WITHDRAWAL" => "Withdrawal",
        Deposit = "DEPOSIT" => "Deposit",
        Refund = "REFUND" => "Refund",
        Fee = "FEE" => "Fee Payment",
    }
}

choice_enum! {
    /// Lifecycle of a payment transaction.
    pub enum PaymentStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processing = "PROCESSING" => "Processing",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
        Refunded = "REFUNDED" => "Refunded",
        Expired = "EXPIRED" => "Expired",
    }
}

choice_enum! {
    /// Processor webhook event kind.
    pub enum WebhookType("webhook_type") {
        PaymentSuccess = "PAYMENT_SUCCESS" => "Payment Successful",
        PaymentFailed = "PAYMENT_FAILED" => "Payment Failed",
        RefundProcessed = "REFUND_PROCESSED" => "Refund Processed",
        Chargeback = "CHARGEBACK" => "Chargeback",
        Dispute = "DISPUTE" => "Dispute",
    }
}

choice_enum! {
    /// Handling status of a webhook event.
    pub enum WebhookStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processed = "PROCESSED" => "Processed",
        Failed = "FAILED" => "Failed",
        Ignored = "IGNORED" => "Ignored",
    }
}

choice_enum! {
    /// Why a payment was refunded.
    pub enum RefundReason("refund_reason") {
        CustomerRequest = "CUSTOMER_REQUEST" => "Customer Request",
        MerchantCancel = "MERCHANT_CANCEL" => "Merchant Cancellation",
        Fraud = "FRAUD" => "Fraud Detection",
        Chargeback = "CHARGEBACK" => "Chargeback",
        Error = "ERROR" => "Processing Error",
        Other = "OTHER" => "Other",
    }
}

choice_enum! {
    /// Lifecycle of a refund.
    pub enum RefundStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processing = "PROCESSING" => "Processing",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
    }
}

/// Payment method supported by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Primary key.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Rail.
    pub method_type: PaymentMethodType,
    /// Description.
    pub description: String,
    /// Offered to customers.
    pub is_active: bool,
    /// Fiat rail.
    pub is_fiat: bool,
    /// Percentage processing fee.
    pub processing_fee_percentage: Decimal,
    /// Flat fee.
    pub flat_fee: Decimal,
    /// Minimum amount.
    pub min_amount: Decimal,
    /// Maximum amount, unlimited when `None`.
    pub max_amount: Option<Decimal>,
    /// Settlement delay in hours.
    pub settlement_time_hours: u32,
    /// Customers must pass KYC.
    pub requires_kyc: bool,
    /// ISO 4217 codes accepted.
    pub supported_currencies: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl PaymentMethod {
    /// Creates an active fiat method without fees.
    #[must_use]
    pub fn new(name: impl Into<String>, method_type: PaymentMethodType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            method_type,
            description: String::new(),
            is_active: true,
            is_fiat: true,
            processing_fee_percentage: Decimal::ZERO,
            flat_fee: Decimal::ZERO,
            min_amount: Decimal::ONE,
            max_amount: None,
            settlement_time_hours: 24,
            requires_kyc: false,
            supported_currencies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `amount` lies within the method's limits.
    #[must_use]
    pub fn accepts(&self, amount: Decimal) -> bool {
        self.is_active && amount >= self.min_amount && self.max_amount.is_none_or(|max| amount <= max)
    }

    /// Processing fee on `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if the fee does not fit.
    pub fn fee_for(&self, amount: Decimal) -> DomainResult<Decimal> {
        percentage_of(amount, self.processing_fee_percentage)?
            .checked_add(self.flat_fee)
            .ok_or(DomainError::Overflow)
    }

    /// Validates fees and limits.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_percentage("processing_fee_percentage", self.processing_fee_percentage)?;
        ensure_non_negative("flat_fee", self.flat_fee)?;
        ensure_positive("min_amount", self.min_amount)?;
        if let Some(max) = self.max_amount
            && max < self.min_amount
        {
            return Err(DomainError::InvalidAmount(format!(
                "max_amount {max} is below min_amount {}",
                self.min_amount
            )));
        }
        Ok(())
    }
}

impl_record!(
    PaymentMethod,
    table = "payments_method",
    plural = "payment methods",
    listed_by = created_at,
    updated = updated_at,
    validate = PaymentMethod::validate,
    keys = |m| vec![key("name", &m.name)]
);

/// Payment method saved by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPaymentMethod {
    /// Primary key.
    pub id: Uuid,
    /// Customer profile.
    pub customer_id: Uuid,
    /// Platform payment method.
    pub payment_method_id: Uuid,
    /// Display nickname.
    pub nickname: String,
    /// Processor token, unique per customer.
    pub token: String,
    /// Last four digits.
    pub last_four: String,
    /// Card brand.
    pub card_brand: String,
    /// Expiry month.
    pub expiry_month: Option<u8>,
    /// Expiry year.
    pub expiry_year: Option<u16>,
    /// Status.
    pub status: SavedMethodStatus,
    /// Customer's default method; at most one per customer.
    pub is_default: bool,
    /// Verified with the processor.
    pub is_verified: bool,
    /// Times used.
    pub usage_count: u32,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl CustomerPaymentMethod {
    /// Creates an active, non-default saved method.
    #[must_use]
    pub fn new(customer_id: Uuid, payment_method_id: Uuid, token: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            payment_method_id,
            nickname: String::new(),
            token: token.into(),
            last_four: String::new(),
            card_brand: String::new(),
            expiry_month: None,
            expiry_year: None,
            status: SavedMethodStatus::default(),
            is_default: false,
            is_verified: false,
            usage_count: 0,
            last_used: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates expiry month and last four digits.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(month) = self.expiry_month
            && !(1..=12).contains(&month)
        {
            return Err(DomainError::invalid_field("expiry_month", "must be 1 to 12"));
        }
        if !self.last_four.is_empty()
            && (self.last_four.len() != 4 || !self.last_four.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(DomainError::invalid_field("last_four", "must be 4 digits"));
        }
        Ok(())
    }
}

impl_record!(
    CustomerPaymentMethod,
    table = "payments_customer_method",
    plural = "saved payment methods",
    listed_by = created_at,
    updated = updated_at,
    validate = CustomerPaymentMethod::validate,
    keys = |m| vec![key("customer_token", format!("{}/{}", m.customer_id, m.token))],
    exclusive = |m| (m.customer_id, is_default)
);

/// Fiat/MTT payment transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// Primary key.
    pub id: Uuid,
    /// Paying customer.
    pub customer_id: Uuid,
    /// Receiving merchant.
    pub merchant_id: Option<Uuid>,
    /// Saved method charged.
    pub payment_method_id: Uuid,
    /// Kind of transaction.
    pub transaction_type: PaymentTransactionType,
    /// External reference, unique.
    pub reference_id: String,
    /// Fiat amount.
    pub fiat_amount: Decimal,
    /// Fiat currency.
    pub fiat_currency: String,
    /// MTT amount.
    pub mtt_amount: Decimal,
    /// MTT per fiat unit.
    pub exchange_rate: Decimal,
    /// Platform fee.
    pub platform_fee: Decimal,
    /// Processing fee.
    pub processing_fee: Decimal,
    /// Sum of fees.
    pub total_fees: Decimal,
    /// Processor name.
    pub processor: String,
    /// Processor's transaction id.
    pub processor_transaction_id: Option<String>,
    /// Processor fee.
    pub processor_fee: Decimal,
    /// Raw processor response.
    pub processor_response: serde_json::Value,
    /// Settlement hash.
    pub blockchain_transaction_hash: Option<String>,
    /// Payer address.
    pub from_address: Option<String>,
    /// Payee address.
    pub to_address: Option<String>,
    /// Gas consumed.
    pub gas_used: Option<u64>,
    /// Gas price in wei.
    pub gas_price: Option<u64>,
    /// Lifecycle status.
    pub status: PaymentStatus,
    /// Failure detail.
    pub failure_reason: String,
    /// Processing retries.
    pub retry_count: u16,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Processing start.
    pub processed_at: Option<DateTime<Utc>>,
    /// Completion.
    pub completed_at: Option<DateTime<Utc>>,
    /// Expiry of a pending payment.
    pub expires_at: Option<DateTime<Utc>>,
    /// Notes.
    pub notes: String,
    /// Customer address.
    pub customer_ip: Option<IpAddr>,
}

impl PaymentTransaction {
    /// Creates a pending transaction; `mtt_amount = fiat_amount * exchange_rate`.
    #[must_use]
    pub fn new(
        customer_id: Uuid,
        payment_method_id: Uuid,
        transaction_type: PaymentTransactionType,
        reference_id: impl Into<String>,
        fiat_amount: Decimal,
        exchange_rate: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            merchant_id: None,
            payment_method_id,
            transaction_type,
            reference_id: reference_id.into(),
            fiat_amount,
            fiat_currency: "USD".to_string(),
            mtt_amount: fiat_amount.checked_mul(exchange_rate).unwrap_or(Decimal::ZERO),
            exchange_rate,
            platform_fee: Decimal::ZERO,
            processing_fee: Decimal::ZERO,
            total_fees: Decimal::ZERO,
            processor: "stripe".to_string(),
            processor_transaction_id: None,
            processor_fee: Decimal::ZERO,
            processor_response: serde_json::Value::Object(serde_json::Map::new()),
            blockchain_transaction_hash: None,
            from_address: None,
            to_address: None,
            gas_used: None,
            gas_price: None,
            status: PaymentStatus::default(),
            failure_reason: String::new(),
            retry_count: 0,
            created_at: now,
            updated_at: now,
            processed_at: None,
            completed_at: None,
            expires_at: None,
            notes: String::new(),
            customer_ip: None,
        }
    }
}

impl_record!(
    PaymentTransaction,
    table = "payments_transaction",
    plural = "payment transactions",
    listed_by = created_at,
    updated = updated_at,
    keys = |t| vec![key("reference_id", &t.reference_id)],
    prepare = |t, _now| {
        t.total_fees = t.platform_fee.saturating_add(t.processing_fee);
    }
);

/// MTT exchange rate quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Primary key.
    pub id: Uuid,
    /// Base currency.
    pub base_currency: String,
    /// Target currency.
    pub target_currency: String,
    /// Target units per base unit.
    pub rate: Decimal,
    /// Source of the rate.
    pub source: String,
    /// Bid.
    pub bid_price: Option<Decimal>,
    /// Ask.
    pub ask_price: Option<Decimal>,
    /// 24h volume.
    pub volume_24h: Option<Decimal>,
    /// Currently quoted.
    pub is_active: bool,
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity.
    pub valid_until: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates an active USD to MTT rate valid from now.
    #[must_use]
    pub fn new(rate: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            base_currency: "USD".to_string(),
            target_currency: "MTT".to_string(),
            rate,
            source: "internal".to_string(),
            bid_price: None,
            ask_price: None,
            volume_24h: None,
            is_active: true,
            valid_from: now,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the rate applies at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.valid_from <= now && self.valid_until.is_none_or(|end| now < end)
    }

    /// Bid/ask spread, when both sides are quoted.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.ask_price? - self.bid_price?)
    }

    /// Validates the rate.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for a non-positive rate.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("rate", self.rate).map(|_| ())
    }
}

impl_record!(
    ExchangeRate,
    table = "payments_exchange_rate",
    plural = "exchange rates",
    listed_by = created_at,
    updated = updated_at,
    validate = ExchangeRate::validate,
    keys = |r| vec![key(
        "pair_valid_from",
        format!(
            "{}/{}/{}",
            r.base_currency,
            r.target_currency,
            r.valid_from.timestamp_micros()
        )
    )]
);

/// Payment processor webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentWebhook {
    /// Primary key.
    pub id: Uuid,
    /// Processor name.
    pub processor: String,
    /// Event kind.
    pub webhook_type: WebhookType,
    /// Processor's event id, unique per processor.
    pub webhook_id: String,
    /// Full payload.
    pub event_data: serde_json::Value,
    /// Signature header.
    pub signature: Option<String>,
    /// Related payment.
    pub payment_transaction_id: Option<Uuid>,
    /// Handling status.
    pub status: WebhookStatus,
    /// Handling attempts.
    pub processing_attempts: u16,
    /// Last attempt.
    pub last_attempt: Option<DateTime<Utc>>,
    /// Last error.
    pub error_message: String,
    /// Receipt time.
    pub received_at: DateTime<Utc>,
    /// Handling time.
    pub processed_at: Option<DateTime<Utc>>,
}

impl PaymentWebhook {
    /// Creates a pending event.
    #[must_use]
    pub fn new(
        processor: impl Into<String>,
        webhook_type: WebhookType,
        webhook_id: impl Into<String>,
        event_data: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            processor: processor.into(),
            webhook_type,
            webhook_id: webhook_id.into(),
            event_data,
            signature: None,
            payment_transaction_id: None,
            status: WebhookStatus::default(),
            processing_attempts: 0,
            last_attempt: None,
            error_message: String::new(),
            received_at: Utc::now(),
            processed_at: None,
        }
    }
}

impl_record!(
    PaymentWebhook,
    table = "payments_webhook",
    plural = "webhooks",
    listed_by = received_at,
    keys = |w| vec![key("processor_webhook", format!("{}/{}", w.processor, w.webhook_id))]
);

/// Refund of a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRefund {
    /// Primary key.
    pub id: Uuid,
    /// Refunded payment.
    pub original_transaction_id: Uuid,
    /// Refund amount.
    pub refund_amount: Decimal,
    /// Refund currency.
    pub refund_currency: String,
    /// MTT returned.
    pub mtt_returned: Decimal,
    /// Processor refund id.
    pub processor_refund_id: Option<String>,
    /// Reason.
    pub refund_reason: RefundReason,
    /// Reason detail.
    pub reason_details: String,
    /// Lifecycle status.
    pub status: RefundStatus,
    /// Initiating user.
    pub initiated_by_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Completion.
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentRefund {
    /// Creates a pending refund.
    #[must_use]
    pub fn new(
        original_transaction_id: Uuid,
        refund_amount: Decimal,
        refund_currency: impl Into<String>,
        refund_reason: RefundReason,
        initiated_by_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            original_transaction_id,
            refund_amount,
            refund_currency: refund_currency.into(),
            mtt_returned: Decimal::ZERO,
            processor_refund_id: None,
            refund_reason,
            reason_details: String::new(),
            status: RefundStatus::default(),
            initiated_by_id,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}

impl_record!(
    PaymentRefund,
    table = "payments_refund",
    plural = "refunds",
    listed_by = created_at,
    updated = updated_at
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::record::Record;
    use chrono::Duration;

    #[test]
    fn method_limits() {
        let mut method = PaymentMethod::new("Visa", PaymentMethodType::CreditCard);
        method.max_amount = Some(Decimal::from(500));
        assert!(method.accepts(Decimal::from(500)));
        assert!(!method.accepts(Decimal::from(501)));
        assert!(!method.accepts(Decimal::new(50, 2)));
    }

    #[test]
    fn method_fee() {
        let mut method = PaymentMethod::new("Visa", PaymentMethodType::CreditCard);
        method.processing_fee_percentage = Decimal::new(29, 1);
        method.flat_fee = Decimal::new(30, 2);
        assert_eq!(
            method.fee_for(Decimal::from(100)).unwrap(),
            Decimal::new(320, 2)
        );
    }

    #[test]
    fn saved_method_flag_scoped_to_customer() {
        let customer = Uuid::new_v4();
        let mut saved = CustomerPaymentMethod::new(customer, Uuid::new_v4(), "tok_1");
        saved.is_default = true;
        let flag = saved.exclusive_flag().unwrap();
        assert_eq!(flag.owner, customer);
        assert!(flag.set);
    }

    #[test]
    fn saved_method_rejects_bad_month() {
        let mut saved = CustomerPaymentMethod::new(Uuid::new_v4(), Uuid::new_v4(), "tok_1");
        saved.expiry_month = Some(13);
        assert!(saved.validate().is_err());
    }

    #[test]
    fn payment_total_fees_derived() {
        let mut tx = PaymentTransaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PaymentTransactionType::Purchase,
            "PAY-1",
            Decimal::from(100),
            Decimal::from(10),
        );
        assert_eq!(tx.mtt_amount, Decimal::from(1000));
        tx.platform_fee = Decimal::ONE;
        tx.processing_fee = Decimal::new(320, 2);
        tx.prepare(Utc::now());
        assert_eq!(tx.total_fees, Decimal::new(420, 2));
    }

    #[test]
    fn exchange_rate_validity_window() {
        let mut rate = ExchangeRate::new(Decimal::from(10));
        let now = rate.valid_from;
        rate.valid_until = Some(now + Duration::hours(1));
        assert!(rate.is_valid_at(now));
        assert!(!rate.is_valid_at(now + Duration::hours(2)));
        assert_eq!(rate.spread(), None);
        rate.bid_price = Some(Decimal::new(99, 1));
        rate.ask_price = Some(Decimal::new(101, 1));
        assert_eq!(rate.spread(), Some(Decimal::new(2, 1)));
    }
}
