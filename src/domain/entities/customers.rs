//! # Customer Records
//!
//! Customer profiles, KYC documents, activity trail, support tickets and
//! notifications.
//!
//! Support tickets receive a `MTT-` + 8 digit number on first save when
//! none was assigned.

use crate::domain::entities::record::{impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::ensure_non_negative;
use crate::domain::value_objects::choices::choice_enum;
use crate::domain::value_objects::reference;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

choice_enum! {
    /// Depth of customer verification.
    pub enum CustomerVerificationLevel("verification_level") = None {
        None = "NONE" => "No Verification",
        Email = "EMAIL" => "Email Verified",
        Phone = "PHONE" => "Phone Verified",
        Identity = "IDENTITY" => "Identity Verified",
        Full = "FULL" => "Full KYC",
    }
}

choice_enum! {
    /// Account status of a customer.
    pub enum CustomerStatus("status") = Active {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Suspended = "SUSPENDED" => "Suspended",
        Banned = "BANNED" => "Banned",
    }
}

choice_enum! {
    /// Identity document kind.
    pub enum DocumentType("document_type") {
        Passport = "PASSPORT" => "Passport",
        DriversLicense = "DRIVERS_LICENSE" => "Driver's License",
        NationalId = "NATIONAL_ID" => "National ID",
        UtilityBill = "UTILITY_BILL" => "Utility Bill",
        BankStatement = "BANK_STATEMENT" => "Bank Statement",
    }
}

choice_enum! {
    /// Review status of a KYC document.
    pub enum KycStatus("status") = Pending {
        Pending = "PENDING" => "Pending Review",
        UnderReview = "UNDER_REVIEW" => "Under Review",
        Approved = "APPROVED" => "Approved",
        Rejected = "REJECTED" => "Rejected",
        Expired = "EXPIRED" => "Expired",
    }
}

choice_enum! {
    /// Kind of customer activity.
    pub enum ActivityType("activity_type") {
        Login = "LOGIN" => "Login",
        Logout = "LOGOUT" => "Logout",
        Purchase = "PURCHASE" => "Purchase",
        Payment = "PAYMENT" => "Payment",
        Transfer = "TRANSFER" => "Transfer",
        WalletCreate = "WALLET_CREATE" => "Wallet Created",
        KycSubmit = "KYC_SUBMIT" => "KYC Submitted",
        ProfileUpdate = "PROFILE_UPDATE" => "Profile Updated",
        PasswordChange = "PASSWORD_CHANGE" => "Password Changed",
        ApiAccess = "API_ACCESS" => "API Access",
    }
}

choice_enum! {
    /// Support ticket priority.
    pub enum TicketPriority("priority") = Medium {
        Low = "LOW" => "Low",
        Medium = "MEDIUM" => "Medium",
        High = "HIGH" => "High",
        Urgent = "URGENT" => "Urgent",
    }
}

choice_enum! {
    /// Support ticket status.
    pub enum TicketStatus("status") = Open {
        Open = "OPEN" => "Open",
        InProgress = "IN_PROGRESS" => "In Progress",
        WaitingCustomer = "WAITING_CUSTOMER" => "Waiting for Customer",
        Resolved = "RESOLVED" => "Resolved",
        Closed = "CLOSED" => "Closed",
    }
}

choice_enum! {
    /// Support ticket topic.
    pub enum TicketCategory("category") {
        Technical = "TECHNICAL" => "Technical Issue",
        Payment = "PAYMENT" => "Payment Issue",
        Account = "ACCOUNT" => "Account Issue",
        Kyc = "KYC" => "KYC/Verification",
        Security = "SECURITY" => "Security Concern",
        General = "GENERAL" => "General Inquiry",
        Complaint = "COMPLAINT" => "Complaint",
    }
}

choice_enum! {
    /// Notification topic.
    pub enum NotificationType("notification_type") {
        Transaction = "TRANSACTION" => "Transaction Alert",
        Security = "SECURITY" => "Security Alert",
        System = "SYSTEM" => "System Notification",
        Marketing = "MARKETING" => "Marketing",
        Support = "SUPPORT" => "Support Update",
        Kyc = "KYC" => "KYC Update",
    }
}

choice_enum! {
    /// Notification delivery channel.
    pub enum NotificationChannel("channel") {
        Email = "EMAIL" => "Email",
        Sms = "SMS" => "SMS",
        Push = "PUSH" => "Push Notification",
        InApp = "IN_APP" => "In-App Notification",
    }
}

choice_enum! {
    /// Notification delivery status.
    pub enum NotificationStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Sent = "SENT" => "Sent",
        Delivered = "DELIVERED" => "Delivered",
        Read = "READ" => "Read",
        Failed = "FAILED" => "Failed",
    }
}

/// Extended customer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Primary key.
    pub id: Uuid,
    /// Owning user, one profile per user.
    pub user_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Avatar image path.
    pub avatar: Option<String>,
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
    /// ISO country code.
    pub country: String,
    /// Verification depth.
    pub verification_level: CustomerVerificationLevel,
    /// Email confirmed.
    pub email_verified: bool,
    /// Phone confirmed.
    pub phone_verified: bool,
    /// Identity confirmed.
    pub identity_verified: bool,
    /// Account status.
    pub status: CustomerStatus,
    /// Premium tier.
    pub is_premium: bool,
    /// ISO 4217 currency code.
    pub preferred_currency: String,
    /// Email notifications opt-in.
    pub email_notifications: bool,
    /// SMS notifications opt-in.
    pub sms_notifications: bool,
    /// Marketing opt-in.
    pub marketing_emails: bool,
    /// Two-factor authentication enabled.
    pub two_factor_enabled: bool,
    /// Last login address.
    pub last_login_ip: Option<IpAddr>,
    /// Consecutive failed logins.
    pub failed_login_attempts: u32,
    /// Lockout end.
    pub account_locked_until: Option<DateTime<Utc>>,
    /// Referral code, unique when present.
    pub referral_code: Option<String>,
    /// Referring customer.
    pub referred_by_id: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last activity.
    pub last_activity: Option<DateTime<Utc>>,
}

impl CustomerProfile {
    /// Creates an active, unverified profile.
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: None,
            phone_number: None,
            avatar: None,
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: String::new(),
            verification_level: CustomerVerificationLevel::default(),
            email_verified: false,
            phone_verified: false,
            identity_verified: false,
            status: CustomerStatus::default(),
            is_premium: false,
            preferred_currency: "USD".to_string(),
            email_notifications: true,
            sms_notifications: false,
            marketing_emails: true,
            two_factor_enabled: false,
            last_login_ip: None,
            failed_login_attempts: 0,
            account_locked_until: None,
            referral_code: None,
            referred_by_id: None,
            created_at: now,
            updated_at: now,
            last_activity: None,
        }
    }

    /// Whether the account is locked out at `now`.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.account_locked_until.is_some_and(|until| now < until)
    }

    /// Full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl_record!(
    CustomerProfile,
    table = "customers_profile",
    plural = "customer profiles",
    listed_by = created_at,
    updated = updated_at,
    keys = |p| {
        let mut keys = vec![key("user", p.user_id)];
        keys.extend(p.referral_code.iter().map(|c| key("referral_code", c)));
        keys
    }
);

/// KYC document submitted by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerKyc {
    /// Primary key.
    pub id: Uuid,
    /// Customer.
    pub customer_id: Uuid,
    /// Document kind, unique per customer.
    pub document_type: DocumentType,
    /// Document number.
    pub document_number: Option<String>,
    /// Uploaded file path.
    pub document_file: Option<String>,
    /// Front image path.
    pub document_front: Option<String>,
    /// Back image path.
    pub document_back: Option<String>,
    /// Selfie image path.
    pub selfie_photo: Option<String>,
    /// Review status.
    pub status: KycStatus,
    /// Reviewing staff user.
    pub reviewed_by_id: Option<Uuid>,
    /// Reviewer notes.
    pub review_notes: String,
    /// Rejection reason.
    pub rejection_reason: String,
    /// Issue date.
    pub issued_date: Option<NaiveDate>,
    /// Expiry date.
    pub expiry_date: Option<NaiveDate>,
    /// Issuing country.
    pub issuing_country: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Review time.
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl CustomerKyc {
    /// Creates a pending submission.
    #[must_use]
    pub fn new(customer_id: Uuid, document_type: DocumentType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            document_type,
            document_number: None,
            document_file: None,
            document_front: None,
            document_back: None,
            selfie_photo: None,
            status: KycStatus::default(),
            reviewed_by_id: None,
            review_notes: String::new(),
            rejection_reason: String::new(),
            issued_date: None,
            expiry_date: None,
            issuing_country: None,
            created_at: now,
            updated_at: now,
            reviewed_at: None,
        }
    }

    /// Whether the document has expired on `today`.
    #[must_use]
    pub fn is_document_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < today)
    }

    /// Validates the date range.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the expiry precedes the issue date.
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(issued), Some(expiry)) = (self.issued_date, self.expiry_date)
            && expiry < issued
        {
            return Err(DomainError::invalid_field(
                "expiry_date",
                "must not precede issued_date",
            ));
        }
        Ok(())
    }
}

impl_record!(
    CustomerKyc,
    table = "customers_kyc",
    plural = "KYC documents",
    listed_by = created_at,
    updated = updated_at,
    validate = CustomerKyc::validate,
    keys = |k| vec![key(
        "customer_document",
        format!("{}/{}", k.customer_id, k.document_type)
    )]
);

/// Customer activity trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerActivity {
    /// Primary key.
    pub id: Uuid,
    /// Customer.
    pub customer_id: Uuid,
    /// Kind of activity.
    pub activity_type: ActivityType,
    /// Description.
    pub description: String,
    /// Client address.
    pub ip_address: Option<IpAddr>,
    /// Client user agent.
    pub user_agent: String,
    /// Device details.
    pub device_info: serde_json::Value,
    /// Geolocation details.
    pub location: serde_json::Value,
    /// Amount involved.
    pub amount: Option<Decimal>,
    /// Currency of `amount`.
    pub currency: Option<String>,
    /// Related transaction.
    pub transaction_id: Option<Uuid>,
    /// Flagged by risk checks.
    pub is_suspicious: bool,
    /// Risk score, 0 to 100.
    pub risk_score: u8,
    /// Time of the activity.
    pub created_at: DateTime<Utc>,
}

impl CustomerActivity {
    /// Creates an unflagged activity entry.
    #[must_use]
    pub fn new(customer_id: Uuid, activity_type: ActivityType) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            activity_type,
            description: String::new(),
            ip_address: None,
            user_agent: String::new(),
            device_info: serde_json::Value::Object(serde_json::Map::new()),
            location: serde_json::Value::Object(serde_json::Map::new()),
            amount: None,
            currency: None,
            transaction_id: None,
            is_suspicious: false,
            risk_score: 0,
            created_at: Utc::now(),
        }
    }

    /// Validates amount and risk score.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative amount or a score above 100.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(amount) = self.amount {
            ensure_non_negative("amount", amount)?;
        }
        if self.risk_score > 100 {
            return Err(DomainError::invalid_field("risk_score", "must be 0 to 100"));
        }
        Ok(())
    }
}

impl_record!(
    CustomerActivity,
    table = "customers_activity",
    plural = "activities",
    listed_by = created_at,
    validate = CustomerActivity::validate
);

/// Customer support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSupport {
    /// Primary key.
    pub id: Uuid,
    /// Ticket number, assigned on first save when empty.
    pub ticket_number: String,
    /// Customer.
    pub customer_id: Uuid,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub description: String,
    /// Topic.
    pub category: TicketCategory,
    /// Priority.
    pub priority: TicketPriority,
    /// Status.
    pub status: TicketStatus,
    /// Assigned agent.
    pub assigned_to_id: Option<Uuid>,
    /// Resolution text.
    pub resolution: String,
    /// Time to resolution, in seconds.
    pub resolution_time_secs: Option<i64>,
    /// Customer rating, 1 to 5.
    pub customer_rating: Option<u8>,
    /// Customer feedback.
    pub customer_feedback: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Resolution time.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Closing time.
    pub closed_at: Option<DateTime<Utc>>,
}

impl CustomerSupport {
    /// Creates an open, medium-priority ticket without a number.
    #[must_use]
    pub fn new(
        customer_id: Uuid,
        subject: impl Into<String>,
        description: impl Into<String>,
        category: TicketCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            ticket_number: String::new(),
            customer_id,
            subject: subject.into(),
            description: description.into(),
            category,
            priority: TicketPriority::default(),
            status: TicketStatus::default(),
            assigned_to_id: None,
            resolution: String::new(),
            resolution_time_secs: None,
            customer_rating: None,
            customer_feedback: String::new(),
            created_at: now,
            updated_at: now,
            resolved_at: None,
            closed_at: None,
        }
    }

    /// Marks the ticket resolved at `now`, recording the resolution time.
    pub fn resolve(&mut self, resolution: impl Into<String>, now: DateTime<Utc>) {
        self.status = TicketStatus::Resolved;
        self.resolution = resolution.into();
        self.resolved_at = Some(now);
        self.resolution_time_secs = Some((now - self.created_at).num_seconds());
    }

    /// Validates the rating.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a rating outside 1 to 5.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(rating) = self.customer_rating
            && !(1..=5).contains(&rating)
        {
            return Err(DomainError::invalid_field("customer_rating", "must be 1 to 5"));
        }
        Ok(())
    }
}

impl_record!(
    CustomerSupport,
    table = "customers_support",
    plural = "support tickets",
    listed_by = created_at,
    updated = updated_at,
    validate = CustomerSupport::validate,
    keys = |t| vec![key("ticket_number", &t.ticket_number)],
    prepare = |t, _now| {
        if t.ticket_number.is_empty() {
            t.ticket_number = reference::ticket_number();
        }
    }
);

/// Notification sent to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerNotification {
    /// Primary key.
    pub id: Uuid,
    /// Customer.
    pub customer_id: Uuid,
    /// Topic.
    pub notification_type: NotificationType,
    /// Title.
    pub title: String,
    /// Body.
    pub message: String,
    /// Delivery channel.
    pub channel: NotificationChannel,
    /// Delivery status.
    pub status: NotificationStatus,
    /// Send time.
    pub sent_at: Option<DateTime<Utc>>,
    /// Delivery time.
    pub delivered_at: Option<DateTime<Utc>>,
    /// Read time.
    pub read_at: Option<DateTime<Utc>>,
    /// Urgent flag.
    pub is_urgent: bool,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Call-to-action link.
    pub action_url: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl CustomerNotification {
    /// Creates a pending notification.
    #[must_use]
    pub fn new(
        customer_id: Uuid,
        notification_type: NotificationType,
        channel: NotificationChannel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            notification_type,
            title: title.into(),
            message: message.into(),
            channel,
            status: NotificationStatus::default(),
            sent_at: None,
            delivered_at: None,
            read_at: None,
            is_urgent: false,
            expires_at: None,
            action_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the notification read at `now`.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        self.status = NotificationStatus::Read;
        self.read_at = Some(now);
    }
}

impl_record!(
    CustomerNotification,
    table = "customers_notification",
    plural = "notifications",
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
    fn ticket_number_assigned_once() {
        let mut ticket = CustomerSupport::new(
            Uuid::new_v4(),
            "Card declined",
            "My card was declined twice",
            TicketCategory::Payment,
        );
        assert!(ticket.ticket_number.is_empty());

        ticket.prepare(Utc::now());
        let first = ticket.ticket_number.clone();
        assert!(first.starts_with("MTT-"));
        assert_eq!(first.len(), 12);

        ticket.prepare(Utc::now());
        assert_eq!(ticket.ticket_number, first);
    }

    #[test]
    fn explicit_ticket_number_kept() {
        let mut ticket =
            CustomerSupport::new(Uuid::new_v4(), "s", "d", TicketCategory::General);
        ticket.ticket_number = "MTT-00000001".to_string();
        ticket.prepare(Utc::now());
        assert_eq!(ticket.ticket_number, "MTT-00000001");
    }

    #[test]
    fn resolve_records_duration() {
        let mut ticket =
            CustomerSupport::new(Uuid::new_v4(), "s", "d", TicketCategory::Account);
        let later = ticket.created_at + Duration::minutes(90);
        ticket.resolve("Reset password", later);
        assert_eq!(ticket.status, TicketStatus::Resolved);
        assert_eq!(ticket.resolution_time_secs, Some(5400));
    }

    #[test]
    fn rating_bounds() {
        let mut ticket =
            CustomerSupport::new(Uuid::new_v4(), "s", "d", TicketCategory::Complaint);
        ticket.customer_rating = Some(6);
        assert!(ticket.validate().is_err());
        ticket.customer_rating = Some(5);
        assert!(ticket.validate().is_ok());
    }

    #[test]
    fn profile_lockout() {
        let now = Utc::now();
        let mut profile = CustomerProfile::new(Uuid::new_v4());
        assert!(!profile.is_locked(now));
        profile.account_locked_until = Some(now + Duration::minutes(15));
        assert!(profile.is_locked(now));
        assert!(!profile.is_locked(now + Duration::minutes(16)));
    }

    #[test]
    fn kyc_date_order() {
        let mut kyc = CustomerKyc::new(Uuid::new_v4(), DocumentType::Passport);
        kyc.issued_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        kyc.expiry_date = NaiveDate::from_ymd_opt(2023, 1, 1);
        assert!(kyc.validate().is_err());
        assert!(kyc.is_document_expired(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }
}
