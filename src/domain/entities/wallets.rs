//! # Wallet Records
//!
//! Wallet types, user wallets with their receiving addresses, on-chain
//! transaction history, backups and delegated permissions.
//!
//! A user has at most one primary [`Wallet`]: saving a wallet with
//! `is_primary` set clears the flag on the user's other wallets.

use crate::domain::entities::record::{impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::ensure_non_negative;
use crate::domain::value_objects::chain::{validate_address, validate_tx_hash};
use crate::domain::value_objects::choices::choice_enum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

choice_enum! {
    /// Custody model of a wallet type.
    pub enum WalletCategory("category") {
        Custodial = "CUSTODIAL" => "Custodial",
        NonCustodial = "NON_CUSTODIAL" => "Non-Custodial",
        Hybrid = "HYBRID" => "Hybrid",
        SmartContract = "SMART_CONTRACT" => "Smart Contract",
    }
}

choice_enum! {
    /// Operational status of a wallet.
    pub enum WalletStatus("status") = Active {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Suspended = "SUSPENDED" => "Suspended",
        Locked = "LOCKED" => "Locked",
        Closed = "CLOSED" => "Closed",
    }
}

choice_enum! {
    /// Kind of wallet transaction.
    pub enum WalletTransactionType("transaction_type") {
        Send = "SEND" => "Send",
        Receive = "RECEIVE" => "Receive",
        Internal = "INTERNAL" => "Internal Transfer",
        Contract = "CONTRACT" => "Contract Interaction",
        Fee = "FEE" => "Fee Payment",
    }
}

choice_enum! {
    /// Confirmation status of a wallet transaction.
    pub enum WalletTransactionStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Confirmed = "CONFIRMED" => "Confirmed",
        Failed = "FAILED" => "Failed",
        Dropped = "DROPPED" => "Dropped",
    }
}

choice_enum! {
    /// Backup medium.
    pub enum BackupType("backup_type") {
        SeedPhrase = "SEED_PHRASE" => "Seed Phrase",
        PrivateKey = "PRIVATE_KEY" => "Private Key",
        Keystore = "KEYSTORE" => "Keystore File",
        Hardware = "HARDWARE" => "Hardware Wallet",
    }
}

choice_enum! {
    /// Delegated access level on a wallet.
    pub enum PermissionType("permission_type") {
        Read = "READ" => "Read Only",
        Send = "SEND" => "Send Transactions",
        Manage = "MANAGE" => "Full Management",
        Admin = "ADMIN" => "Administrative Access",
    }
}

/// Wallet type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletType {
    /// Primary key.
    pub id: Uuid,
    /// Unique type name.
    pub name: String,
    /// Custody model.
    pub category: WalletCategory,
    /// Free-form description.
    pub description: String,
    /// Whether new wallets may use this type.
    pub is_active: bool,
    /// Holds MTT.
    pub supports_mtt: bool,
    /// Owners must pass KYC.
    pub requires_kyc: bool,
    /// Minimum balance.
    pub min_balance: Decimal,
    /// Maximum balance, unlimited when `None`.
    pub max_balance: Option<Decimal>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WalletType {
    /// Creates an active MTT-capable type.
    #[must_use]
    pub fn new(name: impl Into<String>, category: WalletCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            description: String::new(),
            is_active: true,
            supports_mtt: true,
            requires_kyc: false,
            min_balance: Decimal::ZERO,
            max_balance: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates name and balance bounds.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or over-long name, negative
    /// bounds, or `max_balance < min_balance`.
    pub fn validate(&self) -> DomainResult<()> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(DomainError::invalid_field(
                "name",
                "must be 1 to 100 characters",
            ));
        }
        ensure_non_negative("min_balance", self.min_balance)?;
        if let Some(max) = self.max_balance {
            ensure_non_negative("max_balance", max)?;
            if max < self.min_balance {
                return Err(DomainError::InvalidAmount(format!(
                    "max_balance {max} is below min_balance {}",
                    self.min_balance
                )));
            }
        }
        Ok(())
    }
}

impl_record!(
    WalletType,
    table = "wallets_type",
    plural = "wallet types",
    listed_by = created_at,
    updated = updated_at,
    validate = WalletType::validate,
    keys = |t| vec![key("name", t.name.trim())]
);

/// A user wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Primary key.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Wallet type.
    pub wallet_type_id: Uuid,
    /// Name, unique per owner.
    pub name: String,
    /// Address, unique.
    pub address: String,
    /// Encrypted key material for custodial wallets.
    pub private_key_encrypted: Option<String>,
    /// Public key.
    pub public_key: Option<String>,
    /// Operational status.
    pub status: WalletStatus,
    /// Owner's primary wallet; at most one per owner.
    pub is_primary: bool,
    /// Receives merchant payments.
    pub is_merchant: bool,
    /// Backs a merchant gateway.
    pub is_gateway: bool,
    /// Encrypted recovery phrase.
    pub backup_phrase_encrypted: Option<String>,
    /// Last on-chain activity.
    pub last_activity: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Creates an active, non-primary wallet.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        wallet_type_id: Uuid,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            wallet_type_id,
            name: name.into(),
            address: address.into(),
            private_key_encrypted: None,
            public_key: None,
            status: WalletStatus::default(),
            is_primary: false,
            is_merchant: false,
            is_gateway: false,
            backup_phrase_encrypted: None,
            last_activity: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates name and address.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or malformed address.
    pub fn validate(&self) -> DomainResult<()> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(DomainError::invalid_field(
                "name",
                "must be 1 to 100 characters",
            ));
        }
        validate_address(&self.address)
    }
}

impl_record!(
    Wallet,
    table = "wallets_wallet",
    plural = "wallets",
    listed_by = created_at,
    updated = updated_at,
    validate = Wallet::validate,
    keys = |w| vec![
        key("address", w.address.to_lowercase()),
        key("user_name", format!("{}/{}", w.user_id, w.name.trim())),
    ],
    exclusive = |w| (w.user_id, is_primary)
);

/// Additional receiving address of a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAddress {
    /// Primary key.
    pub id: Uuid,
    /// Parent wallet.
    pub wallet_id: Uuid,
    /// Address, unique.
    pub address: String,
    /// Display label.
    pub label: String,
    /// Accepting funds.
    pub is_active: bool,
    /// HD change address.
    pub is_change_address: bool,
    /// HD derivation path.
    pub derivation_path: Option<String>,
    /// HD index.
    pub address_index: Option<u32>,
    /// Number of times used.
    pub used_count: u32,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl WalletAddress {
    /// Creates an active receiving address.
    #[must_use]
    pub fn new(wallet_id: Uuid, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            address: address.into(),
            label: String::new(),
            is_active: true,
            is_change_address: false,
            derivation_path: None,
            address_index: None,
            used_count: 0,
            last_used: None,
            created_at: Utc::now(),
        }
    }

    /// Validates address and amount columns.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        validate_address(&self.address)
    }
}

impl_record!(
    WalletAddress,
    table = "wallets_address",
    plural = "wallet addresses",
    listed_by = created_at,
    validate = WalletAddress::validate,
    keys = |a| vec![key("address", a.address.to_lowercase())]
);

/// On-chain transaction touching a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Primary key.
    pub id: Uuid,
    /// Wallet.
    pub wallet_id: Uuid,
    /// Transaction hash, unique.
    pub transaction_hash: String,
    /// Sender.
    pub from_address: String,
    /// Recipient.
    pub to_address: String,
    /// Amount in MTT.
    pub amount: Decimal,
    /// Fee in MTT.
    pub fee: Decimal,
    /// Gas limit.
    pub gas_limit: Option<u64>,
    /// Gas consumed.
    pub gas_used: Option<u64>,
    /// Gas price in wei.
    pub gas_price: Option<u64>,
    /// Sender nonce.
    pub nonce: Option<u64>,
    /// Block number.
    pub block_number: Option<u64>,
    /// Block hash.
    pub block_hash: Option<String>,
    /// Kind of transaction.
    pub transaction_type: WalletTransactionType,
    /// Confirmation status.
    pub status: WalletTransactionStatus,
    /// Number of confirmations.
    pub confirmations: u32,
    /// Signed raw transaction.
    pub raw_transaction: Option<String>,
    /// Failure detail.
    pub error_message: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Confirmation time.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl WalletTransaction {
    /// Creates a pending transaction.
    #[must_use]
    pub fn new(
        wallet_id: Uuid,
        transaction_hash: impl Into<String>,
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        amount: Decimal,
        transaction_type: WalletTransactionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            transaction_hash: transaction_hash.into(),
            from_address: from_address.into(),
            to_address: to_address.into(),
            amount,
            fee: Decimal::ZERO,
            gas_limit: None,
            gas_used: None,
            gas_price: None,
            nonce: None,
            block_number: None,
            block_hash: None,
            transaction_type,
            status: WalletTransactionStatus::default(),
            confirmations: 0,
            raw_transaction: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
        }
    }

    /// Validates address and amount columns.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        validate_tx_hash(&self.transaction_hash)?;
        validate_address(&self.from_address)?;
        validate_address(&self.to_address)?;
        ensure_non_negative("amount", self.amount)?;
        ensure_non_negative("fee", self.fee)?;
        Ok(())
    }
}

impl_record!(
    WalletTransaction,
    table = "wallets_transaction",
    plural = "wallet transactions",
    listed_by = created_at,
    updated = updated_at,
    validate = WalletTransaction::validate,
    keys = |t| vec![key("transaction_hash", t.transaction_hash.to_lowercase())]
);

/// Encrypted wallet backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBackup {
    /// Primary key.
    pub id: Uuid,
    /// Wallet backed up.
    pub wallet_id: Uuid,
    /// Backup medium, unique per wallet.
    pub backup_type: BackupType,
    /// Encrypted payload.
    pub encrypted_data: String,
    /// SHA-256 checksum of the payload.
    pub checksum: String,
    /// Whether a restore test passed.
    pub is_verified: bool,
    /// Last restore test.
    pub last_verified: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WalletBackup {
    /// Creates an unverified backup.
    #[must_use]
    pub fn new(
        wallet_id: Uuid,
        backup_type: BackupType,
        encrypted_data: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            backup_type,
            encrypted_data: encrypted_data.into(),
            checksum: checksum.into(),
            is_verified: false,
            last_verified: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl_record!(
    WalletBackup,
    table = "wallets_backup",
    plural = "wallet backups",
    listed_by = created_at,
    updated = updated_at,
    keys = |b| vec![key("wallet_type", format!("{}/{}", b.wallet_id, b.backup_type))]
);

/// Access granted to another user on a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletPermission {
    /// Primary key.
    pub id: Uuid,
    /// Wallet.
    pub wallet_id: Uuid,
    /// Grantee.
    pub user_id: Uuid,
    /// Access level.
    pub permission_type: PermissionType,
    /// Grantor.
    pub granted_by_id: Uuid,
    /// Not revoked.
    pub is_active: bool,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WalletPermission {
    /// Creates an active, non-expiring permission.
    #[must_use]
    pub fn new(
        wallet_id: Uuid,
        user_id: Uuid,
        permission_type: PermissionType,
        granted_by_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            user_id,
            permission_type,
            granted_by_id,
            is_active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the permission applies at `now`.
    #[must_use]
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expiry| now < expiry)
    }
}

impl_record!(
    WalletPermission,
    table = "wallets_permission",
    plural = "wallet permissions",
    listed_by = created_at,
    updated = updated_at,
    keys = |p| vec![key(
        "wallet_user_type",
        format!("{}/{}/{}", p.wallet_id, p.user_id, p.permission_type)
    )]
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::record::Record;
    use chrono::Duration;

    const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn wallet_type_rejects_inverted_bounds() {
        let mut wallet_type = WalletType::new("Vault", WalletCategory::Custodial);
        wallet_type.min_balance = Decimal::from(10);
        wallet_type.max_balance = Some(Decimal::from(5));
        assert!(wallet_type.validate().is_err());
        wallet_type.max_balance = Some(Decimal::from(50));
        assert!(wallet_type.validate().is_ok());
    }

    #[test]
    fn wallet_flag_is_scoped_to_owner() {
        let user = Uuid::new_v4();
        let mut wallet = Wallet::new(user, Uuid::new_v4(), "Main", ADDRESS);
        wallet.is_primary = true;
        let flag = wallet.exclusive_flag().unwrap();
        assert_eq!(flag.owner, user);
        assert!(flag.set);

        wallet.clear_exclusive_flag();
        assert!(!wallet.is_primary);
    }

    #[test]
    fn wallet_keys_cover_address_and_owner_name() {
        let wallet = Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Main", ADDRESS);
        let keys = wallet.natural_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].starts_with("address=0x5290"));
    }

    #[test]
    fn wallet_rejects_bad_address() {
        let wallet = Wallet::new(Uuid::new_v4(), Uuid::new_v4(), "Main", "not-an-address");
        assert!(matches!(
            wallet.validate(),
            Err(DomainError::InvalidAddress(_))
        ));
    }

    #[test]
    fn permission_expiry() {
        let now = Utc::now();
        let mut permission = WalletPermission::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PermissionType::Read,
            Uuid::new_v4(),
        );
        assert!(permission.is_effective(now));
        permission.expires_at = Some(now - Duration::minutes(1));
        assert!(!permission.is_effective(now));
    }
}
