//! # Token Records
//!
//! MTT token metadata, per-user balances, transfers, price ticks and
//! smart-contract allowances.
//!
//! # Examples
//!
//! ```
//! use mtt_gateway::domain::entities::record::Record;
//! use mtt_gateway::domain::entities::tokens::TokenBalance;
//! use rust_decimal::Decimal;
//! use uuid::Uuid;
//!
//! let mut balance = TokenBalance::new(Uuid::new_v4(), Uuid::new_v4());
//! balance.balance = Decimal::new(100, 0);
//! balance.locked_balance = Decimal::new(30, 0);
//! balance.prepare(chrono::Utc::now());
//! assert_eq!(balance.available_balance, Decimal::new(70, 0));
//! ```

use crate::domain::entities::record::{impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::{ensure_non_negative, ensure_positive, floor_at_zero};
use crate::domain::value_objects::chain::{validate_address, validate_tx_hash};
use crate::domain::value_objects::choices::choice_enum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

choice_enum! {
    /// Kind of token movement.
    pub enum TransferType("transfer_type") {
        Send = "SEND" => "Send",
        Receive = "RECEIVE" => "Receive",
        Purchase = "PURCHASE" => "Purchase",
        Sale = "SALE" => "Sale",
        Reward = "REWARD" => "Reward",
        Refund = "REFUND" => "Refund",
        Fee = "FEE" => "Fee",
    }
}

choice_enum! {
    /// Lifecycle of a token transfer.
    pub enum TransferStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processing = "PROCESSING" => "Processing",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
    }
}

/// MTT token configuration and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Primary key.
    pub id: Uuid,
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places of the on-chain representation.
    pub decimals: u32,
    /// Total supply.
    pub total_supply: Decimal,
    /// Contract address, unique.
    pub contract_address: String,
    /// EVM chain id.
    pub chain_id: u64,
    /// Whether the token is tradable.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Token {
    /// Creates the default MTT token on Ethereum mainnet.
    #[must_use]
    pub fn new(contract_address: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: "MayTheToken".to_string(),
            symbol: "MTT".to_string(),
            decimals: 18,
            total_supply: Decimal::ZERO,
            contract_address: contract_address.into(),
            chain_id: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates the contract address and supply.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed address or negative supply.
    pub fn validate(&self) -> DomainResult<()> {
        validate_address(&self.contract_address)?;
        ensure_non_negative("total_supply", self.total_supply)?;
        Ok(())
    }
}

impl_record!(
    Token,
    table = "tokens_token",
    plural = "tokens",
    listed_by = created_at,
    updated = updated_at,
    validate = Token::validate,
    keys = |t| vec![key("contract_address", &t.contract_address)]
);

/// A user's balance of one token.
///
/// `available_balance` is derived: `max(0, balance - locked_balance)`,
/// recomputed on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Primary key.
    pub id: Uuid,
    /// Holder.
    pub user_id: Uuid,
    /// Token held.
    pub token_id: Uuid,
    /// Total balance.
    pub balance: Decimal,
    /// Portion reserved by pending operations.
    pub locked_balance: Decimal,
    /// Spendable portion, derived.
    pub available_balance: Decimal,
    /// Last modification time.
    pub last_updated: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TokenBalance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new(user_id: Uuid, token_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_id,
            balance: Decimal::ZERO,
            locked_balance: Decimal::ZERO,
            available_balance: Decimal::ZERO,
            last_updated: now,
            created_at: now,
        }
    }

    /// Recomputes `available_balance`.
    pub fn refresh_available(&mut self) {
        self.available_balance = floor_at_zero(self.balance - self.locked_balance);
    }

    /// Moves `amount` from available into locked.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for a non-positive amount and
    /// [`DomainError::InsufficientBalance`] when not enough is available.
    pub fn lock(&mut self, amount: Decimal) -> DomainResult<()> {
        ensure_positive("amount", amount)?;
        self.refresh_available();
        if amount > self.available_balance {
            return Err(DomainError::InsufficientBalance {
                requested: amount.to_string(),
                available: self.available_balance.to_string(),
            });
        }
        self.locked_balance += amount;
        self.refresh_available();
        Ok(())
    }

    /// Releases `amount` from locked back to available.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for a non-positive amount and
    /// [`DomainError::InsufficientBalance`] when less than `amount` is locked.
    pub fn unlock(&mut self, amount: Decimal) -> DomainResult<()> {
        ensure_positive("amount", amount)?;
        if amount > self.locked_balance {
            return Err(DomainError::InsufficientBalance {
                requested: amount.to_string(),
                available: self.locked_balance.to_string(),
            });
        }
        self.locked_balance -= amount;
        self.refresh_available();
        Ok(())
    }

    /// Validates that neither balance column is negative.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] for a negative column.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative("balance", self.balance)?;
        ensure_non_negative("locked_balance", self.locked_balance)?;
        Ok(())
    }
}

impl_record!(
    TokenBalance,
    table = "tokens_balance",
    plural = "token balances",
    listed_by = created_at,
    updated = last_updated,
    validate = TokenBalance::validate,
    keys = |b| vec![key("user_token", format!("{}/{}", b.user_id, b.token_id))],
    prepare = |b, _now| {
        b.refresh_available();
    }
);

/// A token transfer between users or addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransfer {
    /// Primary key.
    pub id: Uuid,
    /// Token moved.
    pub token_id: Uuid,
    /// Sending user, if internal.
    pub from_user_id: Option<Uuid>,
    /// Receiving user, if internal.
    pub to_user_id: Option<Uuid>,
    /// Sending address.
    pub from_address: Option<String>,
    /// Receiving address.
    pub to_address: Option<String>,
    /// Amount moved.
    pub amount: Decimal,
    /// On-chain transaction hash, unique when present.
    pub transaction_hash: Option<String>,
    /// Block the transfer was mined in.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: Option<u64>,
    /// Gas price in wei.
    pub gas_price: Option<u64>,
    /// Kind of movement.
    pub transfer_type: TransferType,
    /// Lifecycle status.
    pub status: TransferStatus,
    /// Free-form notes.
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// On-chain confirmation time.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TokenTransfer {
    /// Creates a pending transfer.
    #[must_use]
    pub fn new(token_id: Uuid, amount: Decimal, transfer_type: TransferType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token_id,
            from_user_id: None,
            to_user_id: None,
            from_address: None,
            to_address: None,
            amount,
            transaction_hash: None,
            block_number: None,
            gas_used: None,
            gas_price: None,
            transfer_type,
            status: TransferStatus::default(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
            confirmed_at: None,
        }
    }

    /// Validates amount, addresses and hash.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("amount", self.amount)?;
        for address in [&self.from_address, &self.to_address].into_iter().flatten() {
            validate_address(address)?;
        }
        if let Some(hash) = &self.transaction_hash {
            validate_tx_hash(hash)?;
        }
        Ok(())
    }
}

impl_record!(
    TokenTransfer,
    table = "tokens_transfer",
    plural = "token transfers",
    listed_by = created_at,
    updated = updated_at,
    validate = TokenTransfer::validate,
    keys = |t| t
        .transaction_hash
        .iter()
        .map(|h| key("transaction_hash", h))
        .collect()
);

/// A price observation for a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    /// Primary key.
    pub id: Uuid,
    /// Token priced.
    pub token_id: Uuid,
    /// Price in USD.
    pub price_usd: Decimal,
    /// Price in ETH.
    pub price_eth: Option<Decimal>,
    /// Market capitalization in USD.
    pub market_cap: Option<Decimal>,
    /// Traded volume over 24 hours in USD.
    pub volume_24h: Option<Decimal>,
    /// Where the price came from.
    pub source: String,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
}

impl TokenPrice {
    /// Creates an internal price observation at the current time.
    #[must_use]
    pub fn new(token_id: Uuid, price_usd: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_id,
            price_usd,
            price_eth: None,
            market_cap: None,
            volume_24h: None,
            source: "internal".to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl_record!(
    TokenPrice,
    table = "tokens_price",
    plural = "token prices",
    listed_by = timestamp
);

/// Spending allowance granted by an owner to a contract address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAllowance {
    /// Primary key.
    pub id: Uuid,
    /// Token covered.
    pub token_id: Uuid,
    /// Granting user.
    pub owner_id: Uuid,
    /// Contract allowed to spend.
    pub spender_address: String,
    /// Approved amount.
    pub allowance: Decimal,
    /// Approval transaction.
    pub transaction_hash: Option<String>,
    /// Whether the approval is in force.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl TokenAllowance {
    /// Creates an active allowance.
    #[must_use]
    pub fn new(
        token_id: Uuid,
        owner_id: Uuid,
        spender_address: impl Into<String>,
        allowance: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token_id,
            owner_id,
            spender_address: spender_address.into(),
            allowance,
            transaction_hash: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl_record!(
    TokenAllowance,
    table = "tokens_allowance",
    plural = "token allowances",
    listed_by = created_at,
    updated = updated_at,
    keys = |a| vec![key(
        "token_owner_spender",
        format!("{}/{}/{}", a.token_id, a.owner_id, a.spender_address.to_lowercase())
    )]
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::record::Record;

    fn balance(total: i64, locked: i64) -> TokenBalance {
        let mut b = TokenBalance::new(Uuid::new_v4(), Uuid::new_v4());
        b.balance = Decimal::from(total);
        b.locked_balance = Decimal::from(locked);
        b
    }

    #[test]
    fn prepare_floors_available_at_zero() {
        let mut b = balance(10, 25);
        b.prepare(Utc::now());
        assert_eq!(b.available_balance, Decimal::ZERO);
    }

    #[test]
    fn lock_and_unlock_move_available() {
        let mut b = balance(100, 0);
        b.lock(Decimal::from(40)).unwrap();
        assert_eq!(b.locked_balance, Decimal::from(40));
        assert_eq!(b.available_balance, Decimal::from(60));

        b.unlock(Decimal::from(15)).unwrap();
        assert_eq!(b.available_balance, Decimal::from(75));
    }

    #[test]
    fn lock_more_than_available_fails() {
        let mut b = balance(10, 5);
        let err = b.lock(Decimal::from(6)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientBalance { .. }));
        assert_eq!(b.locked_balance, Decimal::from(5));
    }

    #[test]
    fn transfer_natural_key_only_with_hash() {
        let mut transfer =
            TokenTransfer::new(Uuid::new_v4(), Decimal::ONE, TransferType::Reward);
        assert!(transfer.natural_keys().is_empty());
        transfer.transaction_hash = Some(format!("0x{}", "1f".repeat(32)));
        assert_eq!(transfer.natural_keys().len(), 1);
        assert!(transfer.validate().is_ok());
    }

    #[test]
    fn token_defaults() {
        let token = Token::new("0x52908400098527886E0F7030069857D2E4169EE7");
        assert_eq!(token.symbol, "MTT");
        assert_eq!(token.decimals, 18);
        assert!(token.validate().is_ok());
    }
}
