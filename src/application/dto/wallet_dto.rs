//! # Wallet DTOs
//!
//! Request bodies of the two write endpoints, `POST /api/wallets/types/` and
//! `POST /api/wallets/list/`.
//!
//! Choice fields arrive as their stored codes (`"NON_CUSTODIAL"`) and are
//! parsed in [`CreateWalletTypeRequest::validate`] so a bad code surfaces as
//! a validation error instead of a body rejection.

use crate::domain::entities::wallets::{Wallet, WalletCategory, WalletStatus, WalletType};
use crate::domain::errors::DomainResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a wallet type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletTypeRequest {
    /// Unique type name.
    pub name: String,
    /// Custody model code, e.g. `"CUSTODIAL"`.
    pub category: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Whether new wallets may use the type. Defaults to `true`.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Holds MTT. Defaults to `true`.
    #[serde(default)]
    pub supports_mtt: Option<bool>,
    /// Owners must pass KYC.
    #[serde(default)]
    pub requires_kyc: bool,
    /// Minimum balance. Defaults to zero.
    #[serde(default)]
    pub min_balance: Option<Decimal>,
    /// Maximum balance, unlimited when absent.
    #[serde(default)]
    pub max_balance: Option<Decimal>,
}

impl CreateWalletTypeRequest {
    /// Creates a request with defaults for every optional field.
    #[must_use]
    pub fn new(name: impl Into<String>, category: WalletCategory) -> Self {
        Self {
            name: name.into(),
            category: category.as_str().to_string(),
            description: String::new(),
            is_active: None,
            supports_mtt: None,
            requires_kyc: false,
            min_balance: None,
            max_balance: None,
        }
    }

    /// Validates the request fields.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }

        self.category
            .parse::<WalletCategory>()
            .map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Builds the wallet type record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChoice` for an unknown category code.
    pub fn to_record(&self) -> DomainResult<WalletType> {
        let mut wallet_type = WalletType::new(self.name.trim(), self.category.parse()?);
        wallet_type.description = self.description.clone();
        wallet_type.requires_kyc = self.requires_kyc;
        if let Some(active) = self.is_active {
            wallet_type.is_active = active;
        }
        if let Some(mtt) = self.supports_mtt {
            wallet_type.supports_mtt = mtt;
        }
        if let Some(min) = self.min_balance {
            wallet_type.min_balance = min;
        }
        wallet_type.max_balance = self.max_balance;
        Ok(wallet_type)
    }
}

/// Request to create a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    /// Owner.
    pub user_id: Uuid,
    /// Wallet type.
    pub wallet_type_id: Uuid,
    /// Name, unique per owner.
    pub name: String,
    /// EVM address, unique.
    pub address: String,
    /// Public key.
    #[serde(default)]
    pub public_key: Option<String>,
    /// Status code. Defaults to `"ACTIVE"`.
    #[serde(default)]
    pub status: Option<String>,
    /// Make this the owner's primary wallet.
    #[serde(default)]
    pub is_primary: bool,
    /// Receives merchant payments.
    #[serde(default)]
    pub is_merchant: bool,
    /// Backs a merchant gateway.
    #[serde(default)]
    pub is_gateway: bool,
}

impl CreateWalletRequest {
    /// Creates a request for a non-primary wallet.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        wallet_type_id: Uuid,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            wallet_type_id,
            name: name.into(),
            address: address.into(),
            public_key: None,
            status: None,
            is_primary: false,
            is_merchant: false,
            is_gateway: false,
        }
    }

    /// Marks the requested wallet as primary.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Validates the request fields.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }

        if self.address.trim().is_empty() {
            return Err("address cannot be empty".to_string());
        }

        if let Some(status) = &self.status {
            status.parse::<WalletStatus>().map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    /// Builds the wallet record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChoice` for an unknown status code.
    pub fn to_record(&self) -> DomainResult<Wallet> {
        let mut wallet = Wallet::new(
            self.user_id,
            self.wallet_type_id,
            self.name.trim(),
            self.address.trim(),
        );
        wallet.public_key = self.public_key.clone();
        if let Some(status) = &self.status {
            wallet.status = status.parse()?;
        }
        wallet.is_primary = self.is_primary;
        wallet.is_merchant = self.is_merchant;
        wallet.is_gateway = self.is_gateway;
        Ok(wallet)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn wallet_type_request_defaults() {
        let request: CreateWalletTypeRequest =
            serde_json::from_str(r#"{"name":"Ledger","category":"NON_CUSTODIAL"}"#).unwrap();
        assert!(request.validate().is_ok());

        let record = request.to_record().unwrap();
        assert_eq!(record.name, "Ledger");
        assert_eq!(record.category, WalletCategory::NonCustodial);
        assert!(record.is_active);
        assert!(record.supports_mtt);
        assert_eq!(record.min_balance, Decimal::ZERO);
    }

    #[test]
    fn wallet_type_request_rejects_unknown_category() {
        let request = CreateWalletTypeRequest {
            category: "PAPER".to_string(),
            ..CreateWalletTypeRequest::new("Paper", WalletCategory::Custodial)
        };
        let err = request.validate().unwrap_err();
        assert!(err.contains("PAPER"));
    }

    #[test]
    fn wallet_type_request_rejects_blank_name() {
        let request = CreateWalletTypeRequest::new("   ", WalletCategory::Custodial);
        assert!(request.validate().is_err());
    }

    #[test]
    fn wallet_request_overrides() {
        let mut request =
            CreateWalletRequest::new(Uuid::new_v4(), Uuid::new_v4(), " Main ", ADDRESS).primary();
        request.status = Some("LOCKED".to_string());
        assert!(request.validate().is_ok());

        let wallet = request.to_record().unwrap();
        assert_eq!(wallet.name, "Main");
        assert!(wallet.is_primary);
        assert_eq!(wallet.status, WalletStatus::Locked);
    }

    #[test]
    fn wallet_request_rejects_unknown_status() {
        let mut request = CreateWalletRequest::new(Uuid::new_v4(), Uuid::new_v4(), "Main", ADDRESS);
        request.status = Some("LOST".to_string());
        assert!(request.validate().is_err());
    }
}
