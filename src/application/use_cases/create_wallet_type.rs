//! # Create Wallet Type Use Case
//!
//! Use case behind `POST /api/wallets/types/`: validates the request,
//! builds the wallet type and saves it under its unique name.

use crate::application::dto::CreateWalletTypeRequest;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::use_cases::records::save_record;
use crate::domain::entities::wallets::WalletType;
use crate::infrastructure::persistence::factory::Store;
use tracing::info;

/// Use case for creating a wallet type.
#[derive(Debug, Clone)]
pub struct CreateWalletTypeUseCase {
    wallet_types: Store<WalletType>,
}

impl CreateWalletTypeUseCase {
    /// Creates the use case over the wallet type store.
    #[must_use]
    pub fn new(wallet_types: Store<WalletType>) -> Self {
        Self { wallet_types }
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request validation fails
    /// - The balance bounds are inconsistent
    /// - A wallet type with the same name exists
    /// - Persistence fails
    pub async fn execute(&self, request: CreateWalletTypeRequest) -> ApplicationResult<WalletType> {
        request.validate().map_err(ApplicationError::validation)?;

        let wallet_type = request.to_record()?;
        let saved = save_record(self.wallet_types.as_ref(), wallet_type).await?;

        info!(id = %saved.id, name = %saved.name, category = %saved.category, "wallet type created");
        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::wallets::WalletCategory;
    use crate::infrastructure::persistence::StoreFactory;
    use rust_decimal::Decimal;

    fn use_case() -> CreateWalletTypeUseCase {
        CreateWalletTypeUseCase::new(StoreFactory::InMemory.store())
    }

    #[tokio::test]
    async fn creates_wallet_type() {
        let use_case = use_case();
        let created = use_case
            .execute(CreateWalletTypeRequest::new("MetaMask", WalletCategory::NonCustodial))
            .await
            .unwrap();

        assert_eq!(created.name, "MetaMask");
        let stored = use_case.wallet_types.get(created.id).await.unwrap();
        assert_eq!(stored.unwrap().category, WalletCategory::NonCustodial);
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let mut request = CreateWalletTypeRequest::new("Paper", WalletCategory::Custodial);
        request.category = "PAPER".to_string();

        let err = use_case().execute(request).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn rejects_inverted_bounds() {
        let mut request = CreateWalletTypeRequest::new("Vault", WalletCategory::Custodial);
        request.min_balance = Some(Decimal::from(10));
        request.max_balance = Some(Decimal::from(5));

        let err = use_case().execute(request).await.unwrap_err();
        assert!(matches!(err, ApplicationError::DomainError(_)));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let use_case = use_case();
        use_case
            .execute(CreateWalletTypeRequest::new("Ledger", WalletCategory::NonCustodial))
            .await
            .unwrap();

        let err = use_case
            .execute(CreateWalletTypeRequest::new("Ledger", WalletCategory::Hybrid))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }
}
