//! # Create Wallet Use Case
//!
//! Use case behind `POST /api/wallets/list/`.
//!
//! This use case orchestrates the creation of a wallet, including:
//! - Request validation
//! - Owner and wallet type lookup
//! - Address and name checks
//! - Persistence, which moves the owner's primary flag when requested

use crate::application::dto::{CreateWalletRequest, Names, WalletView};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::use_cases::records::save_record;
use crate::domain::entities::User;
use crate::domain::entities::wallets::{Wallet, WalletType};
use crate::infrastructure::persistence::factory::Store;
use tracing::{info, warn};

/// Use case for creating a wallet.
#[derive(Debug, Clone)]
pub struct CreateWalletUseCase {
    users: Store<User>,
    wallet_types: Store<WalletType>,
    wallets: Store<Wallet>,
}

impl CreateWalletUseCase {
    /// Creates the use case with all dependencies.
    #[must_use]
    pub fn new(users: Store<User>, wallet_types: Store<WalletType>, wallets: Store<Wallet>) -> Self {
        Self {
            users,
            wallet_types,
            wallets,
        }
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Request validation fails or the address is malformed
    /// - The owner or wallet type does not exist
    /// - The wallet type is inactive
    /// - The address, or the name for this owner, is taken
    /// - Persistence fails
    pub async fn execute(&self, request: CreateWalletRequest) -> ApplicationResult<WalletView> {
        request.validate().map_err(ApplicationError::validation)?;

        let user = self
            .users
            .get(request.user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("user", request.user_id))?;

        let wallet_type = self
            .wallet_types
            .get(request.wallet_type_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("wallet type", request.wallet_type_id))?;

        if !wallet_type.is_active {
            warn!(wallet_type = %wallet_type.name, "wallet type is inactive");
            return Err(ApplicationError::validation(format!(
                "wallet type {} is not active",
                wallet_type.name
            )));
        }

        let wallet = request.to_record()?;
        let saved = save_record(self.wallets.as_ref(), wallet).await?;

        info!(
            id = %saved.id,
            user = %user.username,
            wallet_type = %wallet_type.name,
            primary = saved.is_primary,
            "wallet created"
        );

        let users = Names::new([(user.id, user.username)]);
        let types = Names::new([(wallet_type.id, wallet_type.name)]);
        Ok(WalletView::new(&saved, &users, &types))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::wallets::WalletCategory;
    use crate::infrastructure::persistence::StoreFactory;
    use uuid::Uuid;

    const ADDRESS_A: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
    const ADDRESS_B: &str = "0x8617E340B3D01FA5F11F306F4090FD50E238070D";

    struct Fixture {
        use_case: CreateWalletUseCase,
        user: User,
        wallet_type: WalletType,
    }

    async fn fixture() -> Fixture {
        let factory = StoreFactory::InMemory;
        let users: Store<User> = factory.store();
        let wallet_types: Store<WalletType> = factory.store();
        let user = users.save(User::new("alice", "alice@example.com")).await.unwrap();
        let wallet_type = wallet_types
            .save(WalletType::new("MetaMask", WalletCategory::NonCustodial))
            .await
            .unwrap();

        Fixture {
            use_case: CreateWalletUseCase::new(users, wallet_types, factory.store()),
            user,
            wallet_type,
        }
    }

    #[tokio::test]
    async fn creates_wallet_with_names() {
        let f = fixture().await;
        let view = f
            .use_case
            .execute(CreateWalletRequest::new(f.user.id, f.wallet_type.id, "Main", ADDRESS_A))
            .await
            .unwrap();

        assert_eq!(view.username.as_deref(), Some("alice"));
        assert_eq!(view.wallet_type.as_deref(), Some("MetaMask"));
        assert!(!view.is_primary);
    }

    #[tokio::test]
    async fn new_primary_wallet_takes_the_flag() {
        let f = fixture().await;
        let first = f
            .use_case
            .execute(CreateWalletRequest::new(f.user.id, f.wallet_type.id, "Main", ADDRESS_A).primary())
            .await
            .unwrap();
        let second = f
            .use_case
            .execute(
                CreateWalletRequest::new(f.user.id, f.wallet_type.id, "Savings", ADDRESS_B).primary(),
            )
            .await
            .unwrap();

        let wallets = &f.use_case.wallets;
        assert!(!wallets.get(first.id).await.unwrap().unwrap().is_primary);
        assert!(wallets.get(second.id).await.unwrap().unwrap().is_primary);
    }

    #[tokio::test]
    async fn unknown_owner_is_not_found() {
        let f = fixture().await;
        let err = f
            .use_case
            .execute(CreateWalletRequest::new(Uuid::new_v4(), f.wallet_type.id, "Main", ADDRESS_A))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { entity: "user", .. }));
    }

    #[tokio::test]
    async fn inactive_type_rejected() {
        let f = fixture().await;
        let mut wallet_type = f.wallet_type.clone();
        wallet_type.is_active = false;
        f.use_case.wallet_types.save(wallet_type).await.unwrap();

        let err = f
            .use_case
            .execute(CreateWalletRequest::new(f.user.id, f.wallet_type.id, "Main", ADDRESS_A))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn address_reuse_conflicts() {
        let f = fixture().await;
        f.use_case
            .execute(CreateWalletRequest::new(f.user.id, f.wallet_type.id, "Main", ADDRESS_A))
            .await
            .unwrap();

        let err = f
            .use_case
            .execute(CreateWalletRequest::new(
                f.user.id,
                f.wallet_type.id,
                "Other",
                ADDRESS_A.to_lowercase(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[tokio::test]
    async fn malformed_address_rejected() {
        let f = fixture().await;
        let err = f
            .use_case
            .execute(CreateWalletRequest::new(f.user.id, f.wallet_type.id, "Main", "0x1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::DomainError(_)));
    }
}
