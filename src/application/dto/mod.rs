//! # Data Transfer Objects
//!
//! DTOs for use case input/output, decoupling API from domain.
//!
//! Request DTOs validate and build records; views shape records for
//! listing, withholding secrets and resolving referenced names.

pub mod views;
pub mod wallet_dto;

pub use views::{
    CardProcessorView, ConfigEntryView, CustomerProfileView, ErpIntegrationView,
    LiquidityPoolView, MerchantGatewayView, Names, TokenBalanceView, TokenPriceView,
    TokenTransferView, WalletView,
};
pub use wallet_dto::{CreateWalletRequest, CreateWalletTypeRequest};
