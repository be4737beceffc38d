//! # Application Layer
//!
//! Use case orchestration between the HTTP surface and the record stores.
//!
//! ## Use Cases
//!
//! - [`CreateWalletTypeUseCase`]: register a wallet type
//! - [`CreateWalletUseCase`]: register a wallet for an existing user
//! - [`SeedDemoDataUseCase`]: load the demo dataset into empty stores
//!
//! Listing endpoints share the generic helpers in [`use_cases::records`].

pub mod dto;
pub mod error;
pub mod use_cases;

pub use dto::{CreateWalletRequest, CreateWalletTypeRequest, Names};
pub use error::{ApplicationError, ApplicationResult};
pub use use_cases::{
    CreateWalletTypeUseCase, CreateWalletUseCase, Page, SeedDemoDataUseCase, SeedSummary,
};
