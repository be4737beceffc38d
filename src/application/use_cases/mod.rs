//! # Use Cases
//!
//! Application use cases implementing gateway workflows.
//!
//! Writes go through [`records::save_record`], which validates a record
//! before the store enforces its natural keys and exclusive flag. Reads
//! are paged newest first.

pub mod create_wallet;
pub mod create_wallet_type;
pub mod records;
pub mod seed_demo_data;

pub use create_wallet::CreateWalletUseCase;
pub use create_wallet_type::CreateWalletTypeUseCase;
pub use records::{Page, filtered_page, list_page, resolve_names, save_record};
pub use seed_demo_data::{SeedDemoDataUseCase, SeedSummary};
