//! # Value Objects
//!
//! Small validated building blocks shared by the gateway records.
//!
//! - [`choices`]: the `choice_enum!` generator behind every enumerated column
//! - [`amounts`]: decimal sign, range and percentage helpers
//! - [`chain`]: EVM address and transaction hash validation
//! - [`reference`]: support ticket and marketplace order numbers

pub mod amounts;
pub mod chain;
pub mod choices;
pub mod reference;

pub use amounts::{floor_at_zero, percentage_of, ratio_or_zero};
pub use chain::{validate_address, validate_tx_hash};
