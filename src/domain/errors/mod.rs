//! # Domain Errors
//!
//! Typed error types for domain operations.
//!
//! Error codes are organized by category:
//! - 1000-1999: Validation errors
//! - 2000-2999: State errors
//! - 4000-4999: Arithmetic errors
//!
//! # Examples
//!
//! ```
//! use mtt_gateway::domain::errors::{DomainError, DomainResult};
//! use rust_decimal::Decimal;
//!
//! fn validate_amount(amount: Decimal) -> DomainResult<Decimal> {
//!     if amount.is_sign_negative() {
//!         return Err(DomainError::InvalidAmount("amount must not be negative".to_string()));
//!     }
//!     Ok(amount)
//! }
//! ```

pub mod domain_error;

pub use domain_error::{DomainError, DomainResult};
