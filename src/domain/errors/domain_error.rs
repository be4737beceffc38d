//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: State errors
//! - **4000-4999**: Arithmetic errors
//!
//! # Examples
//!
//! ```
//! use mtt_gateway::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidAmount("amount must be positive".to_string());
//! assert_eq!(error.code(), 1001);
//! ```

use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | State errors |
/// | 4000-4999 | Arithmetic errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Invalid monetary or token amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid percentage (outside 0..=100).
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Value is not one of the declared choices of a field.
    #[error("invalid choice for {field}: {value}")]
    InvalidChoice {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Invalid on-chain address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid on-chain transaction hash.
    #[error("invalid transaction hash: {0}")]
    InvalidTransactionHash(String),

    /// Required field is empty or too long.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Generic validation error.
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========================================================================
    // State Errors (2000-2999)
    // ========================================================================
    /// Not enough unlocked balance for the operation.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount requested.
        requested: String,
        /// Amount available.
        available: String,
    },

    /// Fill would exceed the order quantity.
    #[error("overfill: fill of {fill} exceeds remaining {remaining}")]
    Overfill {
        /// Attempted fill quantity.
        fill: String,
        /// Remaining order quantity.
        remaining: String,
    },

    /// Operation not allowed in current state.
    #[error("operation not allowed: {0}")]
    OperationNotAllowed(String),

    // ========================================================================
    // Arithmetic Errors (4000-4999)
    // ========================================================================
    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl DomainError {
    /// Returns the numeric error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use mtt_gateway::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidAmount("test".to_string()).code(), 1001);
    /// assert_eq!(DomainError::Overflow.code(), 4001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) => 1001,
            Self::InvalidPercentage(_) => 1002,
            Self::InvalidChoice { .. } => 1003,
            Self::InvalidAddress(_) => 1004,
            Self::InvalidTransactionHash(_) => 1005,
            Self::InvalidField { .. } => 1006,
            Self::ValidationError(_) => 1099,

            Self::InsufficientBalance { .. } => 2001,
            Self::Overfill { .. } => 2002,
            Self::OperationNotAllowed(_) => 2099,

            Self::Overflow => 4001,
            Self::DivisionByZero => 4003,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "state",
            4000..=4999 => "arithmetic",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a state error.
    #[inline]
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is an arithmetic error.
    #[inline]
    #[must_use]
    pub const fn is_arithmetic_error(&self) -> bool {
        matches!(self.code(), 4000..=4999)
    }

    /// Shorthand for [`DomainError::InvalidField`].
    #[must_use]
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod error_codes {
        use super::*;

        #[test]
        fn validation_errors_in_range() {
            let errors = [
                DomainError::InvalidAmount("test".to_string()),
                DomainError::InvalidPercentage("test".to_string()),
                DomainError::InvalidChoice {
                    field: "status",
                    value: "NOPE".to_string(),
                },
                DomainError::InvalidAddress("test".to_string()),
                DomainError::InvalidTransactionHash("test".to_string()),
                DomainError::invalid_field("name", "must not be empty"),
                DomainError::ValidationError("test".to_string()),
            ];

            for error in errors {
                let code = error.code();
                assert!(
                    (1000..2000).contains(&code),
                    "Expected validation error code 1000-1999, got {}",
                    code
                );
                assert!(error.is_validation_error());
                assert_eq!(error.category(), "validation");
            }
        }

        #[test]
        fn state_errors_in_range() {
            let errors = [
                DomainError::InsufficientBalance {
                    requested: "10".to_string(),
                    available: "5".to_string(),
                },
                DomainError::Overfill {
                    fill: "3".to_string(),
                    remaining: "2".to_string(),
                },
                DomainError::OperationNotAllowed("test".to_string()),
            ];

            for error in errors {
                assert!(error.is_state_error());
                assert_eq!(error.category(), "state");
            }
        }

        #[test]
        fn arithmetic_errors_in_range() {
            for error in [DomainError::Overflow, DomainError::DivisionByZero] {
                assert!(error.is_arithmetic_error());
                assert_eq!(error.category(), "arithmetic");
            }
        }
    }

    mod display {
        use super::*;

        #[test]
        fn invalid_choice_display() {
            let error = DomainError::InvalidChoice {
                field: "category",
                value: "PAPER".to_string(),
            };
            assert_eq!(error.to_string(), "invalid choice for category: PAPER");
        }

        #[test]
        fn insufficient_balance_display() {
            let error = DomainError::InsufficientBalance {
                requested: "10".to_string(),
                available: "4".to_string(),
            };
            assert_eq!(
                error.to_string(),
                "insufficient balance: requested 10, available 4"
            );
        }
    }
}
