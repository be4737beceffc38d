//! # Chain Identifiers
//!
//! Validation for EVM addresses (`0x` + 40 hex digits) and transaction or
//! block hashes (`0x` + 64 hex digits), matching the column widths of the
//! schema (42 and 66 characters).

use crate::domain::errors::{DomainError, DomainResult};

/// Length of an EVM address including the `0x` prefix.
pub const ADDRESS_LEN: usize = 42;

/// Length of a transaction hash including the `0x` prefix.
pub const HASH_LEN: usize = 66;

fn is_prefixed_hex(value: &str, len: usize) -> bool {
    value.len() == len
        && value
            .strip_prefix("0x")
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Validates an EVM address.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAddress`] if the value is not `0x` + 40 hex digits.
///
/// # Examples
///
/// ```
/// use mtt_gateway::domain::value_objects::chain::validate_address;
///
/// assert!(validate_address("0x52908400098527886E0F7030069857D2E4169EE7").is_ok());
/// assert!(validate_address("52908400098527886E0F7030069857D2E4169EE7").is_err());
/// ```
pub fn validate_address(value: &str) -> DomainResult<()> {
    if is_prefixed_hex(value, ADDRESS_LEN) {
        Ok(())
    } else {
        Err(DomainError::InvalidAddress(value.to_string()))
    }
}

/// Validates a transaction or block hash.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTransactionHash`] if the value is not `0x` + 64 hex digits.
pub fn validate_tx_hash(value: &str) -> DomainResult<()> {
    if is_prefixed_hex(value, HASH_LEN) {
        Ok(())
    } else {
        Err(DomainError::InvalidTransactionHash(value.to_string()))
    }
}

/// Shortened display form used in log lines (`0x52908400...`).
#[must_use]
pub fn abbreviate(value: &str) -> String {
    match value.get(..10) {
        Some(head) if value.len() > 10 => format!("{head}..."),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_requires_prefix_and_length() {
        assert!(validate_address("0x0000000000000000000000000000000000000000").is_ok());
        assert!(validate_address("0x000").is_err());
        assert!(validate_address("0xZZ00000000000000000000000000000000000000").is_err());
    }

    #[test]
    fn hash_requires_64_hex_digits() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert!(validate_tx_hash(&hash).is_ok());
        assert!(validate_tx_hash(&hash[..65]).is_err());
    }

    #[test]
    fn abbreviate_long_values() {
        assert_eq!(
            abbreviate("0x52908400098527886E0F7030069857D2E4169EE7"),
            "0x52908400..."
        );
        assert_eq!(abbreviate("0x1"), "0x1");
    }
}
