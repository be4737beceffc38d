//! # Reference Numbers
//!
//! Human-facing reference numbers assigned on first save:
//! support tickets (`MTT-` + 8 digits) and marketplace orders
//! (`MKT-` + 8 upper-case alphanumerics).

const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Prefix of support ticket numbers.
pub const TICKET_PREFIX: &str = "MTT-";

/// Prefix of marketplace order numbers.
pub const ORDER_PREFIX: &str = "MKT-";

/// Number of random characters after the prefix.
pub const SUFFIX_LEN: usize = 8;

fn random_suffix(alphabet: &[u8]) -> String {
    (0..SUFFIX_LEN)
        .filter_map(|_| alphabet.get(rand::random_range(0..alphabet.len())))
        .map(|&b| char::from(b))
        .collect()
}

/// Generates a support ticket number such as `MTT-04718263`.
#[must_use]
pub fn ticket_number() -> String {
    format!("{TICKET_PREFIX}{}", random_suffix(DIGITS))
}

/// Generates a marketplace order number such as `MKT-Q7Z0B2KD`.
#[must_use]
pub fn order_number() -> String {
    format!("{ORDER_PREFIX}{}", random_suffix(ALPHANUMERIC))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_number_shape() {
        let number = ticket_number();
        let suffix = number.strip_prefix(TICKET_PREFIX).unwrap_or_default();
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn order_number_shape() {
        for _ in 0..50 {
            let number = order_number();
            let suffix = number.strip_prefix(ORDER_PREFIX).unwrap_or_default();
            assert_eq!(suffix.len(), SUFFIX_LEN);
            assert!(
                suffix
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }
}
