//! # Amounts
//!
//! Decimal helpers shared by the monetary and token records.
//!
//! Fiat amounts carry two decimal places and token amounts eighteen; both
//! are plain [`Decimal`]s here and the helpers only enforce the sign and
//! range rules the schema declares.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;

/// One hundred, the percentage denominator.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Returns `value` floored at zero.
///
/// # Examples
///
/// ```
/// use mtt_gateway::domain::value_objects::amounts::floor_at_zero;
/// use rust_decimal::Decimal;
///
/// assert_eq!(floor_at_zero(Decimal::new(-5, 0)), Decimal::ZERO);
/// assert_eq!(floor_at_zero(Decimal::new(5, 0)), Decimal::new(5, 0));
/// ```
#[inline]
#[must_use]
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Rejects negative amounts.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAmount`] when `value < 0`.
pub fn ensure_non_negative(field: &str, value: Decimal) -> DomainResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::InvalidAmount(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Rejects zero and negative amounts.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAmount`] when `value <= 0`.
pub fn ensure_positive(field: &str, value: Decimal) -> DomainResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(value)
}

/// Rejects percentages outside `0..=100`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidPercentage`] when out of range.
pub fn ensure_percentage(field: &str, value: Decimal) -> DomainResult<Decimal> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(DomainError::InvalidPercentage(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(value)
}

/// `amount * percentage / 100`.
///
/// # Errors
///
/// Returns [`DomainError::Overflow`] if the product does not fit.
pub fn percentage_of(amount: Decimal, percentage: Decimal) -> DomainResult<Decimal> {
    amount
        .checked_mul(percentage)
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or(DomainError::Overflow)
}

/// `numerator / denominator`, or zero when the denominator is zero.
///
/// A quotient too large for [`Decimal`] saturates at [`Decimal::MAX`], or
/// [`Decimal::MIN`] when the operands differ in sign.
#[must_use]
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() == denominator.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}
