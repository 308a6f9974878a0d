//! Small helpers for working with optional decimal fields.

use rust_decimal::Decimal;

use crate::constants::CHANGE_TOLERANCE;

/// True when the value is unknown or zero.
///
/// Zero is how the legacy spreadsheet recorded "not filled in", so fields that
/// are about to be derived treat it the same as `None`.
pub fn is_blank(value: Option<Decimal>) -> bool {
    value.map_or(true, |v| v.is_zero())
}

/// Returns the value only when it is known and strictly positive.
pub fn positive(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

/// Division that yields `None` for a zero denominator or an overflowing result.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator)
}

/// Compares two decimals with a relative tolerance.
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    let scale = a.abs().max(b.abs()).max(Decimal::ONE);
    (a - b).abs() <= CHANGE_TOLERANCE * scale
}

/// Percent change from `old` to `new`, `None` when `old` is zero.
pub fn percent_change(old: Decimal, new: Decimal) -> Option<Decimal> {
    safe_div(new - old, old).map(|ratio| ratio * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(Decimal::ZERO)));
        assert!(!is_blank(Some(dec!(0.01))));
        assert!(!is_blank(Some(dec!(-5))));
    }

    #[test]
    fn test_positive_filters_non_positive_values() {
        assert_eq!(positive(Some(dec!(3))), Some(dec!(3)));
        assert_eq!(positive(Some(Decimal::ZERO)), None);
        assert_eq!(positive(Some(dec!(-1))), None);
        assert_eq!(positive(None), None);
    }

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(dec!(10), Decimal::ZERO), None);
        assert_eq!(safe_div(dec!(10), dec!(4)), Some(dec!(2.5)));
    }

    #[test]
    fn test_approx_eq_uses_relative_tolerance() {
        assert!(approx_eq(dec!(1000000), dec!(1000000.0000000001)));
        assert!(!approx_eq(dec!(1000000), dec!(1000000.01)));
        assert!(approx_eq(dec!(0.1), dec!(0.1)));
        assert!(!approx_eq(dec!(0.1), dec!(0.1001)));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(200), dec!(250)), Some(dec!(25)));
        assert_eq!(percent_change(Decimal::ZERO, dec!(5)), None);
    }
}
