//! Display formatting for amounts, fractions and multiples.
//!
//! Unknown values always render as an empty string.

use chrono::NaiveDate;
use roundcalc_core::changes::TrackedField;
use rust_decimal::Decimal;

/// `$1,234`, rounded to whole units.
pub fn format_currency(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let rounded = value.round_dp(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}", sign, group_thousands(&rounded.abs().trunc().to_string()))
}

/// A fraction as `12.34%`.
pub fn format_percentage(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{:.2}%", (v * Decimal::ONE_HUNDRED).round_dp(2)))
        .unwrap_or_default()
}

/// `1.23x`.
pub fn format_multiple(value: Option<Decimal>) -> String {
    value
        .map(|v| format!("{:.2}x", v.round_dp(2)))
        .unwrap_or_default()
}

/// `1.23B`, `1.23M`, `4.56K`, or the plain value with two decimals.
pub fn format_large_number(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= Decimal::from(1_000_000_000u64) {
        (value / Decimal::from(1_000_000_000u64), "B")
    } else if magnitude >= Decimal::from(1_000_000u64) {
        (value / Decimal::from(1_000_000u64), "M")
    } else if magnitude >= Decimal::from(1_000u64) {
        (value / Decimal::from(1_000u64), "K")
    } else {
        (value, "")
    };
    format!("{:.2}{}", scaled.round_dp(2), suffix)
}

/// `Jan 2024`.
pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// Formats a tracked field's value the way its column is displayed.
pub fn format_field(field: TrackedField, value: Option<Decimal>) -> String {
    match field {
        TrackedField::Premoney | TrackedField::PostMoney => format_currency(value),
        TrackedField::RoundOwnership | TrackedField::MyOwnership => format_percentage(value),
        TrackedField::RoundOverRoundIncrease | TrackedField::DilutionEstimate => {
            format_multiple(value)
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
