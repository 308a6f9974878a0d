//! Per-company summary models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One company's rounds rolled into a single record.
///
/// Ratios are `None` when their denominator is zero or unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub company: String,
    pub round_count: usize,
    pub total_invested: Decimal,
    /// Sum of `increase_value` over the company's rounds
    pub total_value: Decimal,
    pub first_valuation: Option<Decimal>,
    pub last_valuation: Option<Decimal>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// `last_valuation / first_valuation`
    pub round_increase: Option<Decimal>,
    /// `total_value / total_invested`
    pub dilution_increase: Option<Decimal>,
}

/// Totals across every summarized company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub company_count: usize,
    pub total_invested: Decimal,
    pub total_value: Decimal,
    pub multiple: Option<Decimal>,
}
