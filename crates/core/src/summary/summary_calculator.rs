//! Rolls each company's rounds into a summary record.

use std::cmp::Ordering;

use log::debug;
use rust_decimal::Decimal;

use super::summary_model::{CompanySummary, PortfolioTotals};
use crate::calculation::{resolve_companies, CompanyGroup};
use crate::rounds::RoundTable;
use crate::utils::safe_div;

/// Summarizes every company of the table, best `dilution_increase` first.
///
/// Companies whose multiple is undefined sort last; ties keep the order in
/// which companies first appear in the table.
pub fn summarize(table: &RoundTable) -> Vec<CompanySummary> {
    let resolved = resolve_companies(table);
    let mut summaries: Vec<CompanySummary> = resolved
        .groups
        .iter()
        .map(|group| summarize_company(group, table))
        .collect();

    summaries.sort_by(|a, b| compare_multiples(a.dilution_increase, b.dilution_increase));
    summaries
}

fn summarize_company(group: &CompanyGroup, table: &RoundTable) -> CompanySummary {
    let rounds = group.collect_rounds(table);

    let total_invested: Decimal = rounds.iter().filter_map(|r| r.invested).sum();
    let total_value: Decimal = rounds.iter().map(|r| r.increase_value).sum();

    let first_valuation = rounds.iter().find_map(|r| r.post_money);
    let last_valuation = rounds.iter().rev().find_map(|r| r.post_money);
    let first_date = rounds.iter().find_map(|r| r.date);
    let last_date = rounds.iter().rev().find_map(|r| r.date);

    let round_increase = match (first_valuation, last_valuation) {
        (Some(first), Some(last)) => safe_div(last, first),
        _ => None,
    };
    let dilution_increase = safe_div(total_value, total_invested);

    debug!(
        "Summarized {}: {} rounds, invested {}, value {}",
        group.company,
        rounds.len(),
        total_invested,
        total_value
    );

    CompanySummary {
        company: group.company.clone(),
        round_count: rounds.len(),
        total_invested,
        total_value,
        first_valuation,
        last_valuation,
        first_date,
        last_date,
        round_increase,
        dilution_increase,
    }
}

fn compare_multiples(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Adds up a set of company summaries.
pub fn portfolio_totals(summaries: &[CompanySummary]) -> PortfolioTotals {
    let total_invested: Decimal = summaries.iter().map(|s| s.total_invested).sum();
    let total_value: Decimal = summaries.iter().map(|s| s.total_value).sum();
    PortfolioTotals {
        company_count: summaries.len(),
        total_invested,
        total_value,
        multiple: safe_div(total_value, total_invested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::RoundRecord;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn round(
        company: &str,
        sequence: u32,
        post_money: Option<Decimal>,
        invested: Option<Decimal>,
        value: Decimal,
    ) -> RoundRecord {
        let mut r = RoundRecord::new(company, sequence, "Round");
        r.post_money = post_money;
        r.invested = invested;
        r.increase_value = value;
        r
    }

    #[test]
    fn test_single_round_has_unit_round_increase() {
        let table = RoundTable::new(vec![round("Acme", 1, Some(dec!(500)), Some(dec!(10)), dec!(10))]);
        let summaries = summarize(&table);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].round_count, 1);
        assert_eq!(summaries[0].round_increase, Some(dec!(1)));
        assert_eq!(summaries[0].dilution_increase, Some(dec!(1)));
    }

    #[test]
    fn test_zero_invested_has_undefined_dilution_increase() {
        let table = RoundTable::new(vec![round("Acme", 1, Some(dec!(500)), None, Decimal::ZERO)]);
        let summaries = summarize(&table);
        assert_eq!(summaries[0].total_invested, Decimal::ZERO);
        assert_eq!(summaries[0].dilution_increase, None);
    }

    #[test]
    fn test_first_and_last_known_values_in_sequence_order() {
        let mut late = round("Acme", 3, Some(dec!(3000)), None, Decimal::ZERO);
        late.date = NaiveDate::from_ymd_opt(2023, 6, 1);
        let mut early = round("Acme", 1, Some(dec!(1000)), Some(dec!(100)), dec!(250));
        early.date = NaiveDate::from_ymd_opt(2020, 1, 1);
        let middle = round("Acme", 2, None, Some(dec!(50)), dec!(50));

        let summaries = summarize(&RoundTable::new(vec![late, early, middle]));
        let acme = &summaries[0];

        assert_eq!(acme.round_count, 3);
        assert_eq!(acme.total_invested, dec!(150));
        assert_eq!(acme.total_value, dec!(300));
        assert_eq!(acme.first_valuation, Some(dec!(1000)));
        assert_eq!(acme.last_valuation, Some(dec!(3000)));
        assert_eq!(acme.round_increase, Some(dec!(3)));
        assert_eq!(acme.dilution_increase, Some(dec!(2)));
        assert_eq!(acme.first_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(acme.last_date, NaiveDate::from_ymd_opt(2023, 6, 1));
    }

    #[test]
    fn test_zero_first_valuation_is_undefined() {
        let table = RoundTable::new(vec![
            round("Acme", 1, Some(Decimal::ZERO), None, Decimal::ZERO),
            round("Acme", 2, Some(dec!(10)), None, Decimal::ZERO),
        ]);
        assert_eq!(summarize(&table)[0].round_increase, None);
    }

    #[test]
    fn test_sorted_by_dilution_increase_with_undefined_last() {
        let table = RoundTable::new(vec![
            round("Undefined", 1, None, None, Decimal::ZERO),
            round("Low", 1, None, Some(dec!(10)), dec!(10)),
            round("High", 1, None, Some(dec!(10)), dec!(50)),
            round("AlsoLow", 1, None, Some(dec!(20)), dec!(20)),
            round("Total", 1, None, Some(dec!(99)), dec!(999)),
        ]);
        let names: Vec<String> = summarize(&table).into_iter().map(|s| s.company).collect();
        assert_eq!(names, vec!["High", "Low", "AlsoLow", "Undefined"]);
    }

    #[test]
    fn test_portfolio_totals() {
        let table = RoundTable::new(vec![
            round("Acme", 1, None, Some(dec!(100)), dec!(300)),
            round("Beta", 1, None, Some(dec!(100)), dec!(100)),
        ]);
        let totals = portfolio_totals(&summarize(&table));
        assert_eq!(totals.company_count, 2);
        assert_eq!(totals.total_invested, dec!(200));
        assert_eq!(totals.total_value, dec!(400));
        assert_eq!(totals.multiple, Some(dec!(2)));

        assert_eq!(portfolio_totals(&[]).multiple, None);
    }
}
