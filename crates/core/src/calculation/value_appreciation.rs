//! Compounds later dilution factors onto each investment.

use log::{debug, warn};
use rust_decimal::Decimal;

use super::calculation_model::{CalculationIssueKind, CalculationWarning};
use super::company_resolver::resolve_companies;
use crate::rounds::{RoundRecord, RoundTable};
use crate::utils::positive;

/// Sets `increase_value` for one company's rounds, given in sequence order.
///
/// Each investment is multiplied by the dilution estimate of every later
/// round. Unknown estimates leave the multiplier unchanged. Rounds without a
/// positive investment get zero. A product that overflows leaves the value at
/// zero and raises a `DegenerateArithmetic` warning.
pub fn appreciate_company(
    rounds: &[RoundRecord],
    warnings: &mut Vec<CalculationWarning>,
) -> Vec<RoundRecord> {
    // suffix[i] = product of dilution estimates of rounds after i, None once it overflows
    let mut suffix = vec![Some(Decimal::ONE); rounds.len()];
    for i in (0..rounds.len().saturating_sub(1)).rev() {
        let factor = rounds[i + 1].dilution_estimate.unwrap_or(Decimal::ONE);
        suffix[i] = suffix[i + 1].and_then(|product| product.checked_mul(factor));
    }

    rounds
        .iter()
        .zip(suffix)
        .map(|(round, multiplier)| {
            let mut appreciated = round.clone();
            appreciated.increase_value = Decimal::ZERO;

            let Some(invested) = positive(round.invested) else {
                return appreciated;
            };
            match multiplier.and_then(|m| invested.checked_mul(m)) {
                Some(value) => {
                    appreciated.increase_value = value;
                    debug!("{}: increase value {}", appreciated.key(), value);
                }
                None => {
                    let warning = CalculationWarning::new(
                        CalculationIssueKind::DegenerateArithmetic,
                        round.company.clone(),
                        Some(round.sequence),
                        "Compounded dilution overflows; increase value left at 0",
                    );
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
            appreciated
        })
        .collect()
}

/// Recomputes `increase_value` for every company of the table.
///
/// Row order is preserved. `Total` rows and companies with duplicate round
/// numbers pass through unchanged. Overflow warnings are logged.
pub fn compute_value_appreciation(table: &RoundTable) -> RoundTable {
    let resolved = resolve_companies(table);
    let mut rounds = table.rounds().to_vec();
    let mut warnings = Vec::new();

    for group in resolved.valid_groups() {
        let appreciated = appreciate_company(&group.collect_rounds(table), &mut warnings);
        for (position, round) in group.positions.iter().zip(appreciated) {
            rounds[*position] = round;
        }
    }

    RoundTable::new(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn round(company: &str, sequence: u32, invested: Option<Decimal>, dilution: Option<Decimal>) -> RoundRecord {
        let mut r = RoundRecord::new(company, sequence, "Round");
        r.invested = invested;
        r.dilution_estimate = dilution;
        r
    }

    #[test]
    fn test_dilution_compounds_over_later_rounds() {
        let rounds = vec![
            round("Acme", 1, Some(dec!(100)), None),
            round("Acme", 2, None, Some(dec!(0.9))),
            round("Acme", 3, None, Some(dec!(0.8))),
        ];
        let out = appreciate_company(&rounds, &mut Vec::new());
        assert_eq!(out[0].increase_value, dec!(72));
        assert_eq!(out[1].increase_value, Decimal::ZERO);
        assert_eq!(out[2].increase_value, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_dilution_is_a_no_op() {
        let rounds = vec![
            round("Acme", 1, Some(dec!(100)), None),
            round("Acme", 2, Some(dec!(50)), None),
            round("Acme", 3, None, Some(dec!(2))),
        ];
        let out = appreciate_company(&rounds, &mut Vec::new());
        assert_eq!(out[0].increase_value, dec!(200));
        assert_eq!(out[1].increase_value, dec!(100));
    }

    #[test]
    fn test_last_round_investment_keeps_its_value() {
        let rounds = vec![
            round("Acme", 1, None, Some(dec!(3))),
            round("Acme", 2, Some(dec!(40)), Some(dec!(5))),
        ];
        let out = appreciate_company(&rounds, &mut Vec::new());
        assert_eq!(out[1].increase_value, dec!(40));
    }

    #[test]
    fn test_non_positive_investment_resets_value() {
        let mut stale = round("Acme", 1, Some(dec!(-10)), None);
        stale.increase_value = dec!(99);
        let out = appreciate_company(&[stale], &mut Vec::new());
        assert_eq!(out[0].increase_value, Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_product_is_reported_not_guessed() {
        let rounds = vec![
            round("Acme", 1, Some(dec!(10)), None),
            round("Acme", 2, Some(dec!(5)), Some(Decimal::MAX)),
            round("Acme", 3, None, Some(dec!(2))),
        ];
        let mut warnings = Vec::new();
        let out = appreciate_company(&rounds, &mut warnings);

        assert_eq!(out[0].increase_value, Decimal::ZERO);
        assert_eq!(out[1].increase_value, dec!(10));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, CalculationIssueKind::DegenerateArithmetic);
        assert_eq!(warnings[0].sequence, Some(1));
    }

    #[test]
    fn test_table_keeps_row_order_and_companies_apart() {
        let table = RoundTable::new(vec![
            round("Acme", 2, None, Some(dec!(2))),
            round("Beta", 1, Some(dec!(10)), None),
            round("Acme", 1, Some(dec!(100)), None),
            round("Beta", 2, None, Some(dec!(3))),
            round("Total", 1, Some(dec!(1)), None),
        ]);
        let out = compute_value_appreciation(&table);

        assert_eq!(out.len(), 5);
        assert_eq!(out.get(2).unwrap().company, "Acme");
        assert_eq!(out.get(2).unwrap().increase_value, dec!(200));
        assert_eq!(out.get(1).unwrap().increase_value, dec!(30));
        assert_eq!(out.get(4).unwrap().increase_value, Decimal::ZERO);
    }

    #[test]
    fn test_empty_table() {
        assert!(compute_value_appreciation(&RoundTable::default()).is_empty());
    }
}
