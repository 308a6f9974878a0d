//! Round-over-round growth and estimated dilution, computed per company.

use log::{debug, warn};
use rust_decimal::Decimal;

use super::calculation_model::{
    CalculationConfig, CalculationIssueKind, CalculationWarning, PredecessorSource,
};
use super::company_resolver::CompanyGroup;
use crate::constants::FIRST_ROUND_SEQUENCE;
use crate::rounds::RoundRecord;
use crate::utils::{positive, safe_div};

/// Second pass over one company's rounds, after field inference.
///
/// `entered` and `inferred` hold the company's rounds in the order of
/// `group.positions`. Rounds are processed left to right, so an adjustment
/// sees the dilution already computed for every round before it.
pub fn apply_dependent_metrics(
    group: &CompanyGroup,
    entered: &[RoundRecord],
    inferred: Vec<RoundRecord>,
    config: &CalculationConfig,
    warnings: &mut Vec<CalculationWarning>,
) -> Vec<RoundRecord> {
    let mut processed: Vec<RoundRecord> = Vec::with_capacity(inferred.len());

    for mut round in inferred {
        let index = processed.len();

        if round.is_adjustment() && index == 0 {
            push_warning(
                warnings,
                CalculationIssueKind::StructuralViolation,
                &round,
                "Adjustment round has no earlier rounds to reconcile against; stated value kept",
            );
            processed.push(round);
            continue;
        }

        if round.sequence <= FIRST_ROUND_SEQUENCE {
            processed.push(round);
            continue;
        }

        let Some(previous_index) = group.index_of(round.sequence - 1) else {
            push_warning(
                warnings,
                CalculationIssueKind::UnresolvableReference,
                &round,
                format!("Round #{} not found", round.sequence - 1),
            );
            processed.push(round);
            continue;
        };

        let previous = match config.predecessor_source {
            PredecessorSource::Inferred => processed.get(previous_index),
            PredecessorSource::AsEntered => entered.get(previous_index),
        };
        let previous_post_money = previous.and_then(|p| positive(p.post_money));

        if let (Some(post_money), Some(previous_post_money)) =
            (round.post_money, previous_post_money)
        {
            round.round_over_round_increase = safe_div(post_money, previous_post_money);
            debug!(
                "{}: round over round increase {:?}",
                round.key(),
                round.round_over_round_increase
            );
        }

        if round.is_adjustment() {
            reconcile_adjustment(&mut round, &processed, warnings);
        } else if let (Some(increase), Some(ownership)) =
            (round.round_over_round_increase, round.round_ownership)
        {
            round.dilution_estimate = increase.checked_mul(Decimal::ONE - ownership);
            debug!("{}: dilution estimate {:?}", round.key(), round.dilution_estimate);
        }

        processed.push(round);
    }

    processed
}

/// Treats the stated dilution as a cumulative target and back-solves the
/// factor this round alone contributes.
fn reconcile_adjustment(
    round: &mut RoundRecord,
    earlier: &[RoundRecord],
    warnings: &mut Vec<CalculationWarning>,
) {
    let Some(target) = round.dilution_estimate else {
        return;
    };

    let product = earlier
        .iter()
        .filter(|r| r.sequence != FIRST_ROUND_SEQUENCE)
        .filter_map(|r| r.dilution_estimate)
        .try_fold(Decimal::ONE, |acc, d| acc.checked_mul(d));

    match product.and_then(|p| safe_div(target, p)) {
        Some(factor) => {
            debug!(
                "{}: adjustment target {} reconciled to {}",
                round.key(),
                target,
                factor
            );
            round.dilution_estimate = Some(factor);
        }
        None => {
            round.dilution_estimate = None;
            push_warning(
                warnings,
                CalculationIssueKind::DegenerateArithmetic,
                round,
                "Product of earlier dilution estimates is zero; adjustment is undefined",
            );
        }
    }
}

fn push_warning(
    warnings: &mut Vec<CalculationWarning>,
    kind: CalculationIssueKind,
    round: &RoundRecord,
    message: impl Into<String>,
) {
    let warning = CalculationWarning::new(kind, round.company.clone(), Some(round.sequence), message);
    warn!("{}", warning);
    warnings.push(warning);
}
