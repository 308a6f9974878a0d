//! Fills in missing monetary and ownership fields of a single round.

use log::debug;
use rust_decimal::Decimal;

use crate::rounds::RoundRecord;
use crate::utils::{is_blank, positive, safe_div};

/// Derives whatever fields of `round` follow from the ones already known.
///
/// Steps run in order and each one sees the results of the previous ones:
///
/// 1. An adjustment round with a stated dilution is authoritative and is
///    returned untouched.
/// 2. Estimated rounds derive post money from the amount raised and the
///    ownership sold, or the amount raised from post money.
/// 3. `post_money = premoney + total_invested` when post money is blank.
/// 4. Otherwise `premoney = post_money - total_invested` when premoney is blank.
/// 5. `round_ownership = total_invested / post_money`, always recomputed.
/// 6. `my_ownership = invested / post_money`.
///
/// Targets count as blank when unknown or zero.
pub fn infer_round(round: &RoundRecord) -> RoundRecord {
    let mut inferred = round.clone();

    if inferred.is_adjustment() && !is_blank(inferred.dilution_estimate) {
        debug!(
            "{}: stated adjustment dilution kept, inference skipped",
            inferred.key()
        );
        return inferred;
    }

    if inferred.is_estimated() {
        infer_estimated_amounts(&mut inferred);
    }

    match (inferred.premoney, inferred.total_invested, inferred.post_money) {
        (Some(premoney), Some(total_invested), post_money) if is_blank(post_money) => {
            let post_money = premoney + total_invested;
            debug!("{}: post money derived as {}", inferred.key(), post_money);
            inferred.post_money = Some(post_money);
        }
        (premoney, Some(total_invested), Some(post_money))
            if is_blank(premoney) && !post_money.is_zero() =>
        {
            let premoney = post_money - total_invested;
            debug!("{}: premoney derived as {}", inferred.key(), premoney);
            inferred.premoney = Some(premoney);
        }
        _ => {}
    }

    if let Some(post_money) = positive(inferred.post_money) {
        if let Some(total_invested) = inferred.total_invested {
            inferred.round_ownership = safe_div(total_invested, post_money);
        }
        if let Some(invested) = inferred.invested {
            inferred.my_ownership = safe_div(invested, post_money);
        }
    }

    inferred
}

/// Exactly one direction fires: post money from the amount raised when that
/// is positive, otherwise the amount raised from a positive post money.
fn infer_estimated_amounts(round: &mut RoundRecord) {
    let Some(ownership) = positive(round.round_ownership) else {
        return;
    };

    if let Some(total_invested) = positive(round.total_invested) {
        round.post_money = safe_div(total_invested, ownership);
        debug!(
            "{}: estimated post money {:?} from {} at {}",
            round.key(),
            round.post_money,
            total_invested,
            ownership
        );
    } else if let Some(post_money) = positive(round.post_money) {
        let total_invested: Decimal = post_money * ownership;
        debug!(
            "{}: estimated total invested {} from {} at {}",
            round.key(),
            total_invested,
            post_money,
            ownership
        );
        round.total_invested = Some(total_invested);
    }
}
