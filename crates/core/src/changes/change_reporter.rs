//! Diffs an as-entered snapshot against its recalculated counterpart.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::change_model::{
    CellStyle, ChangeReport, ChangeReportingMode, ChangeStatus, ChangeView, CompanyChangeSummary,
    FieldChange, HighlightCell, HighlightRow, RoundChangeSummary, RoundChanges, TrackedField,
};
use crate::constants::{
    CHANGE_PERCENT_DECIMALS, SMALL_CHANGE_DECIMALS, SMALL_CHANGE_THRESHOLD_PCT,
};
use crate::rounds::{RoundRecord, RoundTable};
use crate::utils::approx_eq;

/// Lists every tracked cell whose post value is present and differs from the
/// pre value. Rounds are joined by `(company, sequence)` and reported in the
/// order of `post`.
pub fn diff_tables(pre: &RoundTable, post: &RoundTable) -> ChangeReport {
    let mut before: HashMap<(&str, u32), &RoundRecord> = HashMap::with_capacity(pre.len());
    for round in pre.iter() {
        before
            .entry((round.company.as_str(), round.sequence))
            .or_insert(round);
    }

    let rounds = post
        .iter()
        .filter(|round| !round.is_total_marker())
        .filter_map(|round| {
            let original = before.get(&(round.company.as_str(), round.sequence)).copied();
            let changes = diff_round(original, round);
            (!changes.is_empty()).then(|| RoundChanges {
                company: round.company.clone(),
                sequence: round.sequence,
                changes,
            })
        })
        .collect();

    ChangeReport { rounds }
}

fn diff_round(pre: Option<&RoundRecord>, post: &RoundRecord) -> Vec<FieldChange> {
    TrackedField::ALL
        .iter()
        .filter_map(|field| {
            let new = field.value_of(post)?;
            let old = pre.and_then(|round| field.value_of(round));
            let status = match old {
                None => ChangeStatus::Filled,
                Some(old) if approx_eq(old, new) => return None,
                Some(_) => ChangeStatus::Overwritten,
            };
            Some(FieldChange {
                field: *field,
                status,
                old,
                new,
            })
        })
        .collect()
}

/// Cell view of a report: overwritten originals are stale, every new value is new.
pub fn highlight_view(report: &ChangeReport) -> Vec<HighlightRow> {
    report
        .rounds
        .iter()
        .map(|round| HighlightRow {
            company: round.company.clone(),
            sequence: round.sequence,
            original: round
                .changes
                .iter()
                .filter(|c| c.status == ChangeStatus::Overwritten)
                .map(|c| HighlightCell {
                    field: c.field,
                    value: c.old,
                    style: CellStyle::Stale,
                })
                .collect(),
            updated: round
                .changes
                .iter()
                .map(|c| HighlightCell {
                    field: c.field,
                    value: Some(c.new),
                    style: CellStyle::New,
                })
                .collect(),
        })
        .collect()
}

/// Text view of a report, grouped by company in order of first appearance.
pub fn summarize_changes(report: &ChangeReport) -> Vec<CompanyChangeSummary> {
    let mut summaries: Vec<CompanyChangeSummary> = Vec::new();
    for round in &report.rounds {
        let entry = RoundChangeSummary {
            sequence: round.sequence,
            text: round
                .changes
                .iter()
                .map(format_change)
                .collect::<Vec<_>>()
                .join("; "),
        };
        match summaries.iter_mut().find(|s| s.company == round.company) {
            Some(summary) => summary.rounds.push(entry),
            None => summaries.push(CompanyChangeSummary {
                company: round.company.clone(),
                rounds: vec![entry],
            }),
        }
    }
    summaries
}

/// Formats one change as `field: old -> new (pct%)`.
///
/// The percentage always has two decimal places. Values are printed as they
/// are, except for deltas smaller than 0.2% where both sides are fixed to four
/// decimal places so they do not read as `x -> x`. A missing old value prints
/// as `n/a` and a missing or zero old value has no percentage.
pub fn format_change(change: &FieldChange) -> String {
    let pct = change.percent_change();
    let small = matches!(pct, Some(p) if p.abs() < SMALL_CHANGE_THRESHOLD_PCT);
    let value = |v: Decimal| {
        if small {
            fixed(v, SMALL_CHANGE_DECIMALS)
        } else {
            v.normalize().to_string()
        }
    };

    let old = change.old.map_or_else(|| "n/a".to_string(), value);
    let mut text = format!("{}: {} -> {}", change.field.label(), old, value(change.new));
    if let Some(pct) = pct {
        text.push_str(&format!(" ({}%)", fixed(pct, CHANGE_PERCENT_DECIMALS)));
    }
    text
}

fn fixed(value: Decimal, decimals: usize) -> String {
    format!("{:.*}", decimals, value.round_dp(decimals as u32))
}

/// Builds the view for `mode`, or nothing when reporting is off.
pub fn build_change_view(
    mode: ChangeReportingMode,
    pre: &RoundTable,
    post: &RoundTable,
) -> Option<ChangeView> {
    match mode {
        ChangeReportingMode::None => None,
        ChangeReportingMode::Highlight => {
            Some(ChangeView::Highlight(highlight_view(&diff_tables(pre, post))))
        }
        ChangeReportingMode::Summary => {
            Some(ChangeView::Summary(summarize_changes(&diff_tables(pre, post))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn round(company: &str, sequence: u32) -> RoundRecord {
        RoundRecord::new(company, sequence, "Round")
    }

    fn change(field: TrackedField, old: Option<Decimal>, new: Decimal) -> FieldChange {
        FieldChange {
            field,
            status: if old.is_some() {
                ChangeStatus::Overwritten
            } else {
                ChangeStatus::Filled
            },
            old,
            new,
        }
    }

    #[test]
    fn test_diff_classifies_filled_and_overwritten() {
        let mut before = round("Acme", 1);
        before.premoney = Some(dec!(800));
        before.round_ownership = Some(dec!(0.5));
        let mut after = before.clone();
        after.post_money = Some(dec!(1000));
        after.round_ownership = Some(dec!(0.2));

        let report = diff_tables(
            &RoundTable::new(vec![before]),
            &RoundTable::new(vec![after]),
        );

        assert_eq!(report.rounds.len(), 1);
        let changes = &report.rounds[0].changes;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, TrackedField::PostMoney);
        assert_eq!(changes[0].status, ChangeStatus::Filled);
        assert_eq!(changes[1].field, TrackedField::RoundOwnership);
        assert_eq!(changes[1].status, ChangeStatus::Overwritten);
        assert_eq!(report.change_count(), 2);
    }

    #[test]
    fn test_diff_ignores_cleared_and_tolerably_equal_values() {
        let mut before = round("Acme", 1);
        before.dilution_estimate = Some(dec!(0.9));
        before.round_ownership = Some(dec!(0.1));
        let mut after = before.clone();
        after.dilution_estimate = None;
        after.round_ownership = Some(dec!(0.1000000000000001));

        let report = diff_tables(
            &RoundTable::new(vec![before]),
            &RoundTable::new(vec![after]),
        );
        assert!(report.is_empty());
    }

    #[test]
    fn test_diff_joins_by_company_and_sequence() {
        let mut a1 = round("Acme", 1);
        a1.post_money = Some(dec!(100));
        let mut b1 = round("Beta", 1);
        b1.post_money = Some(dec!(200));
        let pre = RoundTable::new(vec![a1.clone(), b1.clone()]);
        let post = RoundTable::new(vec![b1, a1]);

        assert!(diff_tables(&pre, &post).is_empty());
    }

    #[test]
    fn test_diff_skips_total_rows() {
        let mut total = round("Total", 1);
        total.post_money = Some(dec!(1));
        let report = diff_tables(&RoundTable::default(), &RoundTable::new(vec![total]));
        assert!(report.is_empty());
    }

    #[test]
    fn test_format_change_coarse() {
        let text = format_change(&change(TrackedField::PostMoney, Some(dec!(1000)), dec!(1200)));
        assert_eq!(text, "Post Money: 1000 -> 1200 (20.00%)");
    }

    #[test]
    fn test_format_change_small_delta_uses_four_decimals() {
        let text = format_change(&change(TrackedField::Premoney, Some(dec!(1000)), dec!(1001)));
        assert_eq!(text, "Premoney: 1000.0000 -> 1001.0000 (0.10%)");
    }

    #[test]
    fn test_format_change_without_old_value() {
        let text = format_change(&change(TrackedField::RoundOwnership, None, dec!(0.25)));
        assert_eq!(text, "Round Ownership: n/a -> 0.25");

        let text = format_change(&change(TrackedField::DilutionEstimate, Some(Decimal::ZERO), dec!(0.8)));
        assert_eq!(text, "Dilution (est): 0 -> 0.8");
    }

    #[test]
    fn test_summary_groups_rounds_by_company() {
        let report = ChangeReport {
            rounds: vec![
                RoundChanges {
                    company: "Acme".to_string(),
                    sequence: 1,
                    changes: vec![
                        change(TrackedField::Premoney, None, dec!(900)),
                        change(TrackedField::PostMoney, Some(dec!(500)), dec!(1000)),
                    ],
                },
                RoundChanges {
                    company: "Beta".to_string(),
                    sequence: 2,
                    changes: vec![change(TrackedField::PostMoney, None, dec!(5))],
                },
                RoundChanges {
                    company: "Acme".to_string(),
                    sequence: 2,
                    changes: vec![change(TrackedField::PostMoney, None, dec!(7))],
                },
            ],
        };

        let summaries = summarize_changes(&report);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].company, "Acme");
        assert_eq!(summaries[0].rounds.len(), 2);
        assert_eq!(
            summaries[0].rounds[0].text,
            "Premoney: n/a -> 900; Post Money: 500 -> 1000 (100.00%)"
        );
        assert_eq!(summaries[1].rounds[0].sequence, 2);
    }

    #[test]
    fn test_highlight_marks_stale_originals() {
        let report = ChangeReport {
            rounds: vec![RoundChanges {
                company: "Acme".to_string(),
                sequence: 1,
                changes: vec![
                    change(TrackedField::Premoney, None, dec!(900)),
                    change(TrackedField::RoundOwnership, Some(dec!(0.5)), dec!(0.1)),
                ],
            }],
        };

        let rows = highlight_view(&report);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].original.len(), 1);
        assert_eq!(rows[0].original[0].style, CellStyle::Stale);
        assert_eq!(rows[0].original[0].value, Some(dec!(0.5)));
        assert_eq!(rows[0].updated.len(), 2);
        assert!(rows[0].updated.iter().all(|c| c.style == CellStyle::New));
    }

    #[test]
    fn test_build_change_view_respects_mode() {
        let mut after = round("Acme", 1);
        after.post_money = Some(dec!(10));
        let pre = RoundTable::new(vec![round("Acme", 1)]);
        let post = RoundTable::new(vec![after]);

        assert!(build_change_view(ChangeReportingMode::None, &pre, &post).is_none());
        assert!(matches!(
            build_change_view(ChangeReportingMode::Highlight, &pre, &post),
            Some(ChangeView::Highlight(rows)) if rows.len() == 1
        ));
        assert!(matches!(
            build_change_view(ChangeReportingMode::Summary, &pre, &post),
            Some(ChangeView::Summary(s)) if s.len() == 1
        ));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Summary".parse::<ChangeReportingMode>().unwrap(), ChangeReportingMode::Summary);
        assert_eq!("none".parse::<ChangeReportingMode>().unwrap(), ChangeReportingMode::None);
        assert!("loud".parse::<ChangeReportingMode>().is_err());
    }
}
