//! Change report models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::Error;
use crate::rounds::{
    RoundRecord, COLUMN_DILUTION, COLUMN_INCREASE_ROUND, COLUMN_MY_OWNERSHIP, COLUMN_POST_MONEY,
    COLUMN_PREMONEY, COLUMN_ROUND_OWNERSHIP,
};
use crate::utils::percent_change;

/// How a recalculation reports what it changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChangeReportingMode {
    #[default]
    None,
    /// Cell-level view of new values next to stale originals
    Highlight,
    /// Per-company text list of `old -> new` entries
    Summary,
}

impl ChangeReportingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeReportingMode::None => "none",
            ChangeReportingMode::Highlight => "highlight",
            ChangeReportingMode::Summary => "summary",
        }
    }
}

impl FromStr for ChangeReportingMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(ChangeReportingMode::None),
            "highlight" => Ok(ChangeReportingMode::Highlight),
            "summary" => Ok(ChangeReportingMode::Summary),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown change reporting mode '{}'",
                other
            ))),
        }
    }
}

/// Derived fields the change reporter compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackedField {
    Premoney,
    PostMoney,
    RoundOwnership,
    MyOwnership,
    RoundOverRoundIncrease,
    DilutionEstimate,
}

impl TrackedField {
    pub const ALL: [TrackedField; 6] = [
        TrackedField::Premoney,
        TrackedField::PostMoney,
        TrackedField::RoundOwnership,
        TrackedField::MyOwnership,
        TrackedField::RoundOverRoundIncrease,
        TrackedField::DilutionEstimate,
    ];

    /// Column header the field is shown under.
    pub fn label(&self) -> &'static str {
        match self {
            TrackedField::Premoney => COLUMN_PREMONEY,
            TrackedField::PostMoney => COLUMN_POST_MONEY,
            TrackedField::RoundOwnership => COLUMN_ROUND_OWNERSHIP,
            TrackedField::MyOwnership => COLUMN_MY_OWNERSHIP,
            TrackedField::RoundOverRoundIncrease => COLUMN_INCREASE_ROUND,
            TrackedField::DilutionEstimate => COLUMN_DILUTION,
        }
    }

    pub fn value_of(&self, round: &RoundRecord) -> Option<Decimal> {
        match self {
            TrackedField::Premoney => round.premoney,
            TrackedField::PostMoney => round.post_money,
            TrackedField::RoundOwnership => round.round_ownership,
            TrackedField::MyOwnership => round.my_ownership,
            TrackedField::RoundOverRoundIncrease => round.round_over_round_increase,
            TrackedField::DilutionEstimate => round.dilution_estimate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    /// The value was missing before the pass
    Filled,
    /// The value replaced a different one
    Overwritten,
}

/// One changed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: TrackedField,
    pub status: ChangeStatus,
    pub old: Option<Decimal>,
    pub new: Decimal,
}

impl FieldChange {
    /// Percent delta, `None` when there was no old value or it was zero.
    pub fn percent_change(&self) -> Option<Decimal> {
        self.old.and_then(|old| percent_change(old, self.new))
    }
}

/// Changed cells of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundChanges {
    pub company: String,
    pub sequence: u32,
    pub changes: Vec<FieldChange>,
}

/// Every changed cell between two snapshots, in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    pub rounds: Vec<RoundChanges>,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Number of changed cells.
    pub fn change_count(&self) -> usize {
        self.rounds.iter().map(|r| r.changes.len()).sum()
    }
}

/// Display style of a highlighted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStyle {
    /// Original value that was overwritten (orange)
    Stale,
    /// Value produced by the pass (green)
    New,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightCell {
    pub field: TrackedField,
    pub value: Option<Decimal>,
    pub style: CellStyle,
}

/// A changed round shown as original cells followed by updated cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRow {
    pub company: String,
    pub sequence: u32,
    /// Overwritten originals only; filled cells had nothing to go stale
    pub original: Vec<HighlightCell>,
    pub updated: Vec<HighlightCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundChangeSummary {
    pub sequence: u32,
    /// `; `-joined `field: old -> new (pct%)` entries
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyChangeSummary {
    pub company: String,
    pub rounds: Vec<RoundChangeSummary>,
}

/// What the reporter hands to the caller for a given mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "entries", rename_all = "lowercase")]
pub enum ChangeView {
    Highlight(Vec<HighlightRow>),
    Summary(Vec<CompanyChangeSummary>),
}
