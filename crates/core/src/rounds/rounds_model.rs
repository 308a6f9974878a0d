//! Funding round domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{ADJUSTMENT_ROUND_NAME, ESTIMATED_FLAG, TOTAL_COMPANY_NAME};

/// Kind of funding round.
///
/// Only adjustment rounds get special treatment; every other label in the
/// `Round Name` column ("Seed", "Series A", ...) is a normal round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundKind {
    #[default]
    Normal,
    /// Synthetic round whose stated dilution is a cumulative target
    Adjustment,
}

impl RoundKind {
    /// Derives the kind from a round label.
    pub fn from_round_name(name: &str) -> Self {
        if name.trim() == ADJUSTMENT_ROUND_NAME {
            RoundKind::Adjustment
        } else {
            RoundKind::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundKind::Normal => "NORMAL",
            RoundKind::Adjustment => "ADJUSTMENT",
        }
    }
}

/// Whether a round's monetary fields were reported or approximated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Estimation {
    #[default]
    Known,
    Estimated,
}

impl Estimation {
    /// Parses the `Estimated` column. Only `Y` (any case) marks an estimate.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case(ESTIMATED_FLAG) {
            Estimation::Estimated
        } else {
            Estimation::Known
        }
    }

    /// Value written back to the `Estimated` column.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Estimation::Known => "",
            Estimation::Estimated => ESTIMATED_FLAG,
        }
    }
}

/// Identity of a round: company plus sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundKey {
    pub company: String,
    pub sequence: u32,
}

impl std::fmt::Display for RoundKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} round #{}", self.company, self.sequence)
    }
}

/// One funding event for one company.
///
/// Unknown values are `None`. Derived fields are filled in by the calculation
/// pipeline, which always produces new records instead of editing these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub company: String,
    pub sequence: u32,
    pub round_name: String,
    pub kind: RoundKind,
    pub estimation: Estimation,
    pub premoney: Option<Decimal>,
    pub total_invested: Option<Decimal>,
    pub post_money: Option<Decimal>,
    /// Amount invested by the tracked holder
    pub invested: Option<Decimal>,
    /// Fraction of the company sold in this round
    pub round_ownership: Option<Decimal>,
    /// Fraction of the company held by the tracked holder after this round
    pub my_ownership: Option<Decimal>,
    pub round_over_round_increase: Option<Decimal>,
    pub dilution_estimate: Option<Decimal>,
    /// Value of `invested` after compounding every later dilution factor
    pub increase_value: Decimal,
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RoundRecord {
    /// Creates a round with every numeric field unknown.
    pub fn new(company: impl Into<String>, sequence: u32, round_name: impl Into<String>) -> Self {
        let round_name = round_name.into();
        Self {
            company: company.into(),
            sequence,
            kind: RoundKind::from_round_name(&round_name),
            round_name,
            estimation: Estimation::Known,
            premoney: None,
            total_invested: None,
            post_money: None,
            invested: None,
            round_ownership: None,
            my_ownership: None,
            round_over_round_increase: None,
            dilution_estimate: None,
            increase_value: Decimal::ZERO,
            date: None,
            notes: None,
        }
    }

    pub fn key(&self) -> RoundKey {
        RoundKey {
            company: self.company.clone(),
            sequence: self.sequence,
        }
    }

    pub fn is_adjustment(&self) -> bool {
        self.kind == RoundKind::Adjustment
    }

    pub fn is_estimated(&self) -> bool {
        self.estimation == Estimation::Estimated
    }

    /// Rows of the legacy `Total` aggregate are never part of a company.
    pub fn is_total_marker(&self) -> bool {
        self.company == TOTAL_COMPANY_NAME
    }
}

/// The working table: every round in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundTable {
    rounds: Vec<RoundRecord>,
}

impl RoundTable {
    pub fn new(rounds: Vec<RoundRecord>) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn into_rounds(self) -> Vec<RoundRecord> {
        self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RoundRecord> {
        self.rounds.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RoundRecord> {
        self.rounds.get(index)
    }

    /// First round matching the given company and sequence.
    pub fn find(&self, company: &str, sequence: u32) -> Option<&RoundRecord> {
        self.rounds
            .iter()
            .find(|r| r.company == company && r.sequence == sequence)
    }

    /// Company names in order of first appearance, without the `Total` marker.
    pub fn company_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for round in self.rounds.iter().filter(|r| !r.is_total_marker()) {
            if !names.iter().any(|n| n == &round.company) {
                names.push(round.company.clone());
            }
        }
        names
    }

    /// Rounds of one company sorted by sequence.
    pub fn rounds_for(&self, company: &str) -> Vec<&RoundRecord> {
        let mut rounds: Vec<&RoundRecord> =
            self.rounds.iter().filter(|r| r.company == company).collect();
        rounds.sort_by_key(|r| r.sequence);
        rounds
    }

    /// Sequence number the next round of `company` would get.
    pub fn next_sequence_for(&self, company: &str) -> u32 {
        self.rounds
            .iter()
            .filter(|r| r.company == company)
            .map(|r| r.sequence)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Returns a copy of the table with a blank round appended.
    ///
    /// Without an explicit company the new round belongs to the company of the
    /// last row, which is how rows are usually added while editing a company.
    pub fn with_new_round(&self, company: Option<&str>, date: NaiveDate) -> RoundTable {
        let company = company
            .map(str::to_string)
            .or_else(|| self.rounds.last().map(|r| r.company.clone()))
            .unwrap_or_default();
        let sequence = self.next_sequence_for(&company);

        let mut round = RoundRecord::new(company, sequence, "");
        round.date = Some(date);

        let mut rounds = self.rounds.clone();
        rounds.push(round);
        RoundTable::new(rounds)
    }
}

impl FromIterator<RoundRecord> for RoundTable {
    fn from_iter<I: IntoIterator<Item = RoundRecord>>(iter: I) -> Self {
        RoundTable::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RoundTable {
    type Item = &'a RoundRecord;
    type IntoIter = std::slice::Iter<'a, RoundRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rounds.iter()
    }
}
