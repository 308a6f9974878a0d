//! Calculation domain models: configuration, warnings and pass results.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::Error;
use crate::rounds::RoundTable;

/// Where the dependent metrics pass reads a round's predecessor from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredecessorSource {
    /// The predecessor after field inference. Makes a pass idempotent.
    #[default]
    Inferred,
    /// The predecessor as entered, before inference. Legacy sheet behavior.
    AsEntered,
}

impl PredecessorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredecessorSource::Inferred => "inferred",
            PredecessorSource::AsEntered => "as_entered",
        }
    }
}

impl FromStr for PredecessorSource {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inferred" => Ok(PredecessorSource::Inferred),
            "as_entered" | "as-entered" => Ok(PredecessorSource::AsEntered),
            other => Err(Error::InvalidConfigValue(format!(
                "unknown predecessor source '{}'",
                other
            ))),
        }
    }
}

/// Options for a recalculation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationConfig {
    pub predecessor_source: PredecessorSource,
}

/// Category of a recoverable problem found during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationIssueKind {
    /// A cell could not be coerced to its type and was replaced by unknown
    MalformedInput,
    /// The round before this one does not exist for the company
    UnresolvableReference,
    /// A division had a zero denominator; the result is undefined
    DegenerateArithmetic,
    /// Duplicate rounds, or an adjustment with nothing before it
    StructuralViolation,
}

impl CalculationIssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationIssueKind::MalformedInput => "MALFORMED_INPUT",
            CalculationIssueKind::UnresolvableReference => "UNRESOLVABLE_REFERENCE",
            CalculationIssueKind::DegenerateArithmetic => "DEGENERATE_ARITHMETIC",
            CalculationIssueKind::StructuralViolation => "STRUCTURAL_VIOLATION",
        }
    }
}

impl std::fmt::Display for CalculationIssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A problem that was recovered from at round or company granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationWarning {
    pub kind: CalculationIssueKind,
    pub company: String,
    pub sequence: Option<u32>,
    pub message: String,
}

impl CalculationWarning {
    pub fn new(
        kind: CalculationIssueKind,
        company: impl Into<String>,
        sequence: Option<u32>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            company: company.into(),
            sequence,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CalculationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sequence {
            Some(sequence) => write!(
                f,
                "[{}] {} round #{}: {}",
                self.kind, self.company, sequence, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.kind, self.company, self.message),
        }
    }
}

/// Result of a recalculation pass.
///
/// The table is always returned, even when some companies could not be
/// recalculated; the warnings say which ones and why.
#[derive(Debug, Clone)]
pub struct CalculationResult {
    pub table: RoundTable,
    pub warnings: Vec<CalculationWarning>,
}

impl CalculationResult {
    pub fn new(table: RoundTable) -> Self {
        Self {
            table,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(table: RoundTable, warnings: Vec<CalculationWarning>) -> Self {
        Self { table, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings attached to one company.
    pub fn warnings_for(&self, company: &str) -> Vec<&CalculationWarning> {
        self.warnings.iter().filter(|w| w.company == company).collect()
    }
}
