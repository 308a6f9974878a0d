//! Calculation event types.

use serde::{Deserialize, Serialize};

use crate::calculation::CalculationWarning;
use crate::changes::{CompanyChangeSummary, HighlightRow};

/// Events emitted by the calculation service while a pass runs.
///
/// The pipeline reports through these unconditionally; what gets shown is up
/// to the sink the caller installs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationEvent {
    /// A recoverable problem was found.
    WarningRaised { warning: CalculationWarning },

    /// Cell-level changes of a pass, for highlight mode.
    ChangesHighlighted { rows: Vec<HighlightRow> },

    /// Per-company change text of a pass, for summary mode.
    ChangesSummarized { companies: Vec<CompanyChangeSummary> },

    /// A recalculation pass finished.
    RecalculationCompleted {
        companies: usize,
        rounds: usize,
        warnings: usize,
    },
}

impl CalculationEvent {
    pub fn warning_raised(warning: CalculationWarning) -> Self {
        Self::WarningRaised { warning }
    }

    pub fn recalculation_completed(companies: usize, rounds: usize, warnings: usize) -> Self {
        Self::RecalculationCompleted {
            companies,
            rounds,
            warnings,
        }
    }
}
