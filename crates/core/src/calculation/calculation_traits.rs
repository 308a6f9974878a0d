//! Round calculation service trait.

use super::calculation_model::CalculationResult;
use crate::changes::ChangeReportingMode;
use crate::rounds::RoundTable;
use crate::summary::CompanySummary;

/// Entry points of the calculation pipeline.
///
/// Every method takes a snapshot and returns new data; the input table is
/// never modified.
pub trait RoundCalculationServiceTrait: Send + Sync {
    /// Runs inference, dependent metrics and value appreciation.
    ///
    /// When `mode` is not `None` the changes between `table` and the result
    /// are reported through the service's event sink.
    fn apply_calculations(&self, table: &RoundTable, mode: ChangeReportingMode)
        -> CalculationResult;

    /// Recomputes only the appreciated value of each investment.
    fn compute_value_appreciation(&self, table: &RoundTable) -> RoundTable;

    /// One summary per company, best dilution multiple first.
    fn summarize(&self, table: &RoundTable) -> Vec<CompanySummary>;
}
