use log::{debug, info};
use std::sync::Arc;

use super::calculation_model::{CalculationConfig, CalculationResult};
use super::calculation_traits::RoundCalculationServiceTrait;
use super::company_resolver::resolve_companies;
use super::dependent_metrics::apply_dependent_metrics;
use super::field_inference::infer_round;
use super::value_appreciation::{appreciate_company, compute_value_appreciation};
use crate::changes::{build_change_view, ChangeReportingMode, ChangeView};
use crate::events::{CalculationEvent, CalculationEventSink, NoOpCalculationEventSink};
use crate::rounds::{RoundRecord, RoundTable};
use crate::summary::{summarize, CompanySummary};

/// Runs one full recalculation pass over `table`.
///
/// Each company is folded left to right in sequence order: every round is
/// inferred, then dependent metrics run over the inferred rounds, then value
/// appreciation compounds the resulting dilution. Row order and row count of
/// the input are preserved. Companies with structural problems keep their
/// rows as entered and are listed in the warnings.
pub fn apply_calculations(table: &RoundTable, config: &CalculationConfig) -> CalculationResult {
    let resolved = resolve_companies(table);
    let mut warnings = resolved.warnings.clone();
    let mut rounds = table.rounds().to_vec();

    for group in resolved.valid_groups() {
        let entered = group.collect_rounds(table);
        let inferred: Vec<RoundRecord> = entered.iter().map(infer_round).collect();
        let with_metrics = apply_dependent_metrics(group, &entered, inferred, config, &mut warnings);
        let appreciated = appreciate_company(&with_metrics, &mut warnings);

        debug!("Recalculated {} ({} rounds)", group.company, group.len());
        for (position, round) in group.positions.iter().zip(appreciated) {
            rounds[*position] = round;
        }
    }

    CalculationResult::with_warnings(RoundTable::new(rounds), warnings)
}

/// Calculation service wired with a configuration and an event sink.
pub struct RoundCalculationService {
    config: CalculationConfig,
    event_sink: Arc<dyn CalculationEventSink>,
}

impl RoundCalculationService {
    pub fn new(config: CalculationConfig, event_sink: Arc<dyn CalculationEventSink>) -> Self {
        Self { config, event_sink }
    }

    /// A service that discards its events.
    pub fn without_events(config: CalculationConfig) -> Self {
        Self::new(config, Arc::new(NoOpCalculationEventSink))
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }
}

impl Default for RoundCalculationService {
    fn default() -> Self {
        Self::without_events(CalculationConfig::default())
    }
}

impl RoundCalculationServiceTrait for RoundCalculationService {
    fn apply_calculations(
        &self,
        table: &RoundTable,
        mode: ChangeReportingMode,
    ) -> CalculationResult {
        let result = apply_calculations(table, &self.config);

        let mut events: Vec<CalculationEvent> = result
            .warnings
            .iter()
            .cloned()
            .map(CalculationEvent::warning_raised)
            .collect();

        match build_change_view(mode, table, &result.table) {
            Some(ChangeView::Highlight(rows)) => {
                events.push(CalculationEvent::ChangesHighlighted { rows })
            }
            Some(ChangeView::Summary(companies)) => {
                events.push(CalculationEvent::ChangesSummarized { companies })
            }
            None => {}
        }

        let companies = result.table.company_names().len();
        info!(
            "Recalculated {} companies, {} rounds, {} warnings",
            companies,
            result.table.len(),
            result.warnings.len()
        );
        events.push(CalculationEvent::recalculation_completed(
            companies,
            result.table.len(),
            result.warnings.len(),
        ));
        self.event_sink.emit_batch(events);

        result
    }

    fn compute_value_appreciation(&self, table: &RoundTable) -> RoundTable {
        compute_value_appreciation(table)
    }

    fn summarize(&self, table: &RoundTable) -> Vec<CompanySummary> {
        summarize(table)
    }
}
