//! Event sink that prints change reports to the terminal.

use std::io::Write;
use std::sync::Mutex;

use roundcalc_core::changes::{CompanyChangeSummary, HighlightRow};
use roundcalc_core::events::{CalculationEvent, CalculationEventSink};

use crate::format::format_field;

/// Writes change views to stdout. Warnings already reach stderr through the
/// log subscriber, so they are not printed again here.
pub struct ConsoleEventSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn write_lines(&self, lines: Vec<String>) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for line in lines {
            if let Err(e) = writeln!(out, "{}", line) {
                tracing::warn!("Failed to write change report: {}", e);
                return;
            }
        }
    }
}

impl CalculationEventSink for ConsoleEventSink {
    fn emit(&self, event: CalculationEvent) {
        match event {
            CalculationEvent::WarningRaised { .. } => {}
            CalculationEvent::ChangesHighlighted { rows } => self.write_lines(highlight_lines(&rows)),
            CalculationEvent::ChangesSummarized { companies } => {
                self.write_lines(summary_lines(&companies))
            }
            CalculationEvent::RecalculationCompleted {
                companies,
                rounds,
                warnings,
            } => tracing::debug!(companies, rounds, warnings, "Recalculation completed"),
        }
    }
}

pub fn highlight_lines(rows: &[HighlightRow]) -> Vec<String> {
    if rows.is_empty() {
        return vec!["No changes.".to_string()];
    }
    let mut lines = Vec::new();
    for row in rows {
        lines.push(format!("{} round #{}", row.company, row.sequence));
        for cell in &row.updated {
            let stale = row
                .original
                .iter()
                .find(|o| o.field == cell.field)
                .map(|o| format!("[stale] {} ", format_field(o.field, o.value)))
                .unwrap_or_default();
            lines.push(format!(
                "  {:<24} {}[new] {}",
                cell.field.label(),
                stale,
                format_field(cell.field, cell.value)
            ));
        }
    }
    lines
}

pub fn summary_lines(companies: &[CompanyChangeSummary]) -> Vec<String> {
    if companies.is_empty() {
        return vec!["No changes.".to_string()];
    }
    let mut lines = Vec::new();
    for company in companies {
        lines.push(format!("{}:", company.company));
        for round in &company.rounds {
            lines.push(format!("  Round {}: {}", round.sequence, round.text));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundcalc_core::calculation::{CalculationIssueKind, CalculationWarning};
    use roundcalc_core::changes::{CellStyle, HighlightCell, RoundChangeSummary, TrackedField};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_warnings_are_left_to_the_log() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleEventSink::new(Box::new(buffer.clone()));

        sink.emit(CalculationEvent::WarningRaised {
            warning: CalculationWarning::new(
                CalculationIssueKind::UnresolvableReference,
                "Acme",
                Some(2),
                "Round #1 not found",
            ),
        });
        assert_eq!(buffer.text(), "");

        sink.emit(CalculationEvent::ChangesSummarized { companies: vec![] });
        assert_eq!(buffer.text(), "No changes.\n");
    }

    #[test]
    fn test_highlight_lines_pair_stale_and_new() {
        let rows = vec![HighlightRow {
            company: "Acme".to_string(),
            sequence: 2,
            original: vec![HighlightCell {
                field: TrackedField::PostMoney,
                value: Some(dec!(900)),
                style: CellStyle::Stale,
            }],
            updated: vec![
                HighlightCell {
                    field: TrackedField::PostMoney,
                    value: Some(dec!(1000)),
                    style: CellStyle::New,
                },
                HighlightCell {
                    field: TrackedField::RoundOwnership,
                    value: Some(dec!(0.2)),
                    style: CellStyle::New,
                },
            ],
        }];

        let lines = highlight_lines(&rows);
        assert_eq!(lines[0], "Acme round #2");
        assert!(lines[1].contains("[stale] $900 [new] $1,000"));
        assert!(lines[2].ends_with("[new] 20.00%"));
    }

    #[test]
    fn test_summary_lines() {
        let companies = vec![CompanyChangeSummary {
            company: "Acme".to_string(),
            rounds: vec![RoundChangeSummary {
                sequence: 1,
                text: "Post Money: n/a -> 1000".to_string(),
            }],
        }];
        assert_eq!(
            summary_lines(&companies),
            vec!["Acme:", "  Round 1: Post Money: n/a -> 1000"]
        );
        assert_eq!(summary_lines(&[]), vec!["No changes."]);
    }
}
