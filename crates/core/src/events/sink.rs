//! Calculation event sink trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard};

use super::CalculationEvent;

/// Receives events from the calculation service.
///
/// `emit()` runs inside a recalculation pass, so implementations must return
/// quickly and must not fail the pass.
pub trait CalculationEventSink: Send + Sync {
    /// Emit a single event.
    fn emit(&self, event: CalculationEvent);

    /// Emit multiple events.
    ///
    /// Default implementation calls `emit()` for each event.
    fn emit_batch(&self, events: Vec<CalculationEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards every event.
#[derive(Clone, Default)]
pub struct NoOpCalculationEventSink;

impl CalculationEventSink for NoOpCalculationEventSink {
    fn emit(&self, _event: CalculationEvent) {}
}

/// Collects emitted events for inspection in tests.
#[derive(Clone, Default)]
pub struct MockCalculationEventSink {
    events: Arc<Mutex<Vec<CalculationEvent>>>,
}

impl MockCalculationEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CalculationEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<CalculationEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl CalculationEventSink for MockCalculationEventSink {
    fn emit(&self, event: CalculationEvent) {
        self.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpCalculationEventSink;
        sink.emit(CalculationEvent::recalculation_completed(1, 1, 0));
        sink.emit_batch(vec![
            CalculationEvent::recalculation_completed(1, 2, 0),
            CalculationEvent::recalculation_completed(1, 3, 0),
        ]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockCalculationEventSink::new();
        assert!(sink.is_empty());

        sink.emit(CalculationEvent::recalculation_completed(1, 1, 0));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![
            CalculationEvent::ChangesHighlighted { rows: Vec::new() },
            CalculationEvent::ChangesSummarized {
                companies: Vec::new(),
            },
        ]);
        assert_eq!(sink.len(), 3);
        assert!(matches!(
            sink.events()[1],
            CalculationEvent::ChangesHighlighted { .. }
        ));

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_mock_sink_clones_share_events() {
        let sink = MockCalculationEventSink::new();
        let clone = sink.clone();
        clone.emit(CalculationEvent::recalculation_completed(0, 0, 0));
        assert_eq!(sink.len(), 1);
    }
}
