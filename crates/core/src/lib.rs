//! Round Calculator Core - funding round reconstruction and dilution engine.
//!
//! This crate holds the round table model, the CSV normalizer that produces it,
//! and the calculation pipeline: per-company resolution, field inference,
//! dependent metrics, value appreciation, change reporting and aggregation.
//! It performs no I/O of its own beyond parsing byte slices handed to it.

pub mod calculation;
pub mod changes;
pub mod constants;
pub mod errors;
pub mod events;
pub mod rounds;
pub mod summary;
pub mod utils;

pub use calculation::{
    apply_calculations, compute_value_appreciation, CalculationConfig, CalculationResult,
    CalculationWarning, RoundCalculationService, RoundCalculationServiceTrait,
};
pub use changes::ChangeReportingMode;
pub use rounds::{RoundRecord, RoundTable};
pub use summary::{summarize, CompanySummary};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
