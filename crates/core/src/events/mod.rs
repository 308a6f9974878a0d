//! Calculation events module.
//!
//! Provides the event types the calculation service reports through and the
//! sink trait callers implement to receive them. The command-line shell
//! installs a sink that prints change reports; tests use the mock sink.

mod calculation_event;
mod sink;

pub use calculation_event::*;
pub use sink::*;
