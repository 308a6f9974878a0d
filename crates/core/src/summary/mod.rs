//! Company aggregation: one summary record per company.

mod summary_calculator;
mod summary_model;

pub use summary_calculator::{portfolio_totals, summarize};
pub use summary_model::*;
