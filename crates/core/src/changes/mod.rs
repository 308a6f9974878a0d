//! Change reporting between an as-entered table and its recalculation.

mod change_model;
mod change_reporter;

pub use change_model::*;
pub use change_reporter::{
    build_change_view, diff_tables, format_change, highlight_view, summarize_changes,
};
