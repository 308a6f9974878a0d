//! Rounds module - funding round records, the round table and CSV normalization.

mod csv_parser;
mod rounds_constants;
mod rounds_model;


pub use csv_parser::{parse_rounds_csv, write_rounds_csv, CsvConfig, ParsedRounds};
pub use rounds_constants::*;
pub use rounds_model::{Estimation, RoundKey, RoundKind, RoundRecord, RoundTable};
