use std::path::PathBuf;

use anyhow::Context;
use roundcalc_core::calculation::PredecessorSource;

pub struct Config {
    pub data_file: Option<PathBuf>,
    pub log_format: String,
    pub predecessor_source: PredecessorSource,
    pub csv_skip_rows: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_file = std::env::var("RC_DATA_FILE").ok().map(PathBuf::from);
        let log_format = std::env::var("RC_LOG_FORMAT").unwrap_or_else(|_| "text".into());
        let predecessor_source = match std::env::var("RC_PREDECESSOR_SOURCE") {
            Ok(value) => value
                .parse()
                .with_context(|| "Invalid RC_PREDECESSOR_SOURCE".to_string())?,
            Err(_) => PredecessorSource::default(),
        };
        let csv_skip_rows: usize = std::env::var("RC_CSV_SKIP_ROWS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .unwrap_or(0);
        Ok(Self {
            data_file,
            log_format,
            predecessor_source,
            csv_skip_rows,
        })
    }
}
