use std::path::{Path, PathBuf};

use anyhow::Context;
use roundcalc_core::calculation::{CalculationConfig, PredecessorSource};
use roundcalc_core::rounds::{parse_rounds_csv, write_rounds_csv, CsvConfig, RoundTable};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Settings after command-line flags have been applied over the environment.
pub struct Settings {
    pub data_file: Option<PathBuf>,
    pub calculation: CalculationConfig,
    pub csv: CsvConfig,
}

impl Settings {
    pub fn resolve(
        config: Config,
        predecessor_source: Option<PredecessorSource>,
        skip_rows: Option<usize>,
    ) -> Self {
        Self {
            data_file: config.data_file,
            calculation: CalculationConfig {
                predecessor_source: predecessor_source.unwrap_or(config.predecessor_source),
            },
            csv: CsvConfig {
                skip_top_rows: Some(skip_rows.unwrap_or(config.csv_skip_rows)),
                delimiter: None,
            },
        }
    }

    /// The file named on the command line, or `RC_DATA_FILE`.
    pub fn data_file(&self, file: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        file.or_else(|| self.data_file.clone())
            .context("No round sheet given; pass a file or set RC_DATA_FILE")
    }
}

/// Reads and normalizes a round sheet. Coercion warnings are logged by the parser.
pub fn load_table(path: &Path, csv: &CsvConfig) -> anyhow::Result<RoundTable> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = parse_rounds_csv(&content, csv)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!(
        "Loaded {} rounds from {} ({} warnings)",
        parsed.table.len(),
        path.display(),
        parsed.warnings.len()
    );
    Ok(parsed.table)
}

/// Writes the table as CSV to `path`, or to stdout when no path is given.
pub fn save_table(table: &RoundTable, path: Option<&Path>) -> anyhow::Result<()> {
    let csv = write_rounds_csv(table)?;
    match path {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} rounds to {}", table.len(), path.display());
        }
        None => print!("{}", csv),
    }
    Ok(())
}
