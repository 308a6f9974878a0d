// Round calculator CLI - recalculates a round sheet and reports on it

mod commands;
mod config;
mod console_sink;
mod format;
mod main_lib;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use roundcalc_core::calculation::PredecessorSource;
use roundcalc_core::changes::ChangeReportingMode;

use config::Config;
use main_lib::{init_tracing, Settings};

#[derive(Parser)]
#[command(name = "roundcalc")]
#[command(about = "Reconstructs funding rounds and tracks dilution per company")]
#[command(version)]
struct Cli {
    /// Where a round's predecessor is read from when computing growth
    #[arg(long, global = true, value_enum)]
    predecessor: Option<PredecessorArg>,

    /// Lines to skip before the header row
    #[arg(long, global = true)]
    skip_rows: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recalculate every round and report what changed
    #[command(after_help = "\
Examples:
  roundcalc check rounds.csv
  roundcalc check rounds.csv --changes highlight
  roundcalc check rounds.csv -o recalculated.csv")]
    Check {
        /// Round sheet (defaults to RC_DATA_FILE)
        file: Option<PathBuf>,

        /// How to report changed cells
        #[arg(long, value_enum, default_value = "summary")]
        changes: ChangesArg,

        /// Write the recalculated sheet here
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show one company's rounds and summary
    Browse {
        /// Company name
        company: String,

        /// Round sheet (defaults to RC_DATA_FILE)
        file: Option<PathBuf>,
    },

    /// Summarize every company, best multiple first
    Totals {
        /// Round sheet (defaults to RC_DATA_FILE)
        file: Option<PathBuf>,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a blank round and recompute appreciated values
    AddRound {
        /// Round sheet (defaults to RC_DATA_FILE)
        file: Option<PathBuf>,

        /// Company of the new round (defaults to the company of the last row)
        #[arg(long)]
        company: Option<String>,

        /// Date of the new round, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Write the extended sheet here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChangesArg {
    None,
    Highlight,
    Summary,
}

impl From<ChangesArg> for ChangeReportingMode {
    fn from(arg: ChangesArg) -> Self {
        match arg {
            ChangesArg::None => ChangeReportingMode::None,
            ChangesArg::Highlight => ChangeReportingMode::Highlight,
            ChangesArg::Summary => ChangeReportingMode::Summary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PredecessorArg {
    Inferred,
    AsEntered,
}

impl From<PredecessorArg> for PredecessorSource {
    fn from(arg: PredecessorArg) -> Self {
        match arg {
            PredecessorArg::Inferred => PredecessorSource::Inferred,
            PredecessorArg::AsEntered => PredecessorSource::AsEntered,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.log_format);

    let settings = Settings::resolve(config, cli.predecessor.map(Into::into), cli.skip_rows);

    match cli.command {
        Commands::Check {
            file,
            changes,
            output,
        } => commands::check(&settings, file, changes.into(), output),
        Commands::Browse { company, file } => commands::browse(&settings, file, &company),
        Commands::Totals { file, json } => commands::totals(&settings, file, json),
        Commands::AddRound {
            file,
            company,
            date,
            output,
        } => commands::add_round(&settings, file, company, date, output),
    }
}
