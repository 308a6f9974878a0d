//! Subcommand handlers.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use roundcalc_core::calculation::{RoundCalculationService, RoundCalculationServiceTrait};
use roundcalc_core::changes::ChangeReportingMode;
use roundcalc_core::rounds::{RoundRecord, RoundTable};
use roundcalc_core::summary::{portfolio_totals, CompanySummary, PortfolioTotals};

use crate::console_sink::ConsoleEventSink;
use crate::format::{
    format_currency, format_date, format_large_number, format_multiple, format_percentage,
};
use crate::main_lib::{load_table, save_table, Settings};

fn service(settings: &Settings) -> RoundCalculationService {
    RoundCalculationService::new(
        settings.calculation.clone(),
        Arc::new(ConsoleEventSink::stdout()),
    )
}

/// Loads the sheet and runs a full pass, reporting through the console sink.
fn recalculate(
    settings: &Settings,
    file: Option<PathBuf>,
    mode: ChangeReportingMode,
) -> anyhow::Result<(RoundCalculationService, RoundTable)> {
    let path = settings.data_file(file)?;
    let table = load_table(&path, &settings.csv)?;
    let service = service(settings);
    let result = service.apply_calculations(&table, mode);
    Ok((service, result.table))
}

pub fn check(
    settings: &Settings,
    file: Option<PathBuf>,
    mode: ChangeReportingMode,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (service, table) = recalculate(settings, file, mode)?;

    let totals = portfolio_totals(&service.summarize(&table));
    println!();
    println!("{}", totals_line(&totals));

    if let Some(output) = output {
        save_table(&table, Some(&output))?;
    }
    Ok(())
}

pub fn browse(settings: &Settings, file: Option<PathBuf>, company: &str) -> anyhow::Result<()> {
    let (service, table) = recalculate(settings, file, ChangeReportingMode::None)?;

    let rounds = table.rounds_for(company);
    if rounds.is_empty() {
        anyhow::bail!(
            "Company '{}' not found; known companies: {}",
            company,
            table.company_names().join(", ")
        );
    }

    println!("{}", round_header());
    for round in rounds {
        println!("{}", round_line(round));
    }

    if let Some(summary) = service
        .summarize(&table)
        .into_iter()
        .find(|s| s.company == company)
    {
        println!();
        println!("{}", summary_header());
        println!("{}", summary_line(&summary));
    }
    Ok(())
}

pub fn totals(settings: &Settings, file: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let (service, table) = recalculate(settings, file, ChangeReportingMode::None)?;
    let summaries = service.summarize(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", summary_header());
    for summary in &summaries {
        println!("{}", summary_line(summary));
    }
    println!();
    println!("{}", totals_line(&portfolio_totals(&summaries)));
    Ok(())
}

pub fn add_round(
    settings: &Settings,
    file: Option<PathBuf>,
    company: Option<String>,
    date: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let path = settings.data_file(file)?;
    let table = load_table(&path, &settings.csv)?;
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let extended = table.with_new_round(company.as_deref(), date);
    if let Some(added) = extended.rounds().last() {
        tracing::info!("Added {}", added.key());
    }
    let extended = service(settings).compute_value_appreciation(&extended);

    save_table(&extended, output.as_deref())
}

fn round_header() -> String {
    format!(
        "{:>3} {:<14} {:>3} {:>14} {:>14} {:>12} {:>8} {:>8} {:>8} {:>8} {:>12} {:>8}",
        "#", "Round", "Est", "Post Money", "Raised", "Invested", "Round %", "My %", "Incr", "Dilut",
        "Value", "Date"
    )
}

fn round_line(round: &RoundRecord) -> String {
    format!(
        "{:>3} {:<14} {:>3} {:>14} {:>14} {:>12} {:>8} {:>8} {:>8} {:>8} {:>12} {:>8}",
        round.sequence,
        round.round_name,
        round.estimation.as_flag(),
        format_currency(round.post_money),
        format_currency(round.total_invested),
        format_currency(round.invested),
        format_percentage(round.round_ownership),
        format_percentage(round.my_ownership),
        format_multiple(round.round_over_round_increase),
        format_multiple(round.dilution_estimate),
        format_currency(Some(round.increase_value)),
        format_date(round.date),
    )
}

fn summary_header() -> String {
    format!(
        "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "Company", "Rounds", "Invested", "Value", "First Val", "Last Val", "First", "Last",
        "Rnd x", "Value x"
    )
}

fn summary_line(summary: &CompanySummary) -> String {
    format!(
        "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8}",
        summary.company,
        summary.round_count,
        format_large_number(Some(summary.total_invested)),
        format_large_number(Some(summary.total_value)),
        format_large_number(summary.first_valuation),
        format_large_number(summary.last_valuation),
        format_date(summary.first_date),
        format_date(summary.last_date),
        format_multiple(summary.round_increase),
        format_multiple(summary.dilution_increase),
    )
}

fn totals_line(totals: &PortfolioTotals) -> String {
    format!(
        "Total position: {} companies, invested {}, value {}, {}",
        totals.company_count,
        format_currency(Some(totals.total_invested)),
        format_currency(Some(totals.total_value)),
        match totals.multiple {
            Some(multiple) => format_multiple(Some(multiple)),
            None => "no multiple".to_string(),
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_line() {
        let totals = PortfolioTotals {
            company_count: 2,
            total_invested: dec!(1500),
            total_value: dec!(4500),
            multiple: Some(dec!(3)),
        };
        assert_eq!(
            totals_line(&totals),
            "Total position: 2 companies, invested $1,500, value $4,500, 3.00x"
        );
        assert!(totals_line(&PortfolioTotals::default()).ends_with("no multiple"));
    }

    #[test]
    fn test_round_line_leaves_unknowns_empty() {
        let round = RoundRecord::new("Acme", 1, "Seed");
        let line = round_line(&round);
        assert!(line.trim_start().starts_with("1 Seed"));
        assert!(line.contains("$0"));
        assert!(!line.contains('%'));
    }
}
