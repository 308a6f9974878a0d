//! Round sheet normalizer.
//!
//! Coerces the raw CSV export of the round sheet into typed [`RoundRecord`]s.
//! Cells that cannot be coerced become unknown values and are reported as
//! `MalformedInput` warnings; only a missing required column is fatal.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounds_constants::*;
use super::rounds_model::{Estimation, RoundRecord, RoundTable};
use crate::calculation::{CalculationIssueKind, CalculationWarning};
use crate::errors::{Error, Result, ValidationError};

/// Date layouts accepted in the `Date` column, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%b-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Configuration for reading the round sheet.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CsvConfig {
    /// Number of lines to skip before the header row (default: 0)
    pub skip_top_rows: Option<usize>,
    /// Field delimiter (default: ",")
    pub delimiter: Option<String>,
}

impl CsvConfig {
    /// Returns the number of lines to skip before the header
    pub fn top_skip(&self) -> usize {
        self.skip_top_rows.unwrap_or(0)
    }

    /// Returns the delimiter as a byte
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
            .as_ref()
            .and_then(|s| s.chars().next())
            .map(|c| c as u8)
            .unwrap_or(b',')
    }
}

/// Result of normalizing a round sheet.
#[derive(Debug, Clone)]
pub struct ParsedRounds {
    pub table: RoundTable,
    /// Cells that could not be coerced and were replaced by unknown values
    pub warnings: Vec<CalculationWarning>,
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();

        for required in [COLUMN_ROUND_NUMBER, COLUMN_NAME] {
            if !positions.contains_key(required) {
                return Err(Error::Validation(ValidationError::MissingColumn(
                    required.to_string(),
                )));
            }
        }
        Ok(Self { positions })
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
    }
}

/// Parses round sheet CSV content.
///
/// # Arguments
/// * `content` - Raw bytes of the CSV file
/// * `config` - Reader options
///
/// # Returns
/// The typed round table plus a warning for every cell that was replaced by
/// an unknown value.
pub fn parse_rounds_csv(content: &[u8], config: &CsvConfig) -> Result<ParsedRounds> {
    let mut warnings = Vec::new();
    let text = decode_content(content, &mut warnings);
    let body: String = text
        .lines()
        .skip(config.top_skip())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(config.delimiter_byte())
        .from_reader(body.as_bytes());

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    let mut rounds = Vec::new();

    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let round = normalize_record(&record, &columns, row_index, &mut warnings);
        rounds.push(round);
    }

    debug!(
        "Normalized {} rounds with {} warnings",
        rounds.len(),
        warnings.len()
    );

    Ok(ParsedRounds {
        table: RoundTable::new(rounds),
        warnings,
    })
}

/// Decodes content bytes to a string, dropping a UTF-8 BOM.
fn decode_content(content: &[u8], warnings: &mut Vec<CalculationWarning>) -> String {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    match std::str::from_utf8(content) {
        Ok(s) => s.to_string(),
        Err(e) => {
            let warning = CalculationWarning::new(
                CalculationIssueKind::MalformedInput,
                "",
                None,
                format!(
                    "Invalid UTF-8 at byte {}. Some characters were replaced.",
                    e.valid_up_to()
                ),
            );
            warn!("{}", warning);
            warnings.push(warning);
            String::from_utf8_lossy(content).into_owned()
        }
    }
}

fn normalize_record(
    record: &StringRecord,
    columns: &ColumnIndex,
    row_index: usize,
    warnings: &mut Vec<CalculationWarning>,
) -> RoundRecord {
    let company = columns.get(record, COLUMN_NAME).to_string();

    let raw_sequence = columns.get(record, COLUMN_ROUND_NUMBER);
    let sequence = match parse_sequence(raw_sequence) {
        Some(sequence) => sequence,
        None => {
            push_malformed(
                warnings,
                &company,
                None,
                format!(
                    "Row {}: cannot read '{}' value '{}', using 0",
                    row_index + 1,
                    COLUMN_ROUND_NUMBER,
                    raw_sequence
                ),
            );
            0
        }
    };

    let round_name = columns.get(record, COLUMN_ROUND_NAME).to_string();
    let mut round = RoundRecord::new(company.clone(), sequence, round_name);
    round.estimation = Estimation::from_flag(columns.get(record, COLUMN_ESTIMATED));

    let mut number = |column: &str| -> Option<Decimal> {
        let raw = columns.get(record, column);
        match parse_amount(raw) {
            Ok(value) => value,
            Err(()) => {
                push_malformed(
                    warnings,
                    &company,
                    Some(sequence),
                    format!("Cannot read '{}' value '{}'", column, raw),
                );
                None
            }
        }
    };

    round.premoney = number(COLUMN_PREMONEY);
    round.total_invested = number(COLUMN_TOTAL_INVESTED);
    round.post_money = number(COLUMN_POST_MONEY);
    round.invested = number(COLUMN_INVESTED);
    round.round_ownership = number(COLUMN_ROUND_OWNERSHIP).map(percent_to_fraction);
    round.my_ownership = number(COLUMN_MY_OWNERSHIP).map(percent_to_fraction);
    round.round_over_round_increase = number(COLUMN_INCREASE_ROUND);
    round.dilution_estimate = number(COLUMN_DILUTION);
    round.increase_value = number(COLUMN_INCREASE_VALUE).unwrap_or(Decimal::ZERO);

    let raw_date = columns.get(record, COLUMN_DATE);
    round.date = parse_date(raw_date);
    if round.date.is_none() && !raw_date.is_empty() {
        push_malformed(
            warnings,
            &company,
            Some(sequence),
            format!("Cannot read '{}' value '{}'", COLUMN_DATE, raw_date),
        );
    }

    let notes = columns.get(record, COLUMN_NOTES);
    round.notes = (!notes.is_empty()).then(|| notes.to_string());

    round
}

fn push_malformed(
    warnings: &mut Vec<CalculationWarning>,
    company: &str,
    sequence: Option<u32>,
    message: String,
) {
    let warning = CalculationWarning::new(
        CalculationIssueKind::MalformedInput,
        company,
        sequence,
        message,
    );
    warn!("{}", warning);
    warnings.push(warning);
}

/// Reads a round number. Spreadsheet exports sometimes write `3.0`.
fn parse_sequence(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(sequence) = raw.parse::<u32>() {
        return Some(sequence);
    }
    let value = Decimal::from_str(raw).ok()?;
    if value.fract().is_zero() && value >= Decimal::ZERO {
        value.trunc().to_string().parse::<u32>().ok()
    } else {
        None
    }
}

/// Reads a numeric cell.
///
/// Everything except digits, `.` and `-` is stripped first, so `$1,200,000`
/// and `12.5%` are accepted. An empty cell is unknown (`Ok(None)`); a cell
/// with no usable number is malformed (`Err`).
fn parse_amount(raw: &str) -> std::result::Result<Option<Decimal>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return Err(());
    }
    Decimal::from_str(&cleaned).map(Some).map_err(|_| ())
}

fn percent_to_fraction(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}

fn fraction_to_percent(value: Decimal) -> Decimal {
    value * Decimal::ONE_HUNDRED
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
}

fn format_optional(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

/// Writes a round table back to CSV in the sheet's column layout.
///
/// Ownership fractions are written as percentages, matching the import format.
pub fn write_rounds_csv(table: &RoundTable) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(ROUND_COLUMNS)?;

    for round in table {
        writer.write_record([
            round.sequence.to_string(),
            round.round_name.clone(),
            round.estimation.as_flag().to_string(),
            round.company.clone(),
            format_optional(round.premoney),
            format_optional(round.total_invested),
            format_optional(round.post_money),
            format_optional(round.invested),
            format_optional(round.round_ownership.map(fraction_to_percent)),
            format_optional(round.my_ownership.map(fraction_to_percent)),
            format_optional(round.round_over_round_increase),
            format_optional(round.dilution_estimate),
            round.increase_value.normalize().to_string(),
            round
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            round.notes.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Csv(e.to_string()))
}
