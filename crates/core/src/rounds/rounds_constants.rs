/// Column headers of the round sheet.
///
/// These are the exact header strings of the exported spreadsheet; the CSV
/// normalizer and writer both use them.

/// Round sequence number within a company. Required.
pub const COLUMN_ROUND_NUMBER: &str = "Round #";

/// Free-form round label. `"Adjustment"` marks an adjustment round.
pub const COLUMN_ROUND_NAME: &str = "Round Name";

/// `"Y"` when the round's monetary fields are estimated.
pub const COLUMN_ESTIMATED: &str = "Estimated";

/// Company identity. Required.
pub const COLUMN_NAME: &str = "Name";

pub const COLUMN_PREMONEY: &str = "Premoney";
pub const COLUMN_TOTAL_INVESTED: &str = "Total Invested";
pub const COLUMN_POST_MONEY: &str = "Post Money";
pub const COLUMN_INVESTED: &str = "Invested";

/// Percent in the sheet, fraction in memory.
pub const COLUMN_ROUND_OWNERSHIP: &str = "Round Ownership";

/// Percent in the sheet, fraction in memory.
pub const COLUMN_MY_OWNERSHIP: &str = "My Ownership";

pub const COLUMN_INCREASE_ROUND: &str = "Increase (round/round)";
pub const COLUMN_DILUTION: &str = "Dilution (est)";
pub const COLUMN_INCREASE_VALUE: &str = "Increase (Value)";
pub const COLUMN_DATE: &str = "Date";
pub const COLUMN_NOTES: &str = "Notes";

/// Output column order used when writing a round table back to CSV.
pub const ROUND_COLUMNS: [&str; 15] = [
    COLUMN_ROUND_NUMBER,
    COLUMN_ROUND_NAME,
    COLUMN_ESTIMATED,
    COLUMN_NAME,
    COLUMN_PREMONEY,
    COLUMN_TOTAL_INVESTED,
    COLUMN_POST_MONEY,
    COLUMN_INVESTED,
    COLUMN_ROUND_OWNERSHIP,
    COLUMN_MY_OWNERSHIP,
    COLUMN_INCREASE_ROUND,
    COLUMN_DILUTION,
    COLUMN_INCREASE_VALUE,
    COLUMN_DATE,
    COLUMN_NOTES,
];
