use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Legacy aggregate row marker, never treated as a company
pub const TOTAL_COMPANY_NAME: &str = "Total";

/// Round name that marks a synthetic dilution adjustment
pub const ADJUSTMENT_ROUND_NAME: &str = "Adjustment";

/// Value of the `Estimated` column that flags an estimated round
pub const ESTIMATED_FLAG: &str = "Y";

/// Sequence number of the first round of a company
pub const FIRST_ROUND_SEQUENCE: u32 = 1;

/// Relative tolerance under which two values count as unchanged
pub const CHANGE_TOLERANCE: Decimal = dec!(0.000000000001);

/// Percent deltas below this magnitude are printed with four decimal places
pub const SMALL_CHANGE_THRESHOLD_PCT: Decimal = dec!(0.2);

/// Decimal places for old and new values in the small-delta change format
pub const SMALL_CHANGE_DECIMALS: usize = 4;

/// Decimal places for the percentage of a change
pub const CHANGE_PERCENT_DECIMALS: usize = 2;
