use rust_decimal::Decimal;

/// Decimal places of the currency minor unit. Equal and weighted split
/// amounts are rounded to this scale; the resulting drift is bounded by
/// `participants * 0.01`.
pub const MINOR_UNIT_DP: u32 = 2;

/// Upper bound on any single contribution, expense or settlement amount.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
