//! Display-time formatting. Stored amounts keep full precision; rounding only
//! happens here.

use rust_decimal::{Decimal, RoundingStrategy};

/// Two-decimal amount, half away from zero: `1020` → `"1020.00"`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// `"USD 1020.00"`
pub fn format_money(currency: &str, value: Decimal) -> String {
    format!("{currency} {}", format_amount(value))
}

/// A percentage as configured, without trailing zeros: `15.00` → `"15"`,
/// `12.345` → `"12.345"`. Rates are never rounded.
pub fn format_percent(value: Decimal) -> String {
    value.normalize().to_string()
}

/// The percentage `part` is of `whole`; zero when `whole` is zero or the
/// result is out of range.
pub fn rate_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .unwrap_or(Decimal::ZERO)
}
