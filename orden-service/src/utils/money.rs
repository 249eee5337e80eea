//! Money calculation utilities using rust_decimal for precision
//!
//! Calculations run on `Decimal` and are converted to `f64` (2 decimal
//! places, half-up) for storage.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite values become zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to 2 decimal places and convert back to f64
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `quantity × unit_price`, rounded
pub fn line_subtotal(quantity: f64, unit_price: f64) -> f64 {
    to_f64(to_decimal(quantity) * to_decimal(unit_price))
}

/// Sum of amounts, rounded
pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    to_f64(values.into_iter().map(to_decimal).sum())
}

/// Amount in minor units (centavos), half-up
pub fn to_cents(value: f64) -> i64 {
    (to_decimal(value) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Format as pesos with thousands separators, e.g. `$1,234.50`
pub fn format_currency(value: f64) -> String {
    let rounded = to_decimal(value)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}
