use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Monetary scale used for every stored amount (euro cents)
pub const SCALE: u32 = 2;

/// Rounds to cents, half away from zero.
///
/// Every intermediate billing amount goes through this; `round_dp` would
/// use banker's rounding and disagree with issued invoices.
pub fn round2(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

/// True when `amount` is an exact non-negative integer multiple of `unit`
pub fn is_exact_multiple(amount: Decimal, unit: Decimal) -> bool {
    if unit <= Decimal::ZERO || amount < Decimal::ZERO {
        return false;
    }
    (amount % unit).is_zero()
}

/// Parses an amount as typed in spreadsheets and forms.
///
/// Accepts an optional euro sign, Spanish grouping (`1.234,56`, `1234,56`)
/// and English grouping (`1,234.56`). Blank input is zero.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '€' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(round2(Decimal::ZERO));
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => {
            let parts: Vec<&str> = cleaned.split(',').collect();
            if parts.len() == 2 && parts[1].len() <= 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        _ => cleaned,
    };

    Decimal::from_str(&normalized)
        .map(round2)
        .map_err(|_| AppError::parse(format!("invalid amount '{}'", raw.trim())))
}

/// Formats an amount the way invoices print it: `1.234,56 €`
pub fn format_eur(amount: Decimal) -> String {
    let rounded = round2(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}{},{} €", if negative { "-" } else { "" }, grouped, frac_part)
}
