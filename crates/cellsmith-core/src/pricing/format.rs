use serde::Serialize;

use super::catalog::BillingInterval;
use crate::error::{CellsmithError, Result};

/// What paying yearly saves compared to twelve monthly payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlySavings {
    /// Whole dollars. Negative when the yearly price is the more expensive option.
    pub amount: i64,
    /// Percent of the annualized monthly cost, rounded half away from zero.
    pub percent: i64,
}

/// Render whole dollars US-style: `$5,000`. The interval does not affect the output.
pub fn format_price(amount: i64, _interval: BillingInterval) -> Result<String> {
    if amount < 0 {
        return Err(CellsmithError::invalid(format!(
            "price must not be negative, got {amount}"
        )));
    }

    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    Ok(out)
}

pub fn yearly_savings(monthly_price: i64, yearly_price: i64) -> Result<YearlySavings> {
    if monthly_price < 0 || yearly_price < 0 {
        return Err(CellsmithError::invalid(format!(
            "prices must not be negative (monthly {monthly_price}, yearly {yearly_price})"
        )));
    }
    if monthly_price == 0 {
        return Err(CellsmithError::invalid(
            "monthly price is zero, savings percentage is undefined",
        ));
    }

    let annualized = monthly_price
        .checked_mul(12)
        .ok_or_else(|| CellsmithError::invalid(format!("monthly price {monthly_price} overflows")))?;
    let amount = annualized - yearly_price;

    // Half away from zero, computed on the magnitude.
    let scaled = amount.unsigned_abs() as u128 * 100;
    let denominator = annualized as u128;
    let magnitude = ((2 * scaled + denominator) / (2 * denominator)) as i64;
    let percent = if amount < 0 { -magnitude } else { magnitude };

    Ok(YearlySavings { amount, percent })
}
