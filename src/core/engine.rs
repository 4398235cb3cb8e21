//! Currency conversion through the base currency of a rate table.

use crate::core::error::{ConversionError, Side};
use crate::core::rates::{RateTable, normalize_code};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl ConversionRequest {
    /// Creates a request with both currency codes normalized to uppercase.
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        ConversionRequest {
            from: normalize_code(from),
            to: normalize_code(to),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Amount expressed in the target currency, unrounded.
    pub converted: f64,
    /// Target units per one source unit.
    pub rate: f64,
}

/// Converts `request.amount` from `request.from` to `request.to`, pivoting
/// through the table's base currency.
///
/// The amount is validated before the currencies, and the source currency is
/// checked before the target. Same-currency requests return the amount
/// untouched.
pub fn convert(
    request: &ConversionRequest,
    table: &RateTable,
) -> Result<ConversionResult, ConversionError> {
    let amount = request.amount;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConversionError::InvalidAmount(amount));
    }

    let from_rate = table.rate(&request.from);
    let to_rate = table.rate(&request.to);
    let (from_rate, to_rate) = match (from_rate, to_rate) {
        (Some(from_rate), Some(to_rate)) => (from_rate, to_rate),
        (None, _) => return Err(ConversionError::unsupported(&request.from, Side::Source)),
        (_, None) => return Err(ConversionError::unsupported(&request.to, Side::Target)),
    };

    if request.from == request.to {
        return Ok(ConversionResult {
            converted: amount,
            rate: 1.0,
        });
    }

    let base = table.base();
    let converted = if request.from == base {
        amount * to_rate
    } else if request.to == base {
        amount / from_rate
    } else {
        (amount / from_rate) * to_rate
    };

    Ok(ConversionResult {
        converted,
        rate: effective_rate(from_rate, to_rate),
    })
}

/// Target units per source unit given both rates against the base.
pub fn effective_rate(from_rate: f64, to_rate: f64) -> f64 {
    to_rate / from_rate
}
