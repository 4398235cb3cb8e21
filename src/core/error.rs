//! Conversion error types.

use std::fmt::Display;
use thiserror::Error;

/// Which side of a conversion request a currency code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::Source => "source",
                Side::Target => "target",
            }
        )
    }
}

/// Errors reported by the conversion engine and rate table validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Currency code is neither the base nor present in the rate table.
    #[error("Currency not supported: {code} ({side} currency)")]
    UnsupportedCurrency { code: String, side: Side },

    /// Amount is negative, NaN or infinite.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// The rate table is missing or malformed, usually because the upstream fetch failed.
    #[error("Rate table unavailable: {0}")]
    RateTableUnavailable(String),
}

impl ConversionError {
    pub fn unsupported(code: &str, side: Side) -> Self {
        ConversionError::UnsupportedCurrency {
            code: code.to_string(),
            side,
        }
    }
}
