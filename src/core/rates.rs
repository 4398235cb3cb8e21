//! Rate tables and the provider payload they are built from.

use crate::core::error::ConversionError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exchange rates quoted against a single base currency.
///
/// Each entry is the number of units of that currency per one unit of the
/// base. The base itself is always present with a rate of exactly 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, f64>,
    as_of: Option<NaiveDate>,
}

impl RateTable {
    /// Builds a validated table. Codes are normalized to uppercase.
    ///
    /// Fails with [`ConversionError::RateTableUnavailable`] when a rate is not
    /// a strictly positive finite number, when the base is quoted at anything
    /// other than 1.0, or when two codes that normalize to the same currency
    /// carry different rates.
    pub fn new<I, K>(base: &str, rates: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let base = normalize_code(base);
        if base.is_empty() {
            return Err(ConversionError::RateTableUnavailable(
                "base currency is missing".to_string(),
            ));
        }

        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            let code = normalize_code(code.as_ref());
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConversionError::RateTableUnavailable(format!(
                    "invalid rate {rate} for {code}"
                )));
            }
            if code == base && rate != 1.0 {
                return Err(ConversionError::RateTableUnavailable(format!(
                    "base currency {base} quoted at {rate}, expected 1.0"
                )));
            }
            match table.insert(code.clone(), rate) {
                Some(existing) if existing != rate => {
                    return Err(ConversionError::RateTableUnavailable(format!(
                        "conflicting rates {existing} and {rate} for {code}"
                    )));
                }
                _ => {}
            }
        }
        table.insert(base.clone(), 1.0);

        Ok(RateTable {
            base,
            rates: table,
            as_of: None,
        })
    }

    /// Records the date the rates were published.
    pub fn with_date(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rate for `code` against the base, `None` if the currency is unknown.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// All supported currency codes in alphabetical order, base included.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Error detail attached to an unsuccessful provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// The "latest rates" payload as returned by the exchange-rate provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderError>,
}

impl RateSnapshot {
    /// The provider's own description of a failure, if it sent one.
    pub fn error_info(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.info.as_deref())
    }

    /// Validates the payload and extracts its rate table.
    pub fn to_table(&self) -> Result<RateTable, ConversionError> {
        if !self.success {
            return Err(ConversionError::RateTableUnavailable(
                self.error_info().unwrap_or("Unknown error").to_string(),
            ));
        }
        let base = self.base.as_deref().ok_or_else(|| {
            ConversionError::RateTableUnavailable("response has no base currency".to_string())
        })?;
        let rates = self.rates.as_ref().ok_or_else(|| {
            ConversionError::RateTableUnavailable("response has no rates".to_string())
        })?;
        RateTable::new(base, rates.iter().map(|(code, rate)| (code, *rate)))
            .map(|table| table.with_date(self.date))
    }

    pub fn date_label(&self) -> String {
        self.date
            .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_includes_base_at_one() {
        let table = RateTable::new("eur", [("usd", 1.1), ("GBP", 0.85)]).unwrap();
        assert_eq!(table.base(), "EUR");
        assert_eq!(table.rate("EUR"), Some(1.0));
        assert_eq!(table.rate("USD"), Some(1.1));
        assert_eq!(table.rate("JPY"), None);
        assert_eq!(table.as_of(), None);
        assert_eq!(table.currencies().collect::<Vec<_>>(), vec!["EUR", "GBP", "USD"]);
    }

    #[test]
    fn test_explicit_base_entry_of_one_is_accepted() {
        let table = RateTable::new("EUR", [("EUR", 1.0), ("USD", 1.1)]).unwrap();
        assert_eq!(table.currencies().count(), 2);
    }

    #[test]
    fn test_conflicting_duplicate_codes_are_rejected() {
        let err = RateTable::new("EUR", [("usd", 1.1), ("USD", 1.2)]).unwrap_err();
        assert_eq!(
            err,
            ConversionError::RateTableUnavailable(
                "conflicting rates 1.1 and 1.2 for USD".to_string()
            )
        );
    }

    #[test]
    fn test_repeated_codes_with_same_rate_are_accepted() {
        let table = RateTable::new("EUR", [("usd", 1.1), ("USD", 1.1)]).unwrap();
        assert_eq!(table.rate("USD"), Some(1.1));
    }

    #[test]
    fn test_inconsistent_base_entry_is_rejected() {
        let err = RateTable::new("EUR", [("EUR", 1.2)]).unwrap_err();
        assert!(matches!(err, ConversionError::RateTableUnavailable(_)));
    }

    #[test]
    fn test_non_positive_rates_are_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = RateTable::new("EUR", [("USD", bad)]);
            assert!(
                matches!(result, Err(ConversionError::RateTableUnavailable(_))),
                "rate {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_snapshot_success_deserialization() {
        let json = r#"{
            "success": true,
            "timestamp": 1519296206,
            "base": "EUR",
            "date": "2024-03-15",
            "rates": {"USD": 1.0892, "GBP": 0.8554, "JPY": 162.12}
        }"#;
        let snapshot: RateSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.success);
        assert_eq!(snapshot.date_label(), "2024-03-15");

        let table = snapshot.to_table().unwrap();
        assert_eq!(table.base(), "EUR");
        assert_eq!(table.rate("JPY"), Some(162.12));
        assert_eq!(table.as_of(), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_snapshot_failure_reports_provider_info() {
        let json = r#"{
            "success": false,
            "error": {
                "code": 101,
                "type": "invalid_access_key",
                "info": "You have not supplied a valid API Access Key."
            }
        }"#;
        let snapshot: RateSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.error_info(),
            Some("You have not supplied a valid API Access Key.")
        );
        assert_eq!(
            snapshot.to_table().unwrap_err(),
            ConversionError::RateTableUnavailable(
                "You have not supplied a valid API Access Key.".to_string()
            )
        );
    }

    #[test]
    fn test_snapshot_failure_without_detail() {
        let snapshot: RateSnapshot = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(
            snapshot.to_table().unwrap_err().to_string(),
            "Rate table unavailable: Unknown error"
        );
    }

    #[test]
    fn test_successful_snapshot_without_rates_is_unavailable() {
        let snapshot: RateSnapshot =
            serde_json::from_str(r#"{"success": true, "base": "EUR"}"#).unwrap();
        assert!(matches!(
            snapshot.to_table(),
            Err(ConversionError::RateTableUnavailable(_))
        ));
    }
}
