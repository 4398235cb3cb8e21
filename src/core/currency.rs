//! Exchange-rate source abstraction

use crate::core::rates::RateSnapshot;
use anyhow::Result;
use async_trait::async_trait;

/// Fetches the latest rate payload from an exchange-rate provider.
///
/// Errors are transport or decoding failures. A payload that reports
/// `success: false` is returned as-is so callers can decide how to surface it.
#[async_trait]
pub trait RateTableProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateSnapshot>;
}
