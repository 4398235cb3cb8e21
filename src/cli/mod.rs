pub mod cart;
pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;

use crate::core::{RateSnapshot, RateTableProvider};
use anyhow::{Context, Result};

/// Fetches the latest rates behind a spinner.
pub(crate) async fn fetch_with_spinner(provider: &dyn RateTableProvider) -> Result<RateSnapshot> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = provider.fetch_rates().await;
    pb.finish_and_clear();
    result.context("Failed to fetch currency data")
}
