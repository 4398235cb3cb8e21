use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::core::currency::RateTableProvider;
use crate::core::rates::RateSnapshot;
use crate::providers::util::{RetryPolicy, with_retry};

/// Fetches the latest rates from a Fixer-compatible `/api/latest` endpoint.
pub struct FixerProvider {
    base_url: String,
    access_key: String,
    retry: RetryPolicy,
}

impl FixerProvider {
    pub fn new(base_url: &str, access_key: &str) -> Self {
        FixerProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl RateTableProvider for FixerProvider {
    #[instrument(name = "FixerRatesFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> Result<RateSnapshot> {
        let endpoint = format!("{}/api/latest", self.base_url);
        let url = format!("{}?access_key={}", endpoint, self.access_key);
        debug!("Requesting latest rates from {}", endpoint);

        let client = reqwest::Client::builder().user_agent("fxc/0.1").build()?;
        let response = with_retry(|| client.get(&url).send(), self.retry)
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e.without_url(), endpoint))?;

        debug!(status = %response.status(), "Received Fixer response");

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for rates request",
                response.status()
            ));
        }

        let text = response.text().await?;
        let snapshot: RateSnapshot = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for latest rates: {}", e))?;

        if !snapshot.success {
            debug!(info = ?snapshot.error_info(), "Provider reported failure");
        }
        Ok(snapshot)
    }
}
