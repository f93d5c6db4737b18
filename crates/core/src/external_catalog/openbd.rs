//! openBD API client.
//!
//! openBD is free, needs no key and has no published rate limit.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::OpenBdRecord;
use super::{DomesticCatalog, ProviderError};
use crate::config::OpenBdConfig;
use crate::metrics::PROVIDER_REQUESTS;

/// openBD API client.
pub struct OpenBdClient {
    client: Client,
    base_url: String,
}

impl OpenBdClient {
    pub fn new(config: &OpenBdConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, isbn: &str) -> Result<Option<OpenBdRecord>, ProviderError> {
        let url = format!("{}/v1/get", self.base_url);

        debug!("openBD lookup: isbn='{}'", isbn);

        let response = self.client.get(&url).query(&[("isbn", isbn)]).send().await?;

        let status = response.status();
        if status == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let records: Vec<Option<OpenBdRecord>> = response.json().await.map_err(|e| {
            ProviderError::Parse(format!("Failed to parse openBD response: {}", e))
        })?;

        Ok(records.into_iter().next().flatten())
    }
}

#[async_trait]
impl DomesticCatalog for OpenBdClient {
    async fn lookup(&self, isbn: &str) -> Result<Option<OpenBdRecord>, ProviderError> {
        let result = self.fetch(isbn).await;
        let label = match &result {
            Ok(_) => "success",
            Err(ProviderError::RateLimited) => "rate_limited",
            Err(_) => "error",
        };
        PROVIDER_REQUESTS.with_label_values(&["openbd", label]).inc();
        result
    }
}
