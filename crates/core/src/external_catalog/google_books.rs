//! Google Books API client.
//!
//! The API key is optional; keyless requests work with a lower shared quota.
//! Spacing and daily quota are enforced by the caller, not here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{GoogleBooksItem, GoogleBooksResponse};
use super::{GlobalCatalog, ProviderError};
use crate::config::GoogleBooksConfig;
use crate::metrics::PROVIDER_REQUESTS;

/// Google Books API client.
pub struct GoogleBooksClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(config: &GoogleBooksConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        let api_key = Some(config.api_key.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn fetch(&self, query: &str) -> Result<Vec<GoogleBooksItem>, ProviderError> {
        let url = format!("{}/books/v1/volumes", self.base_url);

        debug!("Google Books search: query='{}'", query);

        let mut request = self.client.get(&url).query(&[("q", query)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 429 {
            return Err(ProviderError::RateLimited);
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::NotConfigured(format!(
                "Google Books rejected the API key ({}): {}",
                status.as_u16(),
                body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let search_result: GoogleBooksResponse = response.json().await.map_err(|e| {
            ProviderError::Parse(format!("Failed to parse volumes response: {}", e))
        })?;

        debug!(
            "Google Books returned {} of {} items",
            search_result.items.as_ref().map_or(0, Vec::len),
            search_result.total_items
        );

        Ok(search_result.items.unwrap_or_default())
    }
}

#[async_trait]
impl GlobalCatalog for GoogleBooksClient {
    async fn search_volumes(&self, query: &str) -> Result<Vec<GoogleBooksItem>, ProviderError> {
        let result = self.fetch(query).await;
        let label = match &result {
            Ok(_) => "success",
            Err(ProviderError::RateLimited) => "rate_limited",
            Err(_) => "error",
        };
        PROVIDER_REQUESTS
            .with_label_values(&["google_books", label])
            .inc();
        result
    }
}
