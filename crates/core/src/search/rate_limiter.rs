//! Minimum spacing between requests to the global catalog.
//!
//! A single timestamp of the last request start is shared by every caller.
//! The lock is held across the wait so concurrent callers queue up and each
//! one starts at least `min_interval` after the previous.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::external_catalog::ProviderError;
use crate::metrics::RATE_LIMIT_WAIT;

/// Default spacing between global catalog requests.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(2000);

/// Enforces a minimum interval between request starts.
pub struct RequestSpacer {
    min_interval: Duration,
    /// Start of the most recent request; `None` until the first one.
    last_request: Mutex<Option<Instant>>,
}

impl Default for RequestSpacer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RequestSpacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Run `request` once its turn comes.
    ///
    /// Returns `Ok(None)` when the provider answered 429; any other error is
    /// passed through. The timestamp is stamped even if the request fails.
    pub async fn with_limit<T, F, Fut>(&self, request: F) -> Result<Option<T>, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        self.wait_turn().await;

        match request().await {
            Ok(value) => Ok(Some(value)),
            Err(ProviderError::RateLimited) => {
                debug!("Provider answered 429");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;

        let wait = last
            .map(|prev| self.min_interval.saturating_sub(prev.elapsed()))
            .unwrap_or(Duration::ZERO);

        RATE_LIMIT_WAIT.observe(wait.as_secs_f64());
        if !wait.is_zero() {
            debug!("Waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }

        *last = Some(Instant::now());
    }
}
