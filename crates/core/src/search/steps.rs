//! Provider fallback chain.
//!
//! Each provider is a [`LookupStep`]. The service walks its steps in order,
//! skipping those that don't apply to the ISBN, until one finds a record or
//! ends the search.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::isbn::has_prefix;
use super::rate_limiter::RequestSpacer;
use super::types::{BookRecord, SearchOutcome};
use crate::external_catalog::normalize::{normalize_google_books, normalize_openbd};
use crate::external_catalog::{DomesticCatalog, GlobalCatalog};
use crate::quota::DailyQuotaTracker;

/// What a step concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// A usable record; the search succeeds with it.
    Found(BookRecord),
    /// Nothing usable here; try the next step.
    Next,
    /// Stop the search with this outcome.
    Done(SearchOutcome),
}

/// One provider in the fallback chain.
#[async_trait]
pub trait LookupStep: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this step should run for a normalized ISBN.
    fn applies_to(&self, isbn: &str) -> bool;

    /// Query the provider and normalize its first record.
    async fn attempt(&self, isbn: &str) -> StepResult;
}

// =============================================================================
// Domestic catalog
// =============================================================================

/// openBD lookup for ISBNs with the domestic prefix. Failures never end the
/// search.
pub struct DomesticStep {
    catalog: Arc<dyn DomesticCatalog>,
    prefix: String,
    unknown_author: String,
}

impl DomesticStep {
    pub fn new(
        catalog: Arc<dyn DomesticCatalog>,
        prefix: impl Into<String>,
        unknown_author: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            prefix: prefix.into(),
            unknown_author: unknown_author.into(),
        }
    }
}

#[async_trait]
impl LookupStep for DomesticStep {
    fn name(&self) -> &'static str {
        "openbd"
    }

    fn applies_to(&self, isbn: &str) -> bool {
        has_prefix(isbn, &self.prefix)
    }

    async fn attempt(&self, isbn: &str) -> StepResult {
        match self.catalog.lookup(isbn).await {
            Ok(Some(record)) => match normalize_openbd(&record, &self.unknown_author) {
                Some(book) => {
                    info!(isbn = %isbn, title = %book.title, "Found book in openBD");
                    StepResult::Found(book)
                }
                None => {
                    debug!(isbn = %isbn, "openBD record missing title or ISBN, falling back");
                    StepResult::Next
                }
            },
            Ok(None) => {
                debug!(isbn = %isbn, "openBD has no entry, falling back");
                StepResult::Next
            }
            Err(e) => {
                warn!(isbn = %isbn, error = %e, "openBD lookup failed, falling back");
                StepResult::Next
            }
        }
    }
}

// =============================================================================
// Global catalog
// =============================================================================

/// Google Books lookup, gated by the daily quota and request spacing.
pub struct GlobalStep {
    catalog: Arc<dyn GlobalCatalog>,
    quota: Arc<DailyQuotaTracker>,
    spacer: Arc<RequestSpacer>,
    unknown_author: String,
}

impl GlobalStep {
    pub fn new(
        catalog: Arc<dyn GlobalCatalog>,
        quota: Arc<DailyQuotaTracker>,
        spacer: Arc<RequestSpacer>,
        unknown_author: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            quota,
            spacer,
            unknown_author: unknown_author.into(),
        }
    }
}

#[async_trait]
impl LookupStep for GlobalStep {
    fn name(&self) -> &'static str {
        "google_books"
    }

    fn applies_to(&self, _isbn: &str) -> bool {
        true
    }

    async fn attempt(&self, isbn: &str) -> StepResult {
        // Claimed before queueing on the spacer so waiting callers can't overshoot
        // the cap. Fail closed: without a readable counter we can't tell if quota
        // is left.
        let reservation = match self.quota.try_reserve() {
            Ok(Some(reservation)) => reservation,
            Ok(None) => {
                info!(isbn = %isbn, "Daily Google Books quota exhausted");
                return StepResult::Done(SearchOutcome::DailyLimitExceeded);
            }
            Err(e) => {
                return StepResult::Done(SearchOutcome::api_error(format!(
                    "Failed to reserve request quota: {}",
                    e
                )));
            }
        };

        let query = format!("isbn:{}", isbn);
        let items = match self
            .spacer
            .with_limit(|| self.catalog.search_volumes(&query))
            .await
        {
            Ok(Some(items)) => items,
            Ok(None) => {
                warn!(isbn = %isbn, "Google Books rate limit hit");
                return StepResult::Done(SearchOutcome::RateLimitExceeded);
            }
            Err(e) => return StepResult::Done(SearchOutcome::api_error(e.to_string())),
        };
        reservation.commit();

        match items
            .first()
            .and_then(|item| normalize_google_books(item, &self.unknown_author))
        {
            Some(book) => {
                info!(isbn = %isbn, title = %book.title, "Found book in Google Books");
                StepResult::Found(book)
            }
            None => {
                debug!(isbn = %isbn, items = items.len(), "No usable Google Books record");
                StepResult::Next
            }
        }
    }
}
