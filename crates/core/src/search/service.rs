//! ISBN search orchestration.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use super::isbn::normalize_isbn;
use super::rate_limiter::RequestSpacer;
use super::steps::{DomesticStep, GlobalStep, LookupStep, StepResult};
use super::types::{BookRecord, SearchOutcome};
use crate::cache::{BookCache, CacheEntry};
use crate::config::Config;
use crate::connectivity::ConnectivityProbe;
use crate::external_catalog::{DomesticCatalog, GlobalCatalog};
use crate::metrics::{CACHE_LOOKUPS, SEARCH_OUTCOMES};
use crate::quota::DailyQuotaTracker;

/// Resolves ISBNs to book records: cache first, then the provider chain.
pub struct BookSearchService {
    connectivity: Arc<dyn ConnectivityProbe>,
    cache: Arc<dyn BookCache>,
    steps: Vec<Arc<dyn LookupStep>>,
    cache_ttl: chrono::Duration,
}

impl BookSearchService {
    /// Create a service with an empty provider chain.
    pub fn new(
        connectivity: Arc<dyn ConnectivityProbe>,
        cache: Arc<dyn BookCache>,
        cache_ttl: chrono::Duration,
    ) -> Self {
        Self {
            connectivity,
            cache,
            steps: Vec::new(),
            cache_ttl,
        }
    }

    /// Append a provider to the chain.
    pub fn with_step(mut self, step: Arc<dyn LookupStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// The usual chain: openBD for domestic ISBNs (when enabled), then Google
    /// Books behind the quota and request spacing.
    pub fn standard(
        config: &Config,
        connectivity: Arc<dyn ConnectivityProbe>,
        cache: Arc<dyn BookCache>,
        quota: Arc<DailyQuotaTracker>,
        domestic: Arc<dyn DomesticCatalog>,
        global: Arc<dyn GlobalCatalog>,
    ) -> Self {
        let ttl = chrono::Duration::days(i64::from(config.search.cache_ttl_days));
        let spacer = Arc::new(RequestSpacer::new(std::time::Duration::from_millis(
            config.google_books.min_interval_ms,
        )));

        let mut service = Self::new(connectivity, cache, ttl);
        if config.openbd.enabled {
            service = service.with_step(Arc::new(DomesticStep::new(
                domestic,
                config.search.domestic_prefix.clone(),
                config.search.unknown_author.clone(),
            )));
        }
        service.with_step(Arc::new(GlobalStep::new(
            global,
            quota,
            spacer,
            config.search.unknown_author.clone(),
        )))
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        self.cache_ttl
    }

    /// Search for a book by ISBN. Never fails: every problem becomes a
    /// [`SearchOutcome`].
    pub async fn search_by_isbn(&self, isbn: &str) -> SearchOutcome {
        let outcome = match AssertUnwindSafe(self.run(isbn)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => SearchOutcome::api_error(panic_message(panic.as_ref())),
        };

        if let SearchOutcome::ApiError { message } = &outcome {
            error!(isbn = %isbn, error = %message, "Book search failed");
        }
        SEARCH_OUTCOMES
            .with_label_values(&[outcome.label()])
            .inc();

        outcome
    }

    async fn run(&self, raw_isbn: &str) -> SearchOutcome {
        if !self.connectivity.is_network_reachable().await {
            info!("Network unreachable, skipping search");
            return SearchOutcome::NetworkUnavailable;
        }

        let isbn = normalize_isbn(raw_isbn);

        if let Some(book) = self.cached(&isbn) {
            return SearchOutcome::Success { book };
        }

        for step in &self.steps {
            if !step.applies_to(&isbn) {
                continue;
            }

            debug!(isbn = %isbn, step = step.name(), "Trying provider");
            match step.attempt(&isbn).await {
                StepResult::Found(book) => {
                    self.store(&isbn, &book);
                    return SearchOutcome::Success { book };
                }
                StepResult::Next => continue,
                StepResult::Done(outcome) => return outcome,
            }
        }

        SearchOutcome::NotFound
    }

    /// Fresh cached record, if any. An expired hit purges every entry at
    /// least as old. Cache failures are treated as misses.
    fn cached(&self, isbn: &str) -> Option<BookRecord> {
        let entry = match self.cache.find(isbn) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                return None;
            }
            Err(e) => {
                warn!(isbn = %isbn, error = %e, "Cache read failed, treating as miss");
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                return None;
            }
        };

        let now = Utc::now();
        if entry.age(now) < self.cache_ttl {
            info!(isbn = %isbn, "Cache hit");
            CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
            return Some(entry.record);
        }

        CACHE_LOOKUPS.with_label_values(&["expired"]).inc();
        match self.cache.delete_older_than(now - self.cache_ttl) {
            Ok(removed) => debug!(removed, "Purged expired cache entries"),
            Err(e) => warn!(error = %e, "Failed to purge expired cache entries"),
        }
        None
    }

    /// Write-through under the record's ISBN, and also under the searched ISBN
    /// when the provider answered with a different one (ISBN-10 searches).
    fn store(&self, searched: &str, book: &BookRecord) {
        let entry = CacheEntry::new(book.clone());
        if let Err(e) = self.cache.upsert(&entry) {
            warn!(isbn = %book.isbn, error = %e, "Failed to cache book record");
        }
        if searched != book.isbn {
            if let Err(e) = self.cache.upsert_as(searched, &entry) {
                warn!(isbn = %searched, error = %e, "Failed to cache book record alias");
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;

    use crate::cache::SqliteBookCache;
    use crate::search::ProviderTag;
    use crate::settings::{SettingsStore, SqliteSettingsStore};
    use crate::testing::{fixtures, MockConnectivity, MockDomesticCatalog, MockGlobalCatalog};

    struct Harness {
        service: BookSearchService,
        connectivity: Arc<MockConnectivity>,
        cache: Arc<SqliteBookCache>,
        settings: Arc<SqliteSettingsStore>,
        quota: Arc<DailyQuotaTracker>,
        domestic: Arc<MockDomesticCatalog>,
        global: Arc<MockGlobalCatalog>,
    }

    fn harness() -> Harness {
        let connectivity = Arc::new(MockConnectivity::new());
        let cache = Arc::new(SqliteBookCache::in_memory().unwrap());
        let settings = Arc::new(SqliteSettingsStore::in_memory().unwrap());
        let quota = Arc::new(DailyQuotaTracker::new(settings.clone(), 900));
        let domestic = Arc::new(MockDomesticCatalog::new());
        let global = Arc::new(MockGlobalCatalog::new());

        let service = BookSearchService::standard(
            &Config::default(),
            connectivity.clone(),
            cache.clone(),
            quota.clone(),
            domestic.clone(),
            global.clone(),
        );

        Harness {
            service,
            connectivity,
            cache,
            settings,
            quota,
            domestic,
            global,
        }
    }

    fn cached_book(isbn: &str, title: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            author: "Cached Author".to_string(),
            isbn: isbn.to_string(),
            cover_image_url: None,
            description: None,
            publisher: None,
            published_date: None,
            source: ProviderTag::GlobalCatalog,
        }
    }

    #[tokio::test]
    async fn test_network_unavailable_short_circuits() {
        let h = harness();
        h.connectivity.set_reachable(false);
        h.cache
            .upsert(&CacheEntry::new(cached_book("9780000000002", "Cached")))
            .unwrap();

        let outcome = h.service.search_by_isbn("9780000000002").await;

        assert_eq!(outcome, SearchOutcome::NetworkUnavailable);
        assert_eq!(h.global.query_count().await, 0);
        assert_eq!(h.domestic.lookup_count().await, 0);
    }

    #[tokio::test]
    async fn test_fresh_cache_hit_skips_providers() {
        let h = harness();
        let book = cached_book("9780000000002", "Cached");
        h.cache
            .upsert(&CacheEntry::at(book.clone(), Utc::now() - Duration::days(6)))
            .unwrap();

        let outcome = h.service.search_by_isbn("978-0-00-000000-2").await;

        assert_eq!(outcome, SearchOutcome::Success { book });
        assert_eq!(h.global.query_count().await, 0);
        assert_eq!(h.quota.used_today().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_purged_with_older_ones() {
        let h = harness();
        let now = Utc::now();
        h.cache
            .upsert(&CacheEntry::at(
                cached_book("9780000000002", "Stale"),
                now - Duration::days(7),
            ))
            .unwrap();
        h.cache
            .upsert(&CacheEntry::at(
                cached_book("9780000000019", "Older"),
                now - Duration::days(10),
            ))
            .unwrap();
        h.cache
            .upsert(&CacheEntry::at(
                cached_book("9780000000026", "Fresh"),
                now - Duration::days(2),
            ))
            .unwrap();
        h.global
            .add_item(fixtures::google_books_item("9780000000002", "Refetched", &["A"]))
            .await;

        let outcome = h.service.search_by_isbn("9780000000002").await;

        assert_eq!(outcome.book().unwrap().title, "Refetched");
        assert_eq!(h.global.query_count().await, 1);
        assert!(h.cache.find("9780000000019").unwrap().is_none());
        assert!(h.cache.find("9780000000026").unwrap().is_some());
        // Re-written by the successful lookup
        assert_eq!(
            h.cache.find("9780000000002").unwrap().unwrap().record.title,
            "Refetched"
        );
    }

    #[tokio::test]
    async fn test_domestic_isbn_resolved_by_openbd() {
        let h = harness();
        h.domestic
            .add_record(fixtures::openbd_record("9784000000000", "Sample", None))
            .await;

        let outcome = h.service.search_by_isbn("978-4-00-000000-0").await;

        let book = outcome.book().unwrap();
        assert_eq!(book.title, "Sample");
        assert_eq!(book.author, "author unknown");
        assert_eq!(book.source, ProviderTag::DomesticCatalog);
        assert_eq!(h.global.query_count().await, 0);

        let entry = h.cache.find("9784000000000").unwrap().unwrap();
        assert_eq!(entry.record, *book);
    }

    #[tokio::test(start_paused = true)]
    async fn test_domestic_miss_falls_back_to_global() {
        let h = harness();
        h.domestic
            .add_record(fixtures::openbd_record_without_title("9784000000000"))
            .await;
        h.global
            .add_item(fixtures::google_books_item("9784000000000", "From Google", &["B"]))
            .await;

        let outcome = h.service.search_by_isbn("9784000000000").await;

        assert_eq!(outcome.book().unwrap().source, ProviderTag::GlobalCatalog);
        assert_eq!(h.domestic.lookup_count().await, 1);
        assert_eq!(h.global.query_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_domestic_isbn_never_calls_openbd() {
        let h = harness();
        h.global
            .add_item(fixtures::google_books_item("9780000000002", "Global", &["C"]))
            .await;

        let outcome = h.service.search_by_isbn("9780000000002").await;

        assert!(outcome.is_success());
        assert_eq!(h.domestic.lookup_count().await, 0);
    }

    #[tokio::test]
    async fn test_daily_limit_blocks_without_request_or_cache_write() {
        let h = harness();
        h.settings
            .set_int(&DailyQuotaTracker::key_for(&DailyQuotaTracker::today()), 900)
            .unwrap();

        let outcome = h.service.search_by_isbn("9780000000002").await;

        assert_eq!(outcome, SearchOutcome::DailyLimitExceeded);
        assert_eq!(h.global.query_count().await, 0);
        assert!(h.cache.find("9780000000002").unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_empty_result_is_not_found() {
        let h = harness();
        let outcome = h.service.search_by_isbn("9780000000002").await;
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(h.cache.count().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_search_uses_cache() {
        let h = harness();
        h.global
            .add_item(fixtures::google_books_item("9780000000002", "Once", &["D"]))
            .await;

        let first = h.service.search_by_isbn("9780000000002").await;
        let second = h.service.search_by_isbn("9780000000002").await;

        assert_eq!(first, second);
        assert_eq!(h.global.query_count().await, 1);
        assert_eq!(h.quota.used_today().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_isbn10_search_uses_cache() {
        let h = harness();
        h.global
            .add_item(fixtures::google_books_item("9784061234563", "Ten", &["E"]))
            .await;

        let first = h.service.search_by_isbn("4-06-123456-3").await;
        let second = h.service.search_by_isbn("4061234563").await;

        assert_eq!(first.book().unwrap().isbn, "9784061234563");
        assert_eq!(first, second);
        assert_eq!(h.global.query_count().await, 1);
        assert_eq!(h.quota.used_today().unwrap(), 1);
        assert!(h.cache.find("9784061234563").unwrap().is_some());
    }

    struct PanickingStep;

    #[async_trait]
    impl LookupStep for PanickingStep {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn applies_to(&self, _isbn: &str) -> bool {
            true
        }

        async fn attempt(&self, _isbn: &str) -> StepResult {
            panic!("provider exploded")
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_api_error() {
        let service = BookSearchService::new(
            Arc::new(MockConnectivity::new()),
            Arc::new(SqliteBookCache::in_memory().unwrap()),
            Duration::days(7),
        )
        .with_step(Arc::new(PanickingStep));

        let outcome = service.search_by_isbn("9780000000002").await;

        assert_eq!(outcome, SearchOutcome::api_error("provider exploded"));
    }

    #[tokio::test]
    async fn test_empty_chain_is_not_found() {
        let service = BookSearchService::new(
            Arc::new(MockConnectivity::new()),
            Arc::new(SqliteBookCache::in_memory().unwrap()),
            Duration::days(7),
        );
        assert_eq!(
            service.search_by_isbn("9780000000002").await,
            SearchOutcome::NotFound
        );
    }
}
