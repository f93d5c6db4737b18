use std::sync::Arc;

use readlog_core::{BookCache, BookSearchService, Config, DailyQuotaTracker, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    search: BookSearchService,
    cache: Arc<dyn BookCache>,
    quota: Arc<DailyQuotaTracker>,
}

impl AppState {
    pub fn new(
        config: Config,
        search: BookSearchService,
        cache: Arc<dyn BookCache>,
        quota: Arc<DailyQuotaTracker>,
    ) -> Self {
        Self {
            config,
            search,
            cache,
            quota,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn search(&self) -> &BookSearchService {
        &self.search
    }

    pub fn cache(&self) -> &dyn BookCache {
        self.cache.as_ref()
    }

    pub fn quota(&self) -> &DailyQuotaTracker {
        self.quota.as_ref()
    }
}
