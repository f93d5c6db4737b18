//! Mock external catalogs for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::external_catalog::{
    DomesticCatalog, GlobalCatalog, GoogleBooksItem, OpenBdRecord, ProviderError,
};

// =============================================================================
// Domestic catalog
// =============================================================================

/// Mock implementation of the DomesticCatalog trait.
///
/// Records are keyed by the ISBN in their summary. Every lookup is recorded,
/// including ones that fail through injected errors.
#[derive(Debug)]
pub struct MockDomesticCatalog {
    records: Arc<RwLock<HashMap<String, OpenBdRecord>>>,
    lookups: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<ProviderError>>>,
}

impl Default for MockDomesticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDomesticCatalog {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a record, keyed by its summary ISBN.
    pub async fn add_record(&self, record: OpenBdRecord) {
        let isbn = record
            .summary
            .as_ref()
            .and_then(|s| s.isbn.clone())
            .unwrap_or_default();
        self.set_record(&isbn, record).await;
    }

    /// Add a record under an explicit ISBN.
    pub async fn set_record(&self, isbn: &str, record: OpenBdRecord) {
        self.records.write().await.insert(isbn.to_string(), record);
    }

    pub async fn clear_records(&self) {
        self.records.write().await.clear();
    }

    /// ISBNs looked up so far, in order.
    pub async fn recorded_lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }
}

#[async_trait]
impl DomesticCatalog for MockDomesticCatalog {
    async fn lookup(&self, isbn: &str) -> Result<Option<OpenBdRecord>, ProviderError> {
        self.lookups.write().await.push(isbn.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.records.read().await.get(isbn).cloned())
    }
}

// =============================================================================
// Global catalog
// =============================================================================

/// Mock implementation of the GlobalCatalog trait.
///
/// `isbn:<n>` queries return the items carrying that identifier; any other
/// query returns every item. Queries are recorded with the (tokio) instant
/// they arrived, so request spacing can be asserted under a paused clock.
#[derive(Debug)]
pub struct MockGlobalCatalog {
    items: Arc<RwLock<Vec<GoogleBooksItem>>>,
    queries: Arc<RwLock<Vec<(String, Instant)>>>,
    /// If set, the next query will fail with this error.
    next_error: Arc<RwLock<Option<ProviderError>>>,
}

impl Default for MockGlobalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGlobalCatalog {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn add_item(&self, item: GoogleBooksItem) {
        self.items.write().await.push(item);
    }

    pub async fn set_items(&self, items: Vec<GoogleBooksItem>) {
        *self.items.write().await = items;
    }

    pub async fn clear_items(&self) {
        self.items.write().await.clear();
    }

    /// Queries received so far, in order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }

    /// When each query arrived.
    pub async fn request_instants(&self) -> Vec<Instant> {
        self.queries.read().await.iter().map(|(_, at)| *at).collect()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next query to fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }
}

#[async_trait]
impl GlobalCatalog for MockGlobalCatalog {
    async fn search_volumes(&self, query: &str) -> Result<Vec<GoogleBooksItem>, ProviderError> {
        self.queries
            .write()
            .await
            .push((query.to_string(), Instant::now()));

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let items = self.items.read().await;
        let results = match query.strip_prefix("isbn:") {
            Some(isbn) => items
                .iter()
                .filter(|item| {
                    item.volume_info
                        .industry_identifiers
                        .iter()
                        .flatten()
                        .any(|id| id.identifier == isbn)
                })
                .cloned()
                .collect(),
            None => items.clone(),
        };

        Ok(results)
    }
}
