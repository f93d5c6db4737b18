//! Book metadata cache - resolved records keyed by the normalized ISBN they
//! were searched with.
//!
//! The store is a dumb keyed table: it knows nothing about freshness. The
//! search service decides when an entry is expired and asks the store to
//! purge.

mod sqlite;
mod types;

pub use sqlite::SqliteBookCache;
pub use types::*;

use chrono::{DateTime, Utc};

/// Trait for book cache storage.
pub trait BookCache: Send + Sync {
    /// Look up an entry by normalized ISBN.
    fn find(&self, isbn: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Insert or replace the entry for its ISBN (last write wins, no merge).
    fn upsert(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.upsert_as(entry.isbn(), entry)
    }

    /// Insert or replace the entry under another lookup key, e.g. the ISBN-10
    /// a search was made with when the provider answered with its ISBN-13.
    /// The stored record keeps its own ISBN.
    fn upsert_as(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Delete every entry cached at or before `threshold`.
    ///
    /// Returns the number of entries removed.
    fn delete_older_than(&self, threshold: DateTime<Utc>) -> Result<u64, CacheError>;

    /// Delete everything. Returns the number of entries removed.
    fn delete_all(&self) -> Result<u64, CacheError>;

    /// Number of cached entries.
    fn count(&self) -> Result<u64, CacheError>;
}
