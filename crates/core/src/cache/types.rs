//! Types for the book metadata cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::BookRecord;

/// A cached book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(flatten)]
    pub record: BookRecord,
    /// When the record was written.
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Wrap a freshly resolved record, stamped with the current time.
    pub fn new(record: BookRecord) -> Self {
        Self::at(record, Utc::now())
    }

    pub fn at(record: BookRecord, cached_at: DateTime<Utc>) -> Self {
        Self { record, cached_at }
    }

    pub fn isbn(&self) -> &str {
        &self.record.isbn
    }

    /// Age relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.cached_at
    }
}

/// Errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt cache row for {isbn}: {reason}")]
    Corrupt { isbn: String, reason: String },
}

impl From<rusqlite::Error> for CacheError {
    fn from(e: rusqlite::Error) -> Self {
        CacheError::Database(e.to_string())
    }
}
