//! SQLite-backed book cache implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{BookCache, CacheEntry, CacheError};
use crate::search::{BookRecord, ProviderTag};

/// SQLite-backed book cache.
pub struct SqliteBookCache {
    conn: Mutex<Connection>,
}

impl SqliteBookCache {
    /// Open the cache, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            -- One row per lookup key; cached_at is unix milliseconds.
            -- book_isbn is the record's own ISBN, NULL when it equals the key.
            CREATE TABLE IF NOT EXISTS book_cache (
                isbn TEXT PRIMARY KEY,
                book_isbn TEXT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                cover_image_url TEXT,
                description TEXT,
                publisher TEXT,
                published_date TEXT,
                cached_at INTEGER NOT NULL,
                api_source TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_book_cache_cached_at ON book_cache(cached_at);
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Database("connection mutex poisoned".to_string()))
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            isbn: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            cover_image_url: row.get(3)?,
            description: row.get(4)?,
            publisher: row.get(5)?,
            published_date: row.get(6)?,
            cached_at_ms: row.get(7)?,
            api_source: row.get(8)?,
        })
    }
}

/// A row as stored, before the provider tag and timestamp are decoded.
struct RawRow {
    isbn: String,
    title: String,
    author: String,
    cover_image_url: Option<String>,
    description: Option<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    cached_at_ms: i64,
    api_source: String,
}

impl TryFrom<RawRow> for CacheEntry {
    type Error = CacheError;

    fn try_from(row: RawRow) -> Result<Self, Self::Error> {
        let source: ProviderTag = row.api_source.parse().map_err(|reason| CacheError::Corrupt {
            isbn: row.isbn.clone(),
            reason,
        })?;
        let cached_at =
            DateTime::<Utc>::from_timestamp_millis(row.cached_at_ms).ok_or_else(|| {
                CacheError::Corrupt {
                    isbn: row.isbn.clone(),
                    reason: format!("timestamp out of range: {}", row.cached_at_ms),
                }
            })?;

        Ok(CacheEntry {
            record: BookRecord {
                title: row.title,
                author: row.author,
                isbn: row.isbn,
                cover_image_url: row.cover_image_url,
                description: row.description,
                publisher: row.publisher,
                published_date: row.published_date,
                source,
            },
            cached_at,
        })
    }
}

impl BookCache for SqliteBookCache {
    fn find(&self, isbn: &str) -> Result<Option<CacheEntry>, CacheError> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT COALESCE(book_isbn, isbn), title, author, cover_image_url,
                        description, publisher, published_date, cached_at, api_source
                 FROM book_cache WHERE isbn = ?",
                params![isbn],
                Self::row_to_entry,
            )
            .optional()?;

        row.map(CacheEntry::try_from).transpose()
    }

    fn upsert_as(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let conn = self.conn()?;
        let record = &entry.record;
        let book_isbn = (record.isbn != key).then_some(record.isbn.as_str());

        conn.execute(
            "INSERT OR REPLACE INTO book_cache
                (isbn, book_isbn, title, author, cover_image_url, description, publisher,
                 published_date, cached_at, api_source)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                key,
                book_isbn,
                &record.title,
                &record.author,
                &record.cover_image_url,
                &record.description,
                &record.publisher,
                &record.published_date,
                entry.cached_at.timestamp_millis(),
                record.source.as_str(),
            ],
        )?;

        Ok(())
    }

    fn delete_older_than(&self, threshold: DateTime<Utc>) -> Result<u64, CacheError> {
        let conn = self.conn()?;

        let removed = conn.execute(
            "DELETE FROM book_cache WHERE cached_at <= ?",
            params![threshold.timestamp_millis()],
        )?;

        Ok(removed as u64)
    }

    fn delete_all(&self) -> Result<u64, CacheError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM book_cache", [])?;
        Ok(removed as u64)
    }

    fn count(&self) -> Result<u64, CacheError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM book_cache", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
