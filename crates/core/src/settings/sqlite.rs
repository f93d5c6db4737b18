use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{SettingsError, SettingsStore};

/// SQLite-backed settings store.
pub struct SqliteSettingsStore {
    conn: Mutex<Connection>,
}

impl SqliteSettingsStore {
    pub fn new(path: &Path) -> Result<Self, SettingsError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, SettingsError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), SettingsError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, SettingsError> {
        self.conn
            .lock()
            .map_err(|_| SettingsError::Database("connection mutex poisoned".to_string()))
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, SettingsError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), SettingsError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn increment(&self, key: &str) -> Result<i64, SettingsError> {
        let conn = self.conn()?;
        let value = conn.query_row(
            "INSERT INTO settings (key, value) VALUES (?, 1)
             ON CONFLICT(key) DO UPDATE SET value = value + 1
             RETURNING value",
            params![key],
            |row| row.get(0),
        )?;
        Ok(value)
    }

    fn increment_below(&self, key: &str, limit: i64) -> Result<Option<i64>, SettingsError> {
        if limit <= 0 {
            return Ok(None);
        }

        let conn = self.conn()?;
        // The upsert returns no row when the WHERE guard skips the update
        let value = conn
            .query_row(
                "INSERT INTO settings (key, value) VALUES (?1, 1)
                 ON CONFLICT(key) DO UPDATE SET value = value + 1 WHERE value < ?2
                 RETURNING value",
                params![key, limit],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn decrement(&self, key: &str) -> Result<(), SettingsError> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE settings SET value = value - 1 WHERE key = ? AND value > 0",
            params![key],
        )?;
        Ok(())
    }
}
