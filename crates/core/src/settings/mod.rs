//! Persistent named integer settings.

mod sqlite;

pub use sqlite::SqliteSettingsStore;

use thiserror::Error;

/// Errors for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for SettingsError {
    fn from(e: rusqlite::Error) -> Self {
        SettingsError::Database(e.to_string())
    }
}

/// Key-value store of named integers.
pub trait SettingsStore: Send + Sync {
    /// Read a value. `None` if the key was never written.
    fn get_int(&self, key: &str) -> Result<Option<i64>, SettingsError>;

    /// Overwrite a value.
    fn set_int(&self, key: &str, value: i64) -> Result<(), SettingsError>;

    /// Atomically add one to a value (missing keys start at zero).
    ///
    /// Returns the new value.
    fn increment(&self, key: &str) -> Result<i64, SettingsError>;

    /// Atomically add one unless the value has already reached `limit`.
    ///
    /// Returns the new value, or `None` when the value was left unchanged.
    fn increment_below(&self, key: &str, limit: i64) -> Result<Option<i64>, SettingsError>;

    /// Atomically subtract one, never going below zero.
    fn decrement(&self, key: &str) -> Result<(), SettingsError>;
}
