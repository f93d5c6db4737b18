//! External catalog integration for openBD and Google Books.
//!
//! Clients return the providers' raw records; [`normalize`] turns them into
//! [`BookRecord`](crate::search::BookRecord)s.

mod google_books;
pub mod normalize;
mod openbd;
mod types;

pub use google_books::GoogleBooksClient;
pub use openbd::OpenBdClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with external catalogs.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered 429.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (bad API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// The domestic catalog (openBD). No rate restriction.
#[async_trait]
pub trait DomesticCatalog: Send + Sync {
    /// Look up a normalized ISBN. `None` when the catalog has no entry.
    async fn lookup(&self, isbn: &str) -> Result<Option<OpenBdRecord>, ProviderError>;
}

/// The global catalog (Google Books). Quota-limited.
#[async_trait]
pub trait GlobalCatalog: Send + Sync {
    /// Run a volumes query such as `isbn:9780000000002`.
    async fn search_volumes(&self, query: &str) -> Result<Vec<GoogleBooksItem>, ProviderError>;
}
