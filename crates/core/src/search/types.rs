//! Canonical book metadata and search outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which external catalog a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    /// openBD, the Japanese publishers' catalog. No rate restriction.
    DomesticCatalog,
    /// Google Books. Daily quota and minimum request spacing apply.
    GlobalCatalog,
}

impl ProviderTag {
    /// Text form stored in the cache table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::DomesticCatalog => "OPEN_BD",
            ProviderTag::GlobalCatalog => "GOOGLE_BOOKS",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN_BD" => Ok(ProviderTag::DomesticCatalog),
            "GOOGLE_BOOKS" => Ok(ProviderTag::GlobalCatalog),
            other => Err(format!("unknown provider tag: {}", other)),
        }
    }
}

/// Canonical book metadata, whichever provider produced it.
///
/// Only built through the normalizers, which refuse records without a title
/// or ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    /// Author(s); a placeholder when the provider had none.
    pub author: String,
    /// Normalized ISBN (no hyphens, no surrounding whitespace).
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Provider-native date string, not parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    pub source: ProviderTag,
}

/// Result of a single ISBN search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Success { book: BookRecord },
    NotFound,
    RateLimitExceeded,
    DailyLimitExceeded,
    NetworkUnavailable,
    ApiError { message: String },
}

impl SearchOutcome {
    /// Stable label used in metrics and API responses.
    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Success { .. } => "success",
            SearchOutcome::NotFound => "not_found",
            SearchOutcome::RateLimitExceeded => "rate_limit_exceeded",
            SearchOutcome::DailyLimitExceeded => "daily_limit_exceeded",
            SearchOutcome::NetworkUnavailable => "network_unavailable",
            SearchOutcome::ApiError { .. } => "api_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }

    pub fn book(&self) -> Option<&BookRecord> {
        match self {
            SearchOutcome::Success { book } => Some(book),
            _ => None,
        }
    }

    pub(crate) fn api_error(message: impl Into<String>) -> Self {
        SearchOutcome::ApiError {
            message: message.into(),
        }
    }
}
