//! Raw response shapes of the external catalogs.
//!
//! Every field the providers may omit is optional here; deciding what is
//! mandatory is the normalizer's job.

use serde::{Deserialize, Serialize};

// =============================================================================
// openBD
// =============================================================================

/// One element of the openBD `/v1/get` array (the array holds `null` for
/// unknown ISBNs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenBdRecord {
    #[serde(default)]
    pub summary: Option<OpenBdSummary>,
    /// ONIX payload; carried through but not used for normalization.
    #[serde(default)]
    pub onix: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenBdSummary {
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub pubdate: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
}

// =============================================================================
// Google Books
// =============================================================================

/// Response of `/books/v1/volumes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleBooksResponse {
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub items: Option<Vec<GoogleBooksItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleBooksItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    /// `ISBN_13`, `ISBN_10`, `OTHER`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}
