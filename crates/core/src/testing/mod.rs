//! Testing utilities and mock implementations.
//!
//! Mocks for every external collaborator of the search service, so searches
//! can be exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use readlog_core::testing::{fixtures, MockConnectivity, MockDomesticCatalog, MockGlobalCatalog};
//!
//! let domestic = MockDomesticCatalog::new();
//! let global = MockGlobalCatalog::new();
//!
//! domestic.add_record(fixtures::openbd_record("9784000000000", "Sample", None)).await;
//! global.set_next_error(ProviderError::RateLimited).await;
//!
//! // Build a BookSearchService::standard(...) with them...
//! ```

mod mock_catalogs;
mod mock_connectivity;

pub use mock_catalogs::{MockDomesticCatalog, MockGlobalCatalog};
pub use mock_connectivity::MockConnectivity;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::external_catalog::{
        GoogleBooksItem, ImageLinks, IndustryIdentifier, OpenBdRecord, OpenBdSummary, VolumeInfo,
    };

    /// An openBD record with publisher and cover filled in.
    pub fn openbd_record(isbn: &str, title: &str, author: Option<&str>) -> OpenBdRecord {
        OpenBdRecord {
            summary: Some(OpenBdSummary {
                isbn: Some(isbn.to_string()),
                title: Some(title.to_string()),
                author: author.map(String::from),
                publisher: Some("Test Shuppan".to_string()),
                pubdate: Some("20200401".to_string()),
                cover: Some(format!("https://cover.openbd.jp/{}.jpg", isbn)),
            }),
            onix: None,
        }
    }

    /// An openBD record the normalizer rejects.
    pub fn openbd_record_without_title(isbn: &str) -> OpenBdRecord {
        let mut record = openbd_record(isbn, "", Some("Somebody"));
        if let Some(summary) = record.summary.as_mut() {
            summary.title = None;
        }
        record
    }

    /// A Google Books volume with an ISBN_13 identifier.
    pub fn google_books_item(isbn13: &str, title: &str, authors: &[&str]) -> GoogleBooksItem {
        GoogleBooksItem {
            id: format!("vol-{}", isbn13),
            volume_info: VolumeInfo {
                title: Some(title.to_string()),
                authors: if authors.is_empty() {
                    None
                } else {
                    Some(authors.iter().map(|a| a.to_string()).collect())
                },
                publisher: Some("Test Publishing".to_string()),
                published_date: Some("2021-03-02".to_string()),
                description: Some(format!("A book called {}.", title)),
                industry_identifiers: Some(vec![
                    IndustryIdentifier {
                        kind: "ISBN_10".to_string(),
                        identifier: isbn13.chars().skip(3).collect(),
                    },
                    IndustryIdentifier {
                        kind: "ISBN_13".to_string(),
                        identifier: isbn13.to_string(),
                    },
                ]),
                image_links: Some(ImageLinks {
                    small_thumbnail: Some(format!("http://books.example/{}-s.jpg", isbn13)),
                    thumbnail: Some(format!("http://books.example/{}.jpg", isbn13)),
                }),
            },
        }
    }

    /// A Google Books volume with no ISBN_13, which the normalizer rejects.
    pub fn google_books_item_without_isbn13(isbn10: &str, title: &str) -> GoogleBooksItem {
        let mut item = google_books_item("", title, &[]);
        item.volume_info.industry_identifiers = Some(vec![IndustryIdentifier {
            kind: "ISBN_10".to_string(),
            identifier: isbn10.to_string(),
        }]);
        item
    }
}
